//! In-memory indexed triple set.

use std::collections::{HashMap, HashSet};

use super::{StoreError, TripleStore};
use crate::types::{Term, Triple};

/// An insertion-ordered, duplicate-free set of triples.
///
/// Each position has a hash index from term to the offsets of the triples
/// holding that term there, so bound components narrow the scan.
///
/// # Invariants
///
/// - `triples` holds no duplicates.
/// - Every offset in an index points at a triple with that term in the
///   indexed position.
#[derive(Debug, Default)]
pub struct Graph {
    triples: Vec<Triple>,
    present: HashSet<Triple>,
    by_subject: HashMap<Term, Vec<usize>>,
    by_predicate: HashMap<Term, Vec<usize>>,
    by_object: HashMap<Term, Vec<usize>>,
}

impl Graph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a triple. Returns `false` if it was already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        if self.present.contains(&triple) {
            return false;
        }
        let offset = self.triples.len();
        index_term(&mut self.by_subject, &triple.subject, offset);
        index_term(&mut self.by_predicate, &triple.predicate, offset);
        index_term(&mut self.by_object, &triple.object, offset);
        self.present.insert(triple.clone_value());
        self.triples.push(triple);
        true
    }

    #[must_use]
    pub fn contains(&self, triple: &Triple) -> bool {
        self.present.contains(triple)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Iterate over the triples in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Create a copy of this graph.
    ///
    /// This is used instead of Clone to comply with project policy.
    #[must_use]
    pub fn clone_value(&self) -> Self {
        self.iter().map(Triple::clone_value).collect()
    }

    /// Triples in either graph: `self`'s first, then `other`'s new ones.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        self.iter().chain(other.iter()).map(Triple::clone_value).collect()
    }

    /// Triples present in both graphs, in `self`'s order.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        self.iter()
            .filter(|triple| other.contains(triple))
            .map(Triple::clone_value)
            .collect()
    }

    /// Triples of `self` that are not in `other`.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        self.iter()
            .filter(|triple| !other.contains(triple))
            .map(Triple::clone_value)
            .collect()
    }

    /// Offsets of the candidate triples for a match, using the narrowest
    /// index among the bound components.
    fn candidates(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
    ) -> Option<&[usize]> {
        let lookups = [
            subject.map(|term| self.by_subject.get(term)),
            predicate.map(|term| self.by_predicate.get(term)),
            object.map(|term| self.by_object.get(term)),
        ];
        let mut narrowest: Option<&[usize]> = None;
        for lookup in lookups.into_iter().flatten() {
            // A bound component with no index entry means nothing can match.
            let offsets = lookup.map_or(&[][..], Vec::as_slice);
            if narrowest.is_none_or(|current| offsets.len() < current.len()) {
                narrowest = Some(offsets);
            }
        }
        narrowest
    }
}

fn index_term(index: &mut HashMap<Term, Vec<usize>>, term: &Term, offset: usize) {
    if let Some(offsets) = index.get_mut(term) {
        offsets.push(offset);
    } else {
        index.insert(term.clone_value(), vec![offset]);
    }
}

fn component_matches(pattern: Option<&Term>, term: &Term) -> bool {
    pattern.is_none_or(|expected| expected == term)
}

impl TripleStore for Graph {
    fn triples_matching(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
    ) -> Result<Vec<Triple>, StoreError> {
        let matches = |triple: &&Triple| {
            component_matches(subject, &triple.subject)
                && component_matches(predicate, &triple.predicate)
                && component_matches(object, &triple.object)
        };
        let found = match self.candidates(subject, predicate, object) {
            Some(offsets) => offsets
                .iter()
                .filter_map(|&offset| self.triples.get(offset))
                .filter(matches)
                .map(Triple::clone_value)
                .collect(),
            None => self.triples.iter().map(Triple::clone_value).collect(),
        };
        Ok(found)
    }
}

impl FromIterator<Triple> for Graph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut graph = Self::new();
        graph.extend(iter);
        graph
    }
}

impl Extend<Triple> for Graph {
    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        for triple in iter {
            self.insert(triple);
        }
    }
}

impl<'a> IntoIterator for &'a Graph {
    type Item = &'a Triple;
    type IntoIter = std::slice::Iter<'a, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}
