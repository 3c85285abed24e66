//! Result reconstruction from expansion trees.
//!
//! Internal nodes concatenate their children's rows in match order. A bound
//! leaf starts from its own binding and folds in each optional tree in
//! declaration order with left-outer-join semantics:
//! - an optional tree with no rows leaves the current rows unchanged
//! - otherwise every current row is combined with every optional row, the
//!   optional row overriding only the variables it resolves
//!
//! A leaf whose optional trees yield (k1, ..., kN) rows therefore yields
//! the product of max(1, ki) rows.

use std::cmp::Ordering;
use std::collections::HashSet;

use super::context::Binding;
use super::expansion::ExpansionNode;
use super::types::{Direction, Row, Variable};
use crate::config::NullOrdering;
use crate::storage::Graph;
use crate::types::{Term, Triple};

/// One full, unprojected result row.
///
/// Holds every variable of the main branch plus whatever optional clauses
/// resolved, in first-appearance order.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Solution {
    entries: Vec<(Variable, Option<Term>)>,
}

impl Solution {
    #[must_use]
    pub fn from_binding(binding: &Binding) -> Self {
        Self {
            entries: binding
                .iter()
                .map(|(variable, value)| (variable.clone_value(), value.map(Term::clone_value)))
                .collect(),
        }
    }

    /// Get the value of a variable, if it is present and bound.
    #[must_use]
    pub fn get(&self, variable: &Variable) -> Option<&Term> {
        self.entries
            .iter()
            .find(|(key, _)| key == variable)
            .and_then(|(_, value)| value.as_ref())
    }

    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&Term> {
        self.entries
            .iter()
            .find(|(key, _)| key.name == name)
            .and_then(|(_, value)| value.as_ref())
    }

    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.entries.iter().map(|(variable, _)| variable)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Variable, Option<&Term>)> {
        self.entries
            .iter()
            .map(|(variable, value)| (variable, value.as_ref()))
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy in every value `other` resolves. Variables `other` leaves
    /// unbound keep their current value.
    pub fn merge_resolved(&mut self, other: &Self) {
        for (variable, value) in &other.entries {
            let Some(term) = value else {
                continue;
            };
            if let Some((_, slot)) = self.entries.iter_mut().find(|(key, _)| key == variable) {
                *slot = Some(term.clone_value());
            } else {
                self.entries
                    .push((variable.clone_value(), Some(term.clone_value())));
            }
        }
    }

    /// Project onto `columns`. A missing column is unset, never an error.
    #[must_use]
    pub fn project(&self, columns: &[Variable]) -> Row {
        let mut values: Vec<Option<Term>> = columns
            .iter()
            .map(|column| self.get(column).map(Term::clone_value))
            .collect();
        if values.len() == 1 {
            Row::Value(values.pop().flatten())
        } else {
            Row::Tuple(values)
        }
    }

    /// Create a copy of this solution.
    ///
    /// This is used instead of Clone to comply with project policy.
    #[must_use]
    pub fn clone_value(&self) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|(variable, value)| {
                    (variable.clone_value(), value.as_ref().map(Term::clone_value))
                })
                .collect(),
        }
    }
}

/// Collect the full solutions of a tree, in match order.
pub fn collect_solutions(node: &ExpansionNode, out: &mut Vec<Solution>) {
    if !node.is_leaf() {
        for child in node.children() {
            collect_solutions(child, out);
        }
        return;
    }
    if !node.is_bound() {
        return;
    }

    let mut rows = vec![Solution::from_binding(node.binding())];
    for tree in node.optional_trees() {
        let mut optional_rows = Vec::new();
        collect_solutions(tree, &mut optional_rows);
        if optional_rows.is_empty() {
            continue;
        }
        rows = rows
            .iter()
            .flat_map(|row| {
                optional_rows.iter().map(move |optional| {
                    let mut combined = row.clone_value();
                    combined.merge_resolved(optional);
                    combined
                })
            })
            .collect();
    }
    out.extend(rows);
}

/// Add to `into` the triples matched along every branch that ends in a
/// bound leaf. Optional trees are not included.
pub fn collect_matched(node: &ExpansionNode, into: &mut Graph) {
    let mut path = Vec::new();
    collect_matched_from(node, &mut path, into);
}

fn collect_matched_from<'a>(node: &'a ExpansionNode, path: &mut Vec<&'a Triple>, into: &mut Graph) {
    let pushed = if let Some(triple) = node.matched() {
        path.push(triple);
        true
    } else {
        false
    };
    if node.is_leaf() {
        if node.is_bound() {
            into.extend(path.iter().map(|triple| triple.clone_value()));
        }
    } else {
        for child in node.children() {
            collect_matched_from(child, path, into);
        }
    }
    if pushed {
        path.pop();
    }
}

/// Variables appearing in `solutions`, in first-seen order.
#[must_use]
pub fn all_variables(solutions: &[Solution]) -> Vec<Variable> {
    let mut seen = HashSet::new();
    let mut variables = Vec::new();
    for variable in solutions.iter().flat_map(Solution::variables) {
        if seen.insert(variable) {
            variables.push(variable.clone_value());
        }
    }
    variables
}

/// Compare two solutions on a list of keyed columns.
///
/// Both sides unbound counts as equal for that key. A one-sided unbound
/// value goes first or last per `nulls` whatever the key's direction.
#[must_use]
pub fn compare_by_columns(
    left: &Solution,
    right: &Solution,
    keys: &[(&Variable, Direction)],
    nulls: NullOrdering,
) -> Ordering {
    for (variable, direction) in keys {
        let ordering = match (left.get(variable), right.get(variable)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => match nulls {
                NullOrdering::First => Ordering::Less,
                NullOrdering::Last => Ordering::Greater,
            },
            (Some(_), None) => match nulls {
                NullOrdering::First => Ordering::Greater,
                NullOrdering::Last => Ordering::Less,
            },
            (Some(a), Some(b)) => match direction {
                Direction::Ascending => a.cmp(b),
                Direction::Descending => b.cmp(a),
            },
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Remove repeated rows, keeping the first occurrence of each.
pub fn dedupe_rows(rows: &mut Vec<Row>) {
    let mut seen = HashSet::new();
    rows.retain(|row| seen.insert(row.clone_value()));
}
