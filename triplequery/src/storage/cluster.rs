//! Reachability walks over a store.
//!
//! Both walks use an explicit worklist instead of recursion, and only follow
//! a triple the first time it is added to the target graph.

use super::{Graph, StoreError, TripleStore};
use crate::types::Term;

/// Add to `into` every triple reachable from `seed` along arcs in their
/// stated direction.
///
/// For each triple `(seed, p, o)` not yet in `into`, the triple is added and
/// the walk continues from both `p` and `o`.
pub fn cluster_forward(
    store: &dyn TripleStore,
    seed: &Term,
    into: &mut Graph,
) -> Result<(), StoreError> {
    let mut pending = vec![seed.clone_value()];
    while let Some(node) = pending.pop() {
        for triple in store.triples_matching(Some(&node), None, None)? {
            let next = [triple.predicate.clone_value(), triple.object.clone_value()];
            if into.insert(triple) {
                pending.extend(next.into_iter().filter(Term::is_subject_capable));
            }
        }
    }
    Ok(())
}

/// Add to `into` every triple reachable from `seed` by following arcs
/// backwards.
///
/// For each triple `(s, p, seed)` not yet in `into`, the triple is added and
/// the walk continues from both `s` and `p`.
pub fn cluster_backward(
    store: &dyn TripleStore,
    seed: &Term,
    into: &mut Graph,
) -> Result<(), StoreError> {
    let mut pending = vec![seed.clone_value()];
    while let Some(node) = pending.pop() {
        for triple in store.triples_matching(None, None, Some(&node))? {
            let next = [triple.subject.clone_value(), triple.predicate.clone_value()];
            if into.insert(triple) {
                pending.extend(next);
            }
        }
    }
    Ok(())
}
