//! Triple store access.
//!
//! The query engine reads statements through the `TripleStore` trait and
//! never writes to it. `Graph` is the in-memory implementation used for
//! derived results (construct, describe, clustering) and for tests.
//!
//! # Usage
//!
//! ```ignore
//! use storage::{Graph, TripleStore};
//!
//! let mut graph = Graph::new();
//! graph.insert(Triple::new(a, p, b));
//!
//! // Any component left as `None` matches everything in that position.
//! let matches = graph.triples_matching(Some(&a), None, None)?;
//! ```

mod cluster;
mod graph;

pub use cluster::{cluster_backward, cluster_forward};
pub use graph::Graph;

use crate::types::{Term, Triple};

/// Error returned by a store that cannot answer a match request.
#[derive(Debug, PartialEq, Eq)]
pub struct StoreError {
    pub message: String,
}

impl StoreError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for StoreError {}

/// Read access to a set of triples.
///
/// # Contract
///
/// - A `None` component matches any term in that position.
/// - The result is finite and holds each stored triple at most once.
/// - The store is not mutated while a query built against it is alive.
pub trait TripleStore {
    /// Return every stored triple matching the given components.
    fn triples_matching(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
    ) -> Result<Vec<Triple>, StoreError>;
}
