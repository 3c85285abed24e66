//! Query engine for graph patterns over a triple store.
//!
//! This module provides query evaluation on top of any `TripleStore`.
//! It supports:
//! - Conjunctive statement patterns with variables
//! - OPTIONAL clauses (left outer join)
//! - UNION of several patterns
//! - Per-statement filters and global constraints, with ready-made
//!   comparison and term-test constraints in `operators`
//! - Projection, DISTINCT, ORDER BY, LIMIT and OFFSET
//! - CONSTRUCT, DESCRIBE and clustering into new graphs
//!
//! # Example
//!
//! ```ignore
//! use triplequery::query::{GraphPattern, QueryEngine, SelectOptions, Selection, Slot, StatementPattern};
//!
//! let engine = QueryEngine::new(&graph, EngineConfig::default());
//!
//! let people = GraphPattern::from_patterns([StatementPattern::new(
//!     Slot::var("person"),
//!     Term::iri("http://xmlns.com/foaf/0.1/knows"),
//!     Slot::var("friend"),
//! )]);
//! let names = GraphPattern::from_patterns([StatementPattern::new(
//!     Slot::var("friend"),
//!     Term::iri("http://xmlns.com/foaf/0.1/name"),
//!     Slot::var("name"),
//! )]);
//!
//! let query = engine.build(&[people], &[names])?;
//! let result = query.select(&SelectOptions::new(Selection::parse("?friend ?name")?))?;
//! for row in &result {
//!     println!("{row:?}");
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;
pub mod expansion;
mod handle;
pub mod operators;
pub mod pattern;
pub mod results;
pub mod types;

pub use context::Binding;
pub use engine::QueryEngine;
pub use error::{CallbackError, ConfigurationError, EvaluationError, QueryError};
pub use expansion::{Expansion, ExpansionContext, ExpansionNode};
pub use handle::Query;
pub use operators::Operand;
pub use pattern::{GraphPattern, StatementPattern, validate_optional_scope};
pub use results::Solution;
pub use types::{
    Constraint, Direction, OrderBy, QueryResult, Row, SelectOptions, Selection, Slot,
    StatementFilter, Variable,
};
