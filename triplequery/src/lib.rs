// Evaluation of graph-pattern queries:
// 1. Caller assembles GraphPatterns (statements, filters, constraints)
// 2. QueryEngine validates optional scoping, before touching the store
// 3. Each main pattern is expanded into a tree, one level per statement
// 4. Optional clauses are expanded per bound leaf, inheriting its values
// 5. Terminal calls (select, ask, construct, cluster) walk the trees
//
// System components:
//  - Term model (types)
//  - Store trait and in-memory graph (storage)
//  - Matcher and result reconstruction (query)

#![cfg_attr(test, allow(clippy::disallowed_methods))]
#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod config;
pub mod query;
pub mod storage;
pub mod types;


pub use config::{ConfigError, EngineConfig, NullOrdering};
pub use query::{
    GraphPattern, Query, QueryEngine, QueryError, QueryResult, Row, SelectOptions, Selection,
    Slot, StatementPattern, Variable,
};
pub use storage::{Graph, StoreError, TripleStore};
pub use types::{Literal, Term, Triple};
