//! Query types for the graph-pattern engine.
//!
//! This module defines the value types that flow through a query:
//! - `Variable` - A named placeholder in a statement pattern
//! - `Slot` - A statement position: fixed term or variable
//! - `StatementFilter` / `Constraint` - User predicates
//! - `Selection`, `OrderBy`, `SelectOptions` - What `select` returns
//! - `Row`, `QueryResult` - Projected results

#![allow(clippy::type_complexity)] // Boxed callback signatures are spelled out once here

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::context::Binding;
use super::error::{CallbackError, ConfigurationError};
use super::results::Solution;
use crate::storage::TripleStore;
use crate::types::Term;

/// A query variable.
///
/// The name is stored without the leading `?`.
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
}

impl Variable {
    /// Create a new variable. The name is taken as is.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Parse a variable written as `?name` or `name`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidVariable` if the name is empty or contains whitespace
    /// or a further `?`.
    pub fn parse(text: &str) -> Result<Self, ConfigurationError> {
        let trimmed = text.trim();
        let name = trimmed.strip_prefix('?').unwrap_or(trimmed);
        if name.is_empty() || name.chars().any(|c| c.is_whitespace() || c == '?') {
            return Err(ConfigurationError::InvalidVariable(text.to_owned()));
        }
        Ok(Self::new(name))
    }

    /// Create a copy of this variable.
    ///
    /// This is used instead of Clone to comply with project policy.
    #[must_use]
    pub fn clone_value(&self) -> Self {
        Self {
            name: self.name.as_str().to_owned(),
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.name)
    }
}

/// One position of a statement pattern.
#[derive(Debug, PartialEq, Eq)]
pub enum Slot {
    /// A fixed term that must match exactly.
    Term(Term),
    /// A variable to be bound.
    Variable(Variable),
}

impl Slot {
    /// Create a variable slot.
    #[must_use]
    pub fn var(name: impl Into<String>) -> Self {
        Self::Variable(Variable::new(name))
    }

    #[must_use]
    pub const fn as_variable(&self) -> Option<&Variable> {
        match self {
            Self::Variable(v) => Some(v),
            Self::Term(_) => None,
        }
    }

    #[must_use]
    pub const fn as_term(&self) -> Option<&Term> {
        match self {
            Self::Term(t) => Some(t),
            Self::Variable(_) => None,
        }
    }

    /// Create a copy of this slot.
    ///
    /// This is used instead of Clone to comply with project policy.
    #[must_use]
    pub fn clone_value(&self) -> Self {
        match self {
            Self::Term(t) => Self::Term(t.clone_value()),
            Self::Variable(v) => Self::Variable(v.clone_value()),
        }
    }
}

impl From<Term> for Slot {
    fn from(term: Term) -> Self {
        Self::Term(term)
    }
}

impl From<Variable> for Slot {
    fn from(variable: Variable) -> Self {
        Self::Variable(variable)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Term(t) => write!(f, "{t}"),
            Self::Variable(v) => write!(f, "{v}"),
        }
    }
}

/// A per-statement filter, called with each candidate triple's components.
pub struct StatementFilter {
    check: Arc<dyn Fn(&Term, &Term, &Term) -> Result<bool, CallbackError> + Send + Sync>,
}

impl StatementFilter {
    /// Create a filter from a plain predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&Term, &Term, &Term) -> bool + Send + Sync + 'static,
    {
        Self {
            check: Arc::new(move |s: &Term, p: &Term, o: &Term| -> Result<bool, CallbackError> {
                Ok(predicate(s, p, o))
            }),
        }
    }

    /// Create a filter that may fail. An error aborts the whole evaluation.
    pub fn fallible<F>(predicate: F) -> Self
    where
        F: Fn(&Term, &Term, &Term) -> Result<bool, CallbackError> + Send + Sync + 'static,
    {
        Self {
            check: Arc::new(predicate),
        }
    }

    pub fn apply(&self, s: &Term, p: &Term, o: &Term) -> Result<bool, CallbackError> {
        (self.check)(s, p, o)
    }

    /// Create a handle to the same filter.
    ///
    /// This is used instead of Clone to comply with project policy.
    #[must_use]
    #[allow(clippy::disallowed_methods)] // Arc::clone shares the closure
    pub fn clone_value(&self) -> Self {
        Self {
            check: Arc::clone(&self.check),
        }
    }
}

impl fmt::Debug for StatementFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatementFilter").finish_non_exhaustive()
    }
}

/// A global constraint, evaluated once every statement of a pattern has
/// been matched.
///
/// The store is passed explicitly so a constraint can look up further
/// statements.
pub struct Constraint {
    check: Arc<dyn Fn(&Binding, &dyn TripleStore) -> Result<bool, CallbackError> + Send + Sync>,
}

impl Constraint {
    /// Create a constraint from a plain predicate over the binding.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&Binding) -> bool + Send + Sync + 'static,
    {
        Self {
            check: Arc::new(
                move |binding: &Binding, _: &dyn TripleStore| -> Result<bool, CallbackError> {
                    Ok(predicate(binding))
                },
            ),
        }
    }

    /// Create a constraint that also reads the store.
    pub fn with_store<F>(predicate: F) -> Self
    where
        F: Fn(&Binding, &dyn TripleStore) -> Result<bool, CallbackError> + Send + Sync + 'static,
    {
        Self {
            check: Arc::new(predicate),
        }
    }

    /// Create a constraint that may fail. An error aborts the whole evaluation.
    pub fn fallible<F>(predicate: F) -> Self
    where
        F: Fn(&Binding) -> Result<bool, CallbackError> + Send + Sync + 'static,
    {
        Self {
            check: Arc::new(move |binding: &Binding, _: &dyn TripleStore| predicate(binding)),
        }
    }

    pub fn apply(&self, binding: &Binding, store: &dyn TripleStore) -> Result<bool, CallbackError> {
        (self.check)(binding, store)
    }

    /// Create a handle to the same constraint.
    ///
    /// This is used instead of Clone to comply with project policy.
    #[must_use]
    #[allow(clippy::disallowed_methods)] // Arc::clone shares the closure
    pub fn clone_value(&self) -> Self {
        Self {
            check: Arc::clone(&self.check),
        }
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constraint").finish_non_exhaustive()
    }
}

/// Which variables `select` projects.
#[derive(Debug, PartialEq, Eq)]
pub enum Selection {
    /// Every variable seen in the results, in first-seen order.
    All,
    /// The listed variables, in order.
    Columns(Vec<Variable>),
}

impl Selection {
    /// Parse a whitespace-separated selection such as `"?s ?o"`.
    ///
    /// `"*"` and the empty string select everything.
    ///
    /// # Errors
    ///
    /// Returns `InvalidVariable` for any malformed variable name.
    pub fn parse(text: &str) -> Result<Self, ConfigurationError> {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed == "*" {
            return Ok(Self::All);
        }
        trimmed
            .split_whitespace()
            .map(Variable::parse)
            .collect::<Result<Vec<_>, _>>()
            .map(Self::Columns)
    }

    /// Select a list of variables. An empty list selects everything.
    #[must_use]
    pub fn columns(variables: Vec<Variable>) -> Self {
        if variables.is_empty() {
            Self::All
        } else {
            Self::Columns(variables)
        }
    }

    /// Create a copy of this selection.
    ///
    /// This is used instead of Clone to comply with project policy.
    #[must_use]
    pub fn clone_value(&self) -> Self {
        match self {
            Self::All => Self::All,
            Self::Columns(columns) => Self::Columns(columns.iter().map(Variable::clone_value).collect()),
        }
    }
}

/// Sort direction for one ordering key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

/// Ordering applied to full solutions before projection.
pub enum OrderBy {
    /// Lexicographic order over the listed variables. When `directions` is
    /// given it must have one entry per key; otherwise every key ascends.
    Columns {
        keys: Vec<Variable>,
        directions: Option<Vec<Direction>>,
    },
    /// A caller-supplied comparison.
    Comparator(Arc<dyn Fn(&Solution, &Solution) -> Ordering + Send + Sync>),
}

impl OrderBy {
    /// Order ascending by the given variables.
    #[must_use]
    pub const fn columns(keys: Vec<Variable>) -> Self {
        Self::Columns {
            keys,
            directions: None,
        }
    }

    /// Order by the given variables with one direction per key.
    #[must_use]
    pub const fn columns_with(keys: Vec<Variable>, directions: Vec<Direction>) -> Self {
        Self::Columns {
            keys,
            directions: Some(directions),
        }
    }

    /// Order with a custom comparison over full solutions.
    pub fn comparator<F>(compare: F) -> Self
    where
        F: Fn(&Solution, &Solution) -> Ordering + Send + Sync + 'static,
    {
        Self::Comparator(Arc::new(compare))
    }

    /// Pair each key with its direction.
    ///
    /// Returns `None` for a comparator ordering.
    ///
    /// # Errors
    ///
    /// Returns an error if no keys are given or the direction count does
    /// not match the key count.
    pub fn keyed(&self) -> Result<Option<Vec<(&Variable, Direction)>>, ConfigurationError> {
        let Self::Columns { keys, directions } = self else {
            return Ok(None);
        };
        if keys.is_empty() {
            return Err(ConfigurationError::EmptyOrderBy);
        }
        match directions {
            None => Ok(Some(keys.iter().map(|k| (k, Direction::Ascending)).collect())),
            Some(directions) if directions.len() == keys.len() => Ok(Some(
                keys.iter().zip(directions.iter().copied()).collect(),
            )),
            Some(directions) => Err(ConfigurationError::OrderDirectionLength {
                keys: keys.len(),
                directions: directions.len(),
            }),
        }
    }
}

impl fmt::Debug for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Columns { keys, directions } => f
                .debug_struct("Columns")
                .field("keys", keys)
                .field("directions", directions)
                .finish(),
            Self::Comparator(_) => f.debug_struct("Comparator").finish_non_exhaustive(),
        }
    }
}

/// Arguments to `select`.
///
/// `distinct` defaults to `true`; `limit` and `offset` apply after
/// deduplication and ordering.
#[derive(Debug)]
pub struct SelectOptions {
    pub selection: Selection,
    pub distinct: bool,
    pub limit: Option<usize>,
    pub offset: usize,
    pub order_by: Option<OrderBy>,
}

impl SelectOptions {
    #[must_use]
    pub const fn new(selection: Selection) -> Self {
        Self {
            selection,
            distinct: true,
            limit: None,
            offset: 0,
            order_by: None,
        }
    }

    /// Select everything.
    #[must_use]
    pub const fn all() -> Self {
        Self::new(Selection::All)
    }

    #[must_use]
    pub const fn distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub const fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    #[must_use]
    pub fn order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = Some(order_by);
        self
    }
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self::all()
    }
}

/// A single projected result row. `None` marks a column left unset.
#[derive(Debug, PartialEq, Eq, Hash)]
pub enum Row {
    /// Single-column projections yield bare values.
    Value(Option<Term>),
    /// Multi-column projections yield one entry per column.
    Tuple(Vec<Option<Term>>),
}

impl Row {
    /// The bound values in this row, in column order.
    pub fn values(&self) -> impl Iterator<Item = &Term> {
        let entries: &[Option<Term>] = match self {
            Self::Value(value) => std::slice::from_ref(value),
            Self::Tuple(values) => values,
        };
        entries.iter().flatten()
    }

    /// Create a copy of this row.
    ///
    /// This is used instead of Clone to comply with project policy.
    #[must_use]
    pub fn clone_value(&self) -> Self {
        match self {
            Self::Value(value) => Self::Value(value.as_ref().map(Term::clone_value)),
            Self::Tuple(values) => Self::Tuple(
                values
                    .iter()
                    .map(|value| value.as_ref().map(Term::clone_value))
                    .collect(),
            ),
        }
    }
}

/// Result of a `select`.
#[derive(Debug, Default)]
pub struct QueryResult {
    /// The projected variables, in column order.
    pub columns: Vec<Variable>,
    pub rows: Vec<Row>,
}

impl QueryResult {
    #[must_use]
    pub const fn with_columns(columns: Vec<Variable>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    /// Every bound value across all rows, row by row.
    pub fn values(&self) -> impl Iterator<Item = &Term> {
        self.rows.iter().flat_map(Row::values)
    }
}

impl<'a> IntoIterator for &'a QueryResult {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
