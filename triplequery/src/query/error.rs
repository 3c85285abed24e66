//! Error types for query construction and evaluation.
//!
//! "No match" is never an error: an unsatisfiable pattern simply yields zero
//! rows. Errors here mean the query was malformed, a user callback failed, or
//! the store could not answer.

use super::types::Variable;
use crate::storage::StoreError;

/// Error returned by a user-supplied filter or constraint.
#[derive(Debug, PartialEq, Eq)]
pub struct CallbackError {
    pub message: String,
}

impl CallbackError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for CallbackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CallbackError {}

/// Malformed query arguments, detected before any store access.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigurationError {
    /// `build` was called without any main pattern.
    NoPatterns,
    /// A main pattern (UNION branch) has no statements.
    EmptyPattern { branch: usize },
    /// An optional clause introduces a variable that an earlier optional
    /// clause already introduced, and the main pattern does not bind it.
    OptionalScope {
        variable: Variable,
        clause: usize,
        earlier_clause: usize,
    },
    /// A selection or ordering key is not a valid variable name.
    InvalidVariable(String),
    /// Ordering directions were given but do not pair up with the keys.
    OrderDirectionLength { keys: usize, directions: usize },
    /// Column ordering was requested with no keys.
    EmptyOrderBy,
}

impl std::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoPatterns => write!(f, "at least one graph pattern is required"),
            Self::EmptyPattern { branch } => {
                write!(f, "graph pattern {branch} has no statements")
            }
            Self::OptionalScope {
                variable,
                clause,
                earlier_clause,
            } => write!(
                f,
                "variable {variable} in optional clause {clause} is already introduced by optional clause {earlier_clause}"
            ),
            Self::InvalidVariable(name) => write!(f, "invalid variable name: {name:?}"),
            Self::OrderDirectionLength { keys, directions } => write!(
                f,
                "order direction count ({directions}) does not match order key count ({keys})"
            ),
            Self::EmptyOrderBy => write!(f, "order by requires at least one key"),
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// A user callback failed while the expansion tree was being built.
#[derive(Debug, PartialEq, Eq)]
pub enum EvaluationError {
    /// A per-statement filter failed. `statement` is the statement as it was
    /// being matched.
    Filter {
        statement: String,
        source: CallbackError,
    },
    /// A global constraint failed.
    Constraint { source: CallbackError },
}

impl std::fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Filter { statement, source } => {
                write!(f, "filter on {statement} failed: {source}")
            }
            Self::Constraint { source } => write!(f, "constraint failed: {source}"),
        }
    }
}

impl std::error::Error for EvaluationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Filter { source, .. } | Self::Constraint { source } => Some(source),
        }
    }
}

/// Errors that can occur while building or evaluating a query.
#[derive(Debug)]
pub enum QueryError {
    Configuration(ConfigurationError),
    Evaluation(EvaluationError),
    Store(StoreError),
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration(e) => write!(f, "configuration error: {e}"),
            Self::Evaluation(e) => write!(f, "evaluation error: {e}"),
            Self::Store(e) => write!(f, "store error: {e}"),
        }
    }
}

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Configuration(e) => Some(e),
            Self::Evaluation(e) => Some(e),
            Self::Store(e) => Some(e),
        }
    }
}

impl From<ConfigurationError> for QueryError {
    fn from(e: ConfigurationError) -> Self {
        Self::Configuration(e)
    }
}

impl From<EvaluationError> for QueryError {
    fn from(e: EvaluationError) -> Self {
        Self::Evaluation(e)
    }
}

impl From<StoreError> for QueryError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}
