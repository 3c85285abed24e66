//! Engine configuration module.
//!
//! This module provides configuration loading for the query engine from
//! environment variables.
//!
//! # Environment Variables
//!
//! - `TRIPLEQUERY_NULL_ORDERING`: Where unbound values sort under column
//!   ordering, `first` or `last` (default: `last`)
//! - `TRIPLEQUERY_EXPANSION_WARN_NODES`: Expansion tree size that triggers a
//!   warning (default: `100000`)
//!
//! # Invariants
//!
//! - `expansion_warn_nodes` is always at least 1

/// Placement of unbound values relative to bound ones when ordering by
/// columns. Applies the same way to ascending and descending keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullOrdering {
    First,
    #[default]
    Last,
}

/// Query engine configuration.
///
/// # Pre-conditions
///
/// When constructed via `from_env()`:
/// - All set environment variables must hold valid values
///
/// # Post-conditions
///
/// - `expansion_warn_nodes` is positive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Where unbound values go under `OrderBy::Columns`.
    pub null_ordering: NullOrdering,
    /// Number of nodes in one expansion tree after which a warning is
    /// logged. Expansion is never cut short.
    pub expansion_warn_nodes: usize,
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            null_ordering: NullOrdering::default(),
            expansion_warn_nodes: Self::DEFAULT_EXPANSION_WARN_NODES,
        }
    }
}

impl EngineConfig {
    /// Default warning threshold for expansion tree size.
    pub const DEFAULT_EXPANSION_WARN_NODES: usize = 100_000;

    const NULL_ORDERING_VAR: &'static str = "TRIPLEQUERY_NULL_ORDERING";
    const EXPANSION_WARN_NODES_VAR: &'static str = "TRIPLEQUERY_EXPANSION_WARN_NODES";

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `TRIPLEQUERY_NULL_ORDERING` is set to something other than `first`
    ///   or `last`
    /// - `TRIPLEQUERY_EXPANSION_WARN_NODES` is set but not a positive integer
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration with `lookup` standing in for the environment.
    ///
    /// # Errors
    ///
    /// Same as `from_env()`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let null_ordering = Self::load_null_ordering(&lookup)?;
        let expansion_warn_nodes = Self::load_expansion_warn_nodes(&lookup)?;

        Ok(Self {
            null_ordering,
            expansion_warn_nodes,
        })
    }

    /// Load the null ordering policy.
    ///
    /// Returns the default if not set.
    fn load_null_ordering<F>(lookup: &F) -> Result<NullOrdering, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(value) = lookup(Self::NULL_ORDERING_VAR) else {
            return Ok(NullOrdering::default());
        };
        match value.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(NullOrdering::First),
            "last" => Ok(NullOrdering::Last),
            _ => Err(ConfigError::InvalidValue {
                name: Self::NULL_ORDERING_VAR.to_string(),
                message: format!("'{value}' is not one of 'first', 'last'"),
            }),
        }
    }

    /// Load the expansion warning threshold.
    ///
    /// Returns the default if not set.
    fn load_expansion_warn_nodes<F>(lookup: &F) -> Result<usize, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(value) = lookup(Self::EXPANSION_WARN_NODES_VAR) else {
            return Ok(Self::DEFAULT_EXPANSION_WARN_NODES);
        };
        match value.trim().parse::<usize>() {
            Ok(nodes) if nodes > 0 => Ok(nodes),
            _ => Err(ConfigError::InvalidValue {
                name: Self::EXPANSION_WARN_NODES_VAR.to_string(),
                message: format!("'{value}' is not a positive integer"),
            }),
        }
    }
}
