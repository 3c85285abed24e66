//! Query engine implementation.
//!
//! The `QueryEngine` builds `Query` handles against a triple store:
//! - every main pattern becomes one UNION branch
//! - OPTIONAL clauses apply to every branch (left join)
//! - optional variable scoping is checked before the store is touched

use super::context::Binding;
use super::error::{ConfigurationError, QueryError};
use super::expansion::{ExpansionContext, ExpansionNode};
use super::handle::Query;
use super::pattern::{GraphPattern, validate_optional_scope};
use super::types::{QueryResult, SelectOptions, Variable};
use crate::config::EngineConfig;
use crate::storage::TripleStore;
use crate::types::Term;

/// The query engine evaluates graph patterns against a triple store.
pub struct QueryEngine<'s> {
    store: &'s dyn TripleStore,
    config: EngineConfig,
}

impl<'s> QueryEngine<'s> {
    /// Create a new query engine for a store.
    #[must_use]
    pub const fn new(store: &'s dyn TripleStore, config: EngineConfig) -> Self {
        Self { store, config }
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Build a query from one or more main patterns and shared optional
    /// clauses.
    ///
    /// # Errors
    ///
    /// Returns a configuration error, before any store access, if:
    /// - `patterns` is empty or one of them has no statements
    /// - an optional clause breaks variable scoping for some branch
    ///
    /// Returns a store or evaluation error if matching fails.
    pub fn build(
        &self,
        patterns: &[GraphPattern],
        optionals: &[GraphPattern],
    ) -> Result<Query<'s>, QueryError> {
        self.build_with_bindings(patterns, optionals, &[])
    }

    /// Like `build`, with some variables fixed up front.
    ///
    /// The initial values seed every branch and are visible to optional
    /// clauses as inherited values.
    pub fn build_with_bindings(
        &self,
        patterns: &[GraphPattern],
        optionals: &[GraphPattern],
        initial: &[(Variable, Term)],
    ) -> Result<Query<'s>, QueryError> {
        Self::validate(patterns, optionals)?;

        let mut query: Option<Query<'s>> = None;
        for (branch, pattern) in patterns.iter().enumerate() {
            let branch_query = self.build_branch(branch, pattern, optionals, initial)?;
            query = Some(match query {
                Some(previous) => previous.union(branch_query),
                None => branch_query,
            });
        }
        query.ok_or_else(|| ConfigurationError::NoPatterns.into())
    }

    /// Build the query and select from it in one step.
    pub fn query(
        &self,
        patterns: &[GraphPattern],
        optionals: &[GraphPattern],
        options: &SelectOptions,
    ) -> Result<QueryResult, QueryError> {
        self.build(patterns, optionals)?.select(options)
    }

    fn validate(patterns: &[GraphPattern], optionals: &[GraphPattern]) -> Result<(), ConfigurationError> {
        if patterns.is_empty() {
            return Err(ConfigurationError::NoPatterns);
        }
        for (branch, pattern) in patterns.iter().enumerate() {
            if pattern.is_empty() {
                return Err(ConfigurationError::EmptyPattern { branch });
            }
            validate_optional_scope(pattern, optionals)?;
        }
        Ok(())
    }

    fn build_branch(
        &self,
        branch: usize,
        pattern: &GraphPattern,
        optionals: &[GraphPattern],
        initial: &[(Variable, Term)],
    ) -> Result<Query<'s>, QueryError> {
        let context = ExpansionContext::new(self.store, pattern.constraints());
        let root = Binding::with_values(pattern.unbounds(), initial);
        let expansion = context.expand(root, pattern.patterns())?;

        let root = match expansion.into_node() {
            Some(node) => Some(node.attach_optionals(self.store, optionals)?),
            None => None,
        };
        let nodes = root.as_ref().map_or(0, ExpansionNode::node_count);
        if context.nodes() > self.config.expansion_warn_nodes {
            tracing::warn!(
                branch,
                nodes = context.nodes(),
                threshold = self.config.expansion_warn_nodes,
                "expansion tree is very large"
            );
        }
        tracing::debug!(
            branch,
            explored = context.nodes(),
            kept = nodes,
            optionals = optionals.len(),
            clash = root.is_none(),
            "built query branch"
        );
        Ok(Query::from_tree(root, self.store, self.config.null_ordering))
    }
}
