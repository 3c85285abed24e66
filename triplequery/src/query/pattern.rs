//! Statement patterns and graph patterns.
//!
//! A `GraphPattern` is an ordered list of statement patterns plus global
//! constraints. It tracks the variables its statements reference (its
//! "unbounds") in first-appearance order.

use std::fmt;
use std::ops::Add;

use super::context::Binding;
use super::error::{CallbackError, ConfigurationError};
use super::types::{Constraint, Slot, StatementFilter, Variable};
use crate::types::{Term, Triple};

/// A triple where any position can be a variable.
#[derive(Debug)]
pub struct StatementPattern {
    pub subject: Slot,
    pub predicate: Slot,
    pub object: Slot,
    filter: Option<StatementFilter>,
}

impl StatementPattern {
    #[must_use]
    pub fn new(subject: impl Into<Slot>, predicate: impl Into<Slot>, object: impl Into<Slot>) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
            filter: None,
        }
    }

    /// Attach a filter that every matched triple must pass.
    #[must_use]
    pub fn with_filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Term, &Term, &Term) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(StatementFilter::new(predicate));
        self
    }

    /// Attach a filter that may fail.
    #[must_use]
    pub fn with_fallible_filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Term, &Term, &Term) -> Result<bool, CallbackError> + Send + Sync + 'static,
    {
        self.filter = Some(StatementFilter::fallible(predicate));
        self
    }

    #[must_use]
    pub const fn slots(&self) -> [&Slot; 3] {
        [&self.subject, &self.predicate, &self.object]
    }

    /// Variables in slot order. A repeated variable is yielded each time.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.slots().into_iter().filter_map(Slot::as_variable)
    }

    /// The fixed components, for a store lookup.
    #[must_use]
    pub const fn fixed_terms(&self) -> [Option<&Term>; 3] {
        [
            self.subject.as_term(),
            self.predicate.as_term(),
            self.object.as_term(),
        ]
    }

    /// Rewrite every variable slot bound in `binding` to its value.
    #[must_use]
    pub fn substitute(&self, binding: &Binding) -> Self {
        let rewrite = |slot: &Slot| match slot {
            Slot::Variable(variable) => binding
                .get(variable)
                .map_or_else(|| slot.clone_value(), |term| Slot::Term(term.clone_value())),
            Slot::Term(_) => slot.clone_value(),
        };
        Self {
            subject: rewrite(&self.subject),
            predicate: rewrite(&self.predicate),
            object: rewrite(&self.object),
            filter: self.filter.as_ref().map(StatementFilter::clone_value),
        }
    }

    /// Run the filter, if any, on a candidate triple.
    pub fn accepts(&self, triple: &Triple) -> Result<bool, CallbackError> {
        self.filter.as_ref().map_or(Ok(true), |filter| {
            filter.apply(&triple.subject, &triple.predicate, &triple.object)
        })
    }

    /// Build a concrete triple, resolving each slot with `resolve`.
    ///
    /// Returns `None` if any slot cannot be resolved, or if the subject
    /// would be a literal.
    pub fn instantiate<F>(&self, mut resolve: F) -> Option<Triple>
    where
        F: FnMut(&Slot) -> Option<Term>,
    {
        let subject = resolve(&self.subject)?;
        if !subject.is_subject_capable() {
            return None;
        }
        let predicate = resolve(&self.predicate)?;
        let object = resolve(&self.object)?;
        Some(Triple::new(subject, predicate, object))
    }

    /// Create a copy of this statement pattern.
    ///
    /// This is used instead of Clone to comply with project policy.
    #[must_use]
    pub fn clone_value(&self) -> Self {
        Self {
            subject: self.subject.clone_value(),
            predicate: self.predicate.clone_value(),
            object: self.object.clone_value(),
            filter: self.filter.as_ref().map(StatementFilter::clone_value),
        }
    }
}

impl fmt::Display for StatementPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {})", self.subject, self.predicate, self.object)
    }
}

/// An ordered conjunction of statement patterns with global constraints.
///
/// Statements are matched in list order, so putting the most selective
/// statement first keeps the expansion tree small.
#[derive(Debug, Default)]
pub struct GraphPattern {
    patterns: Vec<StatementPattern>,
    constraints: Vec<Constraint>,
    /// Variables referenced by `patterns`, in first-appearance order.
    unbounds: Vec<Variable>,
    /// Labels of blank nodes this pattern introduces. Only these are
    /// minted afresh when the pattern is used as a construct template.
    blank_nodes: Vec<String>,
}

impl GraphPattern {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pattern from a list of statements.
    #[must_use]
    pub fn from_patterns(patterns: impl IntoIterator<Item = StatementPattern>) -> Self {
        let mut pattern = Self::new();
        pattern.add_patterns(patterns);
        pattern
    }

    /// Append a statement (builder style).
    #[must_use]
    pub fn with_pattern(mut self, pattern: StatementPattern) -> Self {
        self.add_pattern(pattern);
        self
    }

    /// Declare blank node labels as introduced by this pattern (builder style).
    #[must_use]
    pub fn with_blank_nodes<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for label in labels {
            self.declare_blank_node(label.into());
        }
        self
    }

    /// Add a constraint (builder style).
    #[must_use]
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.add_constraint(constraint);
        self
    }

    pub fn add_pattern(&mut self, pattern: StatementPattern) {
        for variable in pattern.variables() {
            if !self.unbounds.contains(variable) {
                self.unbounds.push(variable.clone_value());
            }
        }
        self.patterns.push(pattern);
    }

    pub fn add_patterns(&mut self, patterns: impl IntoIterator<Item = StatementPattern>) {
        for pattern in patterns {
            self.add_pattern(pattern);
        }
    }

    /// Put a statement in front of the existing ones.
    pub fn insert_pattern(&mut self, pattern: StatementPattern) {
        self.patterns.insert(0, pattern);
        self.refresh_unbounds();
    }

    /// Put statements in front of the existing ones, keeping their order.
    pub fn insert_patterns(&mut self, patterns: impl IntoIterator<Item = StatementPattern>) {
        let tail = std::mem::take(&mut self.patterns);
        self.patterns = patterns.into_iter().chain(tail).collect();
        self.refresh_unbounds();
    }

    /// Create a blank node owned by this pattern.
    pub fn blank_node(&mut self, label: impl Into<String>) -> Term {
        let label = label.into();
        let term = Term::blank(label.as_str());
        self.declare_blank_node(label);
        term
    }

    fn declare_blank_node(&mut self, label: String) {
        if !self.blank_nodes.contains(&label) {
            self.blank_nodes.push(label);
        }
    }

    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    pub fn add_constraints(&mut self, constraints: impl IntoIterator<Item = Constraint>) {
        self.constraints.extend(constraints);
    }

    /// Append another pattern's statements and constraints.
    pub fn merge(&mut self, other: Self) {
        self.add_patterns(other.patterns);
        self.add_constraints(other.constraints);
        for label in other.blank_nodes {
            self.declare_blank_node(label);
        }
    }

    fn refresh_unbounds(&mut self) {
        self.unbounds.clear();
        for pattern in &self.patterns {
            for variable in pattern.variables() {
                if !self.unbounds.contains(variable) {
                    self.unbounds.push(variable.clone_value());
                }
            }
        }
    }

    #[must_use]
    pub fn patterns(&self) -> &[StatementPattern] {
        &self.patterns
    }

    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    #[must_use]
    pub fn unbounds(&self) -> &[Variable] {
        &self.unbounds
    }

    #[must_use]
    pub fn blank_nodes(&self) -> &[String] {
        &self.blank_nodes
    }

    /// Check if `label` names a blank node this pattern introduced.
    #[must_use]
    pub fn owns_blank_node(&self, label: &str) -> bool {
        self.blank_nodes.iter().any(|owned| owned == label)
    }

    /// Check if the pattern has no statements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Rewrite the statements with the values bound in `binding`.
    ///
    /// Variables bound there are inherited rather than solved again, so
    /// they drop out of the result's unbounds. Constraints carry over
    /// unchanged.
    #[must_use]
    pub fn substitute(&self, binding: &Binding) -> Self {
        Self {
            patterns: self
                .patterns
                .iter()
                .map(|pattern| pattern.substitute(binding))
                .collect(),
            constraints: self.constraints.iter().map(Constraint::clone_value).collect(),
            unbounds: self
                .unbounds
                .iter()
                .filter(|variable| !binding.is_bound(variable))
                .map(Variable::clone_value)
                .collect(),
            blank_nodes: self.blank_nodes.iter().map(|label| label.as_str().to_owned()).collect(),
        }
    }

    /// Create a copy of this graph pattern.
    ///
    /// This is used instead of Clone to comply with project policy.
    #[must_use]
    pub fn clone_value(&self) -> Self {
        Self {
            patterns: self.patterns.iter().map(StatementPattern::clone_value).collect(),
            constraints: self.constraints.iter().map(Constraint::clone_value).collect(),
            unbounds: self.unbounds.iter().map(Variable::clone_value).collect(),
            blank_nodes: self.blank_nodes.iter().map(|label| label.as_str().to_owned()).collect(),
        }
    }
}

impl Add for GraphPattern {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        self.merge(other);
        self
    }
}

/// Check that optional clauses do not fight over variables.
///
/// A variable of optional clause `i` is fine if the main pattern references
/// it (its value is then inherited). Otherwise no earlier clause `j < i` may
/// also reference it, since both would try to resolve it independently.
///
/// # Errors
///
/// Returns `OptionalScope` naming the first offending variable.
pub fn validate_optional_scope(
    main: &GraphPattern,
    optionals: &[GraphPattern],
) -> Result<(), ConfigurationError> {
    for (clause, optional) in optionals.iter().enumerate() {
        for variable in optional.unbounds() {
            if main.unbounds().contains(variable) {
                continue;
            }
            let earlier = optionals
                .iter()
                .take(clause)
                .position(|earlier| earlier.unbounds().contains(variable));
            if let Some(earlier_clause) = earlier {
                return Err(ConfigurationError::OptionalScope {
                    variable: variable.clone_value(),
                    clause,
                    earlier_clause,
                });
            }
        }
    }
    Ok(())
}
