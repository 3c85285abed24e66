//! Variable bindings for query evaluation.
//!
//! A `Binding` maps a fixed, ordered set of variables to terms. Each node of
//! an expansion tree owns one; matching a statement produces a new binding
//! rather than mutating the parent's.

use super::pattern::StatementPattern;
use super::types::{Slot, Variable};
use crate::types::{Term, Triple};

/// An assignment of terms to query variables.
///
/// # Invariants
///
/// - The variable set is fixed when the binding is created.
/// - A value only ever goes from unbound to bound; derived bindings never
///   reset or overwrite a value.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Binding {
    /// Variables in first-appearance order, each with its value if bound.
    entries: Vec<(Variable, Option<Term>)>,
}

impl Binding {
    /// Create a binding over `variables` with nothing bound.
    ///
    /// Repeated variables are kept once.
    #[must_use]
    pub fn unbound(variables: &[Variable]) -> Self {
        let mut binding = Self::default();
        for variable in variables {
            binding.add_key(variable);
        }
        binding
    }

    /// Create a binding over `variables` with some values already set.
    ///
    /// Variables of `initial` that are not in `variables` are added to the
    /// key set after them.
    #[must_use]
    pub fn with_values(variables: &[Variable], initial: &[(Variable, Term)]) -> Self {
        let mut binding = Self::unbound(variables);
        for (variable, term) in initial {
            binding.add_key(variable);
            if let Some((_, value)) = binding.entry_mut(variable) {
                *value = Some(term.clone_value());
            }
        }
        binding
    }

    fn add_key(&mut self, variable: &Variable) {
        if !self.has(variable) {
            self.entries.push((variable.clone_value(), None));
        }
    }

    fn entry_mut(&mut self, variable: &Variable) -> Option<&mut (Variable, Option<Term>)> {
        self.entries.iter_mut().find(|(key, _)| key == variable)
    }

    /// Get the value bound to a variable.
    #[must_use]
    pub fn get(&self, variable: &Variable) -> Option<&Term> {
        self.entries
            .iter()
            .find(|(key, _)| key == variable)
            .and_then(|(_, value)| value.as_ref())
    }

    /// Get the value bound to a variable by name.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&Term> {
        self.entries
            .iter()
            .find(|(key, _)| key.name == name)
            .and_then(|(_, value)| value.as_ref())
    }

    /// Check if a variable is part of this binding, bound or not.
    #[must_use]
    pub fn has(&self, variable: &Variable) -> bool {
        self.entries.iter().any(|(key, _)| key == variable)
    }

    #[must_use]
    pub fn is_bound(&self, variable: &Variable) -> bool {
        self.get(variable).is_some()
    }

    /// Check if every variable has a value.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.entries.iter().all(|(_, value)| value.is_some())
    }

    /// Get the number of variables, bound or not.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over variables and their values in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&Variable, Option<&Term>)> {
        self.entries
            .iter()
            .map(|(variable, value)| (variable, value.as_ref()))
    }

    /// Iterate over the bound variables only.
    pub fn bound(&self) -> impl Iterator<Item = (&Variable, &Term)> {
        self.entries
            .iter()
            .filter_map(|(variable, value)| value.as_ref().map(|term| (variable, term)))
    }

    /// Derive the binding for a child node that matched `statement` against
    /// `triple`.
    ///
    /// Returns `None` when the triple disagrees with the statement: a fixed
    /// slot holds a different term, a variable is already bound to a
    /// different term, or a variable repeated within the statement would
    /// need two different values.
    #[must_use]
    pub fn extended(&self, statement: &StatementPattern, triple: &Triple) -> Option<Self> {
        let mut next = self.clone_value();
        for (slot, term) in statement.slots().into_iter().zip(triple.components()) {
            match slot {
                Slot::Term(fixed) => {
                    if fixed != term {
                        return None;
                    }
                }
                Slot::Variable(variable) => {
                    // Statement variables are always part of the key set.
                    let Some((_, value)) = next.entry_mut(variable) else {
                        continue;
                    };
                    if let Some(existing) = value.as_ref() {
                        if existing != term {
                            return None;
                        }
                    } else {
                        *value = Some(term.clone_value());
                    }
                }
            }
        }
        Some(next)
    }

    /// A combined view: this binding's entries followed by the entries of
    /// `inherited` for variables this binding does not have.
    #[must_use]
    pub fn overlay(&self, inherited: &Self) -> Self {
        let mut combined = self.clone_value();
        for (variable, value) in &inherited.entries {
            if !combined.has(variable) {
                combined
                    .entries
                    .push((variable.clone_value(), value.as_ref().map(Term::clone_value)));
            }
        }
        combined
    }

    /// Create a copy of this binding.
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
