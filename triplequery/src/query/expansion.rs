//! Expansion trees: the backtracking matcher.
//!
//! `expand` consumes one statement pattern per tree level. For each level it
//! asks the store for the triples matching the statement (with already bound
//! variables substituted), and builds one child per candidate that passes the
//! statement's filter. A branch where no candidate survives is a clash and is
//! pruned; it never appears in the finished tree.
//!
//! Once a branch has consumed every statement it is a leaf. A leaf is bound
//! when every variable has a value, and only bound leaves are checked
//! against the global constraints. Optional clauses are attached afterwards,
//! one independent sub-tree per clause per bound leaf.
//!
//! Trees are immutable once built. Nothing is cut short: the size of a tree
//! is the product of the candidate counts along each branch.

use std::cell::Cell;

use super::context::Binding;
use super::error::{EvaluationError, QueryError};
use super::pattern::{GraphPattern, StatementPattern};
use super::types::Constraint;
use crate::storage::TripleStore;
use crate::types::Triple;

/// Outcome of expanding a binding over a list of statements.
#[derive(Debug)]
pub enum Expansion {
    /// No assignment satisfies the statements and constraints.
    Clash,
    /// At least one branch survived.
    Matched(ExpansionNode),
}

impl Expansion {
    #[must_use]
    pub const fn is_clash(&self) -> bool {
        matches!(self, Self::Clash)
    }

    /// The tree, if the expansion did not clash.
    #[must_use]
    pub fn into_node(self) -> Option<ExpansionNode> {
        match self {
            Self::Clash => None,
            Self::Matched(node) => Some(node),
        }
    }
}

/// One node of an expansion tree.
///
/// # Invariants
///
/// - `children` never contains a clash.
/// - `optional_trees` is empty unless this is a bound leaf.
/// - A leaf's `binding` is the full assignment for its branch.
#[derive(Debug)]
pub struct ExpansionNode {
    binding: Binding,
    /// The triple matched to reach this node. `None` for a root.
    matched: Option<Triple>,
    children: Vec<ExpansionNode>,
    /// One tree per optional clause that matched at this leaf, in
    /// declaration order.
    optional_trees: Vec<ExpansionNode>,
    bound: bool,
}

impl ExpansionNode {
    #[must_use]
    pub const fn binding(&self) -> &Binding {
        &self.binding
    }

    #[must_use]
    pub const fn matched(&self) -> Option<&Triple> {
        self.matched.as_ref()
    }

    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    #[must_use]
    pub fn optional_trees(&self) -> &[Self] {
        &self.optional_trees
    }

    /// Check if every variable of this branch is resolved. Only meaningful
    /// for leaves.
    #[must_use]
    pub const fn is_bound(&self) -> bool {
        self.bound
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Check if this is a leaf that yields rows.
    #[must_use]
    pub fn is_valid_leaf(&self) -> bool {
        self.is_leaf() && self.bound
    }

    /// Count the nodes of this tree, optional sub-trees included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
            + self.optional_trees.iter().map(Self::node_count).sum::<usize>()
    }

    /// Attach optional sub-trees to every bound leaf, in declaration order.
    ///
    /// Each clause is rewritten with the leaf's values, so inherited
    /// variables are not solved again, then expanded against `store` with
    /// the leaf's binding visible to the clause's constraints. Clauses that
    /// clash are left out: they contribute no rows, which leaves the leaf's
    /// own row as is.
    pub fn attach_optionals(
        mut self,
        store: &dyn TripleStore,
        optionals: &[GraphPattern],
    ) -> Result<Self, QueryError> {
        if optionals.is_empty() {
            return Ok(self);
        }
        if !self.is_leaf() {
            self.children = self
                .children
                .into_iter()
                .map(|child| child.attach_optionals(store, optionals))
                .collect::<Result<_, _>>()?;
            return Ok(self);
        }
        if !self.bound {
            return Ok(self);
        }
        for (clause, optional) in optionals.iter().enumerate() {
            let rewritten = optional.substitute(&self.binding);
            let context =
                ExpansionContext::new(store, rewritten.constraints()).inheriting(&self.binding);
            let root = Binding::unbound(rewritten.unbounds());
            match context.expand(root, rewritten.patterns())? {
                Expansion::Matched(tree) => {
                    tracing::trace!(clause, nodes = context.nodes(), "attached optional clause");
                    self.optional_trees.push(tree);
                }
                Expansion::Clash => tracing::trace!(clause, "optional clause did not match"),
            }
        }
        Ok(self)
    }
}

/// Everything `expand` needs besides the binding and statements.
///
/// The store is passed explicitly rather than hidden in the binding.
pub struct ExpansionContext<'a> {
    store: &'a dyn TripleStore,
    constraints: &'a [Constraint],
    /// Values from the enclosing branch, visible to constraints of an
    /// optional clause.
    inherited: Option<&'a Binding>,
    nodes: Cell<usize>,
}

impl<'a> ExpansionContext<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn TripleStore, constraints: &'a [Constraint]) -> Self {
        Self {
            store,
            constraints,
            inherited: None,
            nodes: Cell::new(0),
        }
    }

    /// Make `inherited` visible to constraints alongside each leaf binding.
    #[must_use]
    pub fn inheriting(mut self, inherited: &'a Binding) -> Self {
        self.inherited = Some(inherited);
        self
    }

    /// Number of nodes created so far, clashing ones included.
    #[must_use]
    pub fn nodes(&self) -> usize {
        self.nodes.get()
    }

    /// Expand `binding` over `statements`.
    ///
    /// Returns `Clash` when no branch survives. Errors come only from the
    /// store or from user filters and constraints, and abort the whole
    /// expansion.
    pub fn expand(
        &self,
        binding: Binding,
        statements: &[StatementPattern],
    ) -> Result<Expansion, QueryError> {
        self.expand_node(binding, None, statements)
    }

    fn expand_node(
        &self,
        binding: Binding,
        matched: Option<Triple>,
        remaining: &[StatementPattern],
    ) -> Result<Expansion, QueryError> {
        self.nodes.set(self.nodes.get() + 1);

        let Some((head, rest)) = remaining.split_first() else {
            return self.finish_leaf(binding, matched);
        };

        let statement = head.substitute(&binding);
        let [subject, predicate, object] = statement.fixed_terms();
        let candidates = self.store.triples_matching(subject, predicate, object)?;

        let mut children = Vec::new();
        for triple in candidates {
            let accepted = statement
                .accepts(&triple)
                .map_err(|source| EvaluationError::Filter {
                    statement: statement.to_string(),
                    source,
                })?;
            if !accepted {
                continue;
            }
            let Some(next) = binding.extended(&statement, &triple) else {
                continue;
            };
            if let Expansion::Matched(child) = self.expand_node(next, Some(triple), rest)? {
                children.push(child);
            }
        }

        if children.is_empty() {
            tracing::trace!(%statement, "clash");
            return Ok(Expansion::Clash);
        }
        Ok(Expansion::Matched(ExpansionNode {
            binding,
            matched,
            children,
            optional_trees: Vec::new(),
            bound: false,
        }))
    }

    fn finish_leaf(&self, binding: Binding, matched: Option<Triple>) -> Result<Expansion, QueryError> {
        let bound = binding.is_complete();
        if bound && !self.constraints_hold(&binding)? {
            tracing::trace!("clash on constraint");
            return Ok(Expansion::Clash);
        }
        Ok(Expansion::Matched(ExpansionNode {
            binding,
            matched,
            children: Vec::new(),
            optional_trees: Vec::new(),
            bound,
        }))
    }

    fn constraints_hold(&self, binding: &Binding) -> Result<bool, QueryError> {
        if self.constraints.is_empty() {
            return Ok(true);
        }
        let combined;
        let view = match self.inherited {
            Some(inherited) => {
                combined = binding.overlay(inherited);
                &combined
            }
            None => binding,
        };
        for constraint in self.constraints {
            let holds = constraint
                .apply(view, self.store)
                .map_err(|source| EvaluationError::Constraint { source })?;
            if !holds {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
