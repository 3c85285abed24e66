//! Built query handles.
//!
//! A `Query` is either one expansion tree over a store, or the lazy union of
//! two other queries. Terminal operations (`select`, `ask`, `construct`,
//! clustering) walk the tree or trees each time they are called; building a
//! union never re-evaluates either side.

use std::fmt;
use std::ops::Add;

use super::error::QueryError;
use super::expansion::ExpansionNode;
use super::pattern::GraphPattern;
use super::results::{
    Solution, all_variables, collect_matched, collect_solutions, compare_by_columns, dedupe_rows,
};
use super::types::{OrderBy, QueryResult, Row, SelectOptions, Selection, Slot, Variable};
use crate::config::NullOrdering;
use crate::storage::{Graph, StoreError, TripleStore, cluster_backward, cluster_forward};
use crate::types::Term;

type Walk = fn(&dyn TripleStore, &Term, &mut Graph) -> Result<(), StoreError>;

enum QueryKind<'s> {
    /// One evaluated pattern. `root` is `None` when the pattern clashed.
    Tree {
        root: Option<ExpansionNode>,
        store: &'s dyn TripleStore,
    },
    /// Rows of the first query followed by rows of the second.
    Union(Box<Query<'s>>, Box<Query<'s>>),
}

/// A built query, ready for terminal operations.
///
/// Holds a shared borrow of the store it was built against; the store must
/// not change while the query is alive.
pub struct Query<'s> {
    kind: QueryKind<'s>,
    null_ordering: NullOrdering,
}

impl<'s> Query<'s> {
    pub(crate) const fn from_tree(
        root: Option<ExpansionNode>,
        store: &'s dyn TripleStore,
        null_ordering: NullOrdering,
    ) -> Self {
        Self {
            kind: QueryKind::Tree { root, store },
            null_ordering,
        }
    }

    /// Combine two queries into their union. Neither side is re-evaluated.
    ///
    /// The result uses this query's null ordering.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        let null_ordering = self.null_ordering;
        Self {
            kind: QueryKind::Union(Box::new(self), Box::new(other)),
            null_ordering,
        }
    }

    #[must_use]
    pub const fn is_union(&self) -> bool {
        matches!(self.kind, QueryKind::Union(..))
    }

    /// The expansion tree, for a non-union query that matched.
    #[must_use]
    pub const fn root(&self) -> Option<&ExpansionNode> {
        match &self.kind {
            QueryKind::Tree { root, .. } => root.as_ref(),
            QueryKind::Union(..) => None,
        }
    }

    /// All full solutions, union branches in order.
    #[must_use]
    pub fn solutions(&self) -> Vec<Solution> {
        let mut out = Vec::new();
        self.collect_into(&mut out);
        out
    }

    fn collect_into(&self, out: &mut Vec<Solution>) {
        match &self.kind {
            QueryKind::Tree { root, .. } => {
                if let Some(root) = root {
                    collect_solutions(root, out);
                }
            }
            QueryKind::Union(first, second) => {
                first.collect_into(out);
                second.collect_into(out);
            }
        }
    }

    /// Every variable appearing in any result row, in first-seen order.
    #[must_use]
    pub fn all_variables(&self) -> Vec<Variable> {
        all_variables(&self.solutions())
    }

    /// Project, deduplicate, order and slice the results.
    ///
    /// Ordering happens on full solutions before projection, so sort keys
    /// need not be selected. `offset` and `limit` apply after `distinct`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a malformed ordering.
    pub fn select(&self, options: &SelectOptions) -> Result<QueryResult, QueryError> {
        let keys = match &options.order_by {
            Some(order_by) => order_by.keyed()?,
            None => None,
        };

        let mut solutions = self.solutions();
        match (&options.order_by, keys) {
            (_, Some(keys)) => {
                solutions.sort_by(|a, b| compare_by_columns(a, b, &keys, self.null_ordering));
            }
            (Some(OrderBy::Comparator(compare)), None) => solutions.sort_by(|a, b| compare(a, b)),
            _ => {}
        }

        let columns = match &options.selection {
            Selection::All => all_variables(&solutions),
            Selection::Columns(columns) => columns.iter().map(Variable::clone_value).collect(),
        };
        let mut rows: Vec<Row> = solutions
            .iter()
            .map(|solution| solution.project(&columns))
            .collect();
        if options.distinct {
            dedupe_rows(&mut rows);
        }

        let mut result = QueryResult::with_columns(columns);
        let limit = options.limit.unwrap_or(usize::MAX);
        for row in rows.into_iter().skip(options.offset).take(limit) {
            result.push(row);
        }
        tracing::debug!(
            solutions = solutions.len(),
            rows = result.len(),
            "select finished"
        );
        Ok(result)
    }

    /// Check if the query has at least one result row.
    #[must_use]
    pub fn ask(&self) -> bool {
        !self.solutions().is_empty()
    }

    /// Build a new graph from the results.
    ///
    /// With no template, every bound leaf re-emits the triples matched along
    /// its branch (optional matches excluded). With a template, each
    /// statement is instantiated per result row; statements with a variable
    /// that row leaves unbound are skipped for that row. Blank nodes the
    /// template declares as its own become fresh blank nodes per row; any
    /// other blank node is copied as is.
    #[must_use]
    pub fn construct(&self, template: Option<&GraphPattern>) -> Graph {
        let graph = match template {
            None => self.matched_statements(),
            Some(template) => self.instantiate(template),
        };
        tracing::debug!(triples = graph.len(), "construct finished");
        graph
    }

    fn matched_statements(&self) -> Graph {
        match &self.kind {
            QueryKind::Tree { root, .. } => {
                let mut graph = Graph::new();
                if let Some(root) = root {
                    collect_matched(root, &mut graph);
                }
                graph
            }
            QueryKind::Union(first, second) => first
                .matched_statements()
                .union(&second.matched_statements()),
        }
    }

    fn instantiate(&self, template: &GraphPattern) -> Graph {
        let call_id: u64 = rand::random();
        let mut graph = Graph::new();
        for (row, solution) in self.solutions().iter().enumerate() {
            for statement in template.patterns() {
                let triple = statement.instantiate(|slot| match slot {
                    Slot::Variable(variable) => solution.get(variable).map(Term::clone_value),
                    Slot::Term(Term::BlankNode(label)) if template.owns_blank_node(label) => {
                        Some(Term::blank(format!("{label}_{call_id:016x}_{row}")))
                    }
                    Slot::Term(term) => Some(term.clone_value()),
                });
                if let Some(triple) = triple {
                    graph.insert(triple);
                }
            }
        }
        graph
    }

    /// Everything reachable forwards from the selected values.
    ///
    /// Values that cannot be subjects are skipped.
    pub fn cluster_forward(&self, selection: &Selection) -> Result<Graph, QueryError> {
        self.cluster_with(selection, cluster_forward)
    }

    /// Everything reachable backwards from the selected values.
    pub fn cluster_backward(&self, selection: &Selection) -> Result<Graph, QueryError> {
        self.cluster_with(selection, cluster_backward)
    }

    /// Union of the backward and forward clusters.
    pub fn cluster(&self, selection: &Selection) -> Result<Graph, QueryError> {
        let backward = self.cluster_backward(selection)?;
        let forward = self.cluster_forward(selection)?;
        Ok(backward.union(&forward))
    }

    /// Describe the selected values by clustering in the requested
    /// directions. An empty graph if neither direction is requested.
    pub fn describe(
        &self,
        selection: &Selection,
        forward: bool,
        backward: bool,
    ) -> Result<Graph, QueryError> {
        match (forward, backward) {
            (true, true) => self.cluster(selection),
            (true, false) => self.cluster_forward(selection),
            (false, true) => self.cluster_backward(selection),
            (false, false) => Ok(Graph::new()),
        }
    }

    fn cluster_with(&self, selection: &Selection, walk: Walk) -> Result<Graph, QueryError> {
        match &self.kind {
            QueryKind::Tree { store, .. } => {
                let seeds = self.select(&SelectOptions::new(selection.clone_value()))?;
                let mut graph = Graph::new();
                for seed in seeds.values().filter(|term| term.is_subject_capable()) {
                    walk(*store, seed, &mut graph)?;
                }
                tracing::debug!(seeds = seeds.len(), triples = graph.len(), "cluster finished");
                Ok(graph)
            }
            QueryKind::Union(first, second) => {
                let first = first.cluster_with(selection, walk)?;
                let second = second.cluster_with(selection, walk)?;
                Ok(first.union(&second))
            }
        }
    }
}

impl<'s> Add for Query<'s> {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.union(other)
    }
}

impl fmt::Debug for Query<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            QueryKind::Tree { root, .. } => f
                .debug_struct("Query")
                .field("root", root)
                .field("null_ordering", &self.null_ordering)
                .finish_non_exhaustive(),
            QueryKind::Union(first, second) => {
                f.debug_tuple("Union").field(first).field(second).finish()
            }
        }
    }
}
