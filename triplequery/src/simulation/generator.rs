//! Random graph and pattern generation for deterministic simulation.
//!
//! Vocabularies are kept small so that random patterns join, clash and
//! repeat values often.

// Simulation code legitimately needs cloning for test data
#![allow(clippy::disallowed_methods)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::query::{GraphPattern, Slot, StatementPattern, Variable};
use crate::storage::Graph;
use crate::types::{Term, Triple};

/// Configuration for graph and query generation.
#[derive(Debug, Clone)]
pub struct QueryGenConfig {
    /// Number of distinct IRIs usable as subjects and objects.
    pub nodes: usize,
    /// Number of distinct predicate IRIs.
    pub predicates: usize,
    /// Number of distinct literal objects.
    pub literals: usize,
    /// Maximum number of triples per graph (duplicates collapse).
    pub max_triples: usize,
    /// Maximum statements in the main pattern.
    pub max_statements: usize,
    /// Maximum number of optional clauses.
    pub max_optionals: usize,
    /// Size of the main pattern's variable pool.
    pub variable_pool: usize,
    /// Probability that a slot holds a variable (0.0 - 1.0).
    pub variable_rate: f64,
}

impl Default for QueryGenConfig {
    fn default() -> Self {
        Self {
            nodes: 6,
            predicates: 3,
            literals: 3,
            max_triples: 24,
            max_statements: 3,
            max_optionals: 2,
            variable_pool: 4,
            variable_rate: 0.6,
        }
    }
}

/// One generated query against one generated graph.
#[derive(Debug)]
pub struct GeneratedQuery {
    pub graph: Graph,
    pub main: GraphPattern,
    pub optionals: Vec<GraphPattern>,
}

/// Generator for random graphs and patterns.
///
/// Produces the same sequence for the same seed.
pub struct QueryGenerator {
    rng: StdRng,
    config: QueryGenConfig,
}

impl QueryGenerator {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, QueryGenConfig::default())
    }

    #[must_use]
    pub fn with_config(seed: u64, config: QueryGenConfig) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            config,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &QueryGenConfig {
        &self.config
    }

    /// Generate the next graph together with a pattern and its optionals.
    pub fn next_query(&mut self) -> GeneratedQuery {
        let graph = self.next_graph();
        let main = self.next_main_pattern();
        let optional_count = self.rng.random_range(0..=self.config.max_optionals);
        let optionals = (0..optional_count)
            .map(|clause| self.next_optional(&main, clause))
            .collect();
        GeneratedQuery {
            graph,
            main,
            optionals,
        }
    }

    /// Generate a random graph over the node, predicate and literal pools.
    pub fn next_graph(&mut self) -> Graph {
        let count = self.rng.random_range(0..=self.config.max_triples);
        (0..count)
            .map(|_| {
                let subject = self.node();
                let predicate = self.predicate();
                let object = self.object();
                Triple::new(subject, predicate, object)
            })
            .collect()
    }

    fn next_main_pattern(&mut self) -> GraphPattern {
        let count = self.rng.random_range(1..=self.config.max_statements);
        let statements: Vec<StatementPattern> = (0..count)
            .map(|_| {
                let subject = self.main_slot(Self::node);
                let predicate = self.main_slot(Self::predicate);
                let object = self.main_slot(Self::object);
                StatementPattern::new(subject, predicate, object)
            })
            .collect();
        GraphPattern::from_patterns(statements)
    }

    /// An optional clause that only introduces variables of its own, so it
    /// always passes scope validation.
    fn next_optional(&mut self, main: &GraphPattern, clause: usize) -> GraphPattern {
        let shared: Vec<Variable> = main.unbounds().iter().map(Variable::clone_value).collect();
        let count = self.rng.random_range(1..=2);
        let statements: Vec<StatementPattern> = (0..count)
            .map(|_| {
                let subject = self.optional_slot(&shared, clause, Self::node);
                let predicate = self.optional_slot(&shared, clause, Self::predicate);
                let object = self.optional_slot(&shared, clause, Self::object);
                StatementPattern::new(subject, predicate, object)
            })
            .collect();
        GraphPattern::from_patterns(statements)
    }

    fn main_slot(&mut self, term: fn(&mut Self) -> Term) -> Slot {
        if self.rng.random::<f64>() < self.config.variable_rate {
            let index = self.rng.random_range(0..self.config.variable_pool);
            Slot::var(format!("v{index}"))
        } else {
            Slot::Term(term(self))
        }
    }

    fn optional_slot(
        &mut self,
        shared: &[Variable],
        clause: usize,
        term: fn(&mut Self) -> Term,
    ) -> Slot {
        let roll = self.rng.random::<f64>();
        if roll < 0.35 && !shared.is_empty() {
            let index = self.rng.random_range(0..shared.len());
            Slot::Variable(shared[index].clone_value())
        } else if roll < 0.7 {
            let index = self.rng.random_range(0..2);
            Slot::var(format!("opt{clause}_{index}"))
        } else {
            Slot::Term(term(self))
        }
    }

    fn node(&mut self) -> Term {
        let index = self.rng.random_range(0..self.config.nodes);
        Term::iri(format!("http://example.org/n{index}"))
    }

    fn predicate(&mut self) -> Term {
        let index = self.rng.random_range(0..self.config.predicates);
        Term::iri(format!("http://example.org/p{index}"))
    }

    fn object(&mut self) -> Term {
        if self.rng.random_bool(0.7) {
            self.node()
        } else {
            let index = self.rng.random_range(0..self.config.literals);
            Term::literal(format!("l{index}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triples(graph: &Graph) -> Vec<Triple> {
        graph.iter().map(Triple::clone_value).collect()
    }

    fn statements(pattern: &GraphPattern) -> Vec<String> {
        pattern.patterns().iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_generator_deterministic() {
        let mut first = QueryGenerator::new(42);
        let mut second = QueryGenerator::new(42);
        for _ in 0..20 {
            let a = first.next_query();
            let b = second.next_query();
            assert_eq!(triples(&a.graph), triples(&b.graph));
            assert_eq!(statements(&a.main), statements(&b.main));
            assert_eq!(a.optionals.len(), b.optionals.len());
        }
    }

    #[test]
    fn test_generated_main_pattern_is_not_empty() {
        let mut generator = QueryGenerator::new(7);
        for _ in 0..50 {
            let query = generator.next_query();
            assert!(!query.main.is_empty());
            assert!(query.optionals.len() <= generator.config().max_optionals);
        }
    }

    #[test]
    fn test_generated_optionals_pass_scope_validation() {
        let mut generator = QueryGenerator::new(99);
        for _ in 0..100 {
            let query = generator.next_query();
            crate::query::validate_optional_scope(&query.main, &query.optionals)
                .expect("generated optionals are scoped");
        }
    }
}
