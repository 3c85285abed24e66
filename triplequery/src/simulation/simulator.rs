//! Main simulator harness for deterministic simulation testing.
//!
//! Each iteration generates a graph and a query, builds it through the
//! engine and runs every invariant check against the result.

// Simulation code legitimately needs cloning for test data
#![allow(clippy::disallowed_methods)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::generator::{QueryGenConfig, QueryGenerator};
use super::invariants::{InvariantChecker, InvariantViolation};
use crate::config::EngineConfig;
use crate::query::{QueryEngine, Variable};

/// Configuration for the simulator.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Random seed for reproducibility.
    pub seed: u64,
    /// Graph and query generation configuration.
    pub query_config: QueryGenConfig,
    /// Engine configuration used for every query.
    pub engine_config: EngineConfig,
}

impl SimulatorConfig {
    /// Create a new simulator config with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            query_config: QueryGenConfig::default(),
            engine_config: EngineConfig::default(),
        }
    }

    /// Set the generation configuration.
    #[must_use]
    pub fn with_query_config(mut self, config: QueryGenConfig) -> Self {
        self.query_config = config;
        self
    }

    /// Set the maximum number of optional clauses per query.
    #[must_use]
    pub const fn with_max_optionals(mut self, max_optionals: usize) -> Self {
        self.query_config.max_optionals = max_optionals;
        self
    }
}

/// Results from a simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The seed used for this simulation.
    pub seed: u64,
    /// Number of generated queries.
    pub queries_run: u64,
    /// Queries that produced at least one row.
    pub queries_matched: u64,
    /// Queries the engine refused to build.
    pub build_failures: u64,
    /// Invariant violations detected.
    pub invariant_violations: Vec<InvariantViolation>,
}

impl SimulationResult {
    /// Check if the simulation passed (no invariant violations).
    #[must_use]
    pub fn passed(&self) -> bool {
        self.build_failures == 0 && self.invariant_violations.is_empty()
    }
}

/// The main simulator harness.
pub struct Simulator {
    config: SimulatorConfig,
    generator: QueryGenerator,
    rng: StdRng,
    checker: InvariantChecker,
}

impl Simulator {
    #[must_use]
    pub fn new(config: SimulatorConfig) -> Self {
        let generator = QueryGenerator::with_config(config.seed, config.query_config.clone());
        // Separate stream so slicing choices do not shift generated queries.
        let rng = StdRng::seed_from_u64(config.seed.wrapping_add(1));
        Self {
            config,
            generator,
            rng,
            checker: InvariantChecker::new(),
        }
    }

    /// Run the simulation for a given number of generated queries.
    pub fn run(&mut self, iterations: usize) -> SimulationResult {
        let mut queries_matched = 0;
        let mut build_failures = 0;

        for iteration in 0..iterations {
            let generated = self.generator.next_query();
            let engine = QueryEngine::new(&generated.graph, self.config.engine_config.clone());
            let query = match engine.build(
                std::slice::from_ref(&generated.main),
                &generated.optionals,
            ) {
                Ok(query) => query,
                Err(e) => {
                    self.checker.add_violation(InvariantViolation {
                        description: "generated query failed to build".to_string(),
                        iteration,
                        context: e.to_string(),
                    });
                    build_failures += 1;
                    continue;
                }
            };
            if query.ask() {
                queries_matched += 1;
            }

            self.checker.check_outer_join(
                &generated.graph,
                &generated.main,
                &generated.optionals,
                &query,
                iteration,
            );
            let offset = self.rng.random_range(0..4);
            let limit = self.rng.random_range(0..6);
            let distinct = self.rng.random_bool(0.5);
            self.checker
                .check_slicing(&query, distinct, offset, limit, iteration);
            if let Some(key) = generated.main.unbounds().first() {
                self.checker.check_ordering_permutes(&query, key, iteration);
            }
            let key = Variable::new("opt0_0");
            self.checker.check_ordering_permutes(&query, &key, iteration);
            self.checker.check_repeatable(&query, iteration);
        }

        tracing::debug!(
            seed = self.config.seed,
            iterations,
            queries_matched,
            violations = self.checker.violations().len(),
            "simulation finished"
        );
        SimulationResult {
            seed: self.config.seed,
            queries_run: iterations as u64,
            queries_matched,
            build_failures,
            invariant_violations: self.checker.violations().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::init_tracing;

    #[test]
    fn test_simulator_basic() {
        init_tracing();
        let mut simulator = Simulator::new(SimulatorConfig::new(12345));

        let result = simulator.run(100);

        assert_eq!(result.seed, 12345);
        assert_eq!(result.queries_run, 100);
        assert!(
            result.passed(),
            "seed {} failed: {:?}",
            result.seed,
            result.invariant_violations
        );
    }

    #[test]
    fn test_simulator_finds_matches() {
        let mut simulator = Simulator::new(SimulatorConfig::new(2024));
        let result = simulator.run(200);
        // Small vocabularies make matches common.
        assert!(result.queries_matched > 0);
    }

    #[test]
    fn test_simulator_deterministic() {
        let result1 = Simulator::new(SimulatorConfig::new(777)).run(50);
        let result2 = Simulator::new(SimulatorConfig::new(777)).run(50);

        assert_eq!(result1.queries_matched, result2.queries_matched);
        assert_eq!(
            result1.invariant_violations.len(),
            result2.invariant_violations.len()
        );
    }

    #[test]
    fn test_simulator_without_optionals() {
        let config = SimulatorConfig::new(54321).with_max_optionals(0);
        let result = Simulator::new(config).run(200);

        assert!(
            result.passed(),
            "seed {} failed: {:?}",
            result.seed,
            result.invariant_violations
        );
    }

    #[test]
    fn test_simulator_many_seeds() {
        for seed in 0..20 {
            let result = Simulator::new(SimulatorConfig::new(seed)).run(25);
            assert_eq!(result.seed, seed);
            assert!(
                result.passed(),
                "seed {seed} failed: {:?}",
                result.invariant_violations
            );
        }
    }

    #[test]
    #[ignore] // Long running test
    fn test_simulator_stress() {
        let config = SimulatorConfig::new(99999).with_query_config(QueryGenConfig {
            max_triples: 60,
            max_statements: 4,
            max_optionals: 3,
            ..QueryGenConfig::default()
        });
        let result = Simulator::new(config).run(5_000);

        assert!(
            result.passed(),
            "seed {} failed: {:?}",
            result.seed,
            result.invariant_violations
        );
    }
}
