//! Genetic algorithm configuration.
//!
//! Defaults match a population of 100 evolved for 1000 generations with a
//! 0.8 crossover rate and a 0.3 per-gene mutation rate. Every field has a
//! serde default, so a config file only needs the values it overrides.

use serde::{Deserialize, Serialize};

use super::DependencyMode;
use crate::error::{PlacementError, Result};

/// Parameters of one optimization run.
///
/// # Example
/// ```
/// use u_placement::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(20)
///     .with_max_generations(50)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaConfig {
    /// Chromosomes per generation (> 0).
    pub population_size: usize,
    /// Generation budget (may be 0: only the initial population is evaluated).
    pub max_generations: usize,
    /// Per-gene probability of redrawing machine and disk, in `[0, 1]`.
    pub mutation_rate: f64,
    /// Per-pair probability of single-point crossover, in `[0, 1]`.
    pub crossover_rate: f64,
    /// RNG seed. `None` seeds from the operating system.
    pub seed: Option<u64>,
    /// Evaluate each generation on the rayon thread pool.
    pub parallel: bool,
    /// Gene processing order used by the evaluator.
    pub dependency_mode: DependencyMode,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 1000,
            mutation_rate: 0.3,
            crossover_rate: 0.8,
            seed: None,
            parallel: true,
            dependency_mode: DependencyMode::ChromosomeOrder,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Sets the generation budget.
    pub fn with_max_generations(mut self, generations: usize) -> Self {
        self.max_generations = generations;
        self
    }

    /// Sets the per-gene mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    /// Fixes the RNG seed for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the dependency resolution mode.
    pub fn with_dependency_mode(mut self, mode: DependencyMode) -> Self {
        self.dependency_mode = mode;
        self
    }

    /// Checks that every parameter is in range.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(PlacementError::config("population_size must be positive"));
        }
        for (name, rate) in [
            ("mutation_rate", self.mutation_rate),
            ("crossover_rate", self.crossover_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(PlacementError::config(format!(
                    "{name} must be within [0, 1], got {rate}"
                )));
            }
        }
        Ok(())
    }
}
