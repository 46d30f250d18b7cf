//! Generational loop.
//!
//! ```text
//! Init → (Evaluate → Select → Recombine → Mutate → Replace) × G → Finalize
//! ```
//!
//! Replacement is unconditional (no elitism). The best feasible chromosome
//! is tracked across the whole run instead, and only replaced by a strictly
//! shorter makespan, so the reported history never increases.
//!
//! A generation in which every chromosome is infeasible has zero total
//! fitness and cannot be sampled; it is replaced by a fresh random
//! population drawn from the same RNG stream.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{Chromosome, DependencyMode, Evaluation, Evaluator, GaConfig, Population};
use crate::error::{PlacementError, Result};
use crate::models::{Problem, Schedule};

/// Outcome of a successful optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Best feasible chromosome seen.
    pub best: Chromosome,
    /// Its makespan.
    pub makespan: u64,
    /// Generations evolved (excluding the final evaluation).
    pub generations: usize,
    /// Generations that were entirely infeasible and got re-initialized.
    pub degenerate_generations: usize,
    /// Chromosome evaluations performed.
    pub evaluations: usize,
    /// Best makespan so far after each generation; `None` until one is found.
    pub history: Vec<Option<u64>>,
    /// Evaluation order the makespan was computed with.
    pub dependency_mode: DependencyMode,
}

impl OptimizationResult {
    /// Replays the best chromosome into a per-job schedule.
    pub fn schedule(&self, problem: &Problem) -> Result<Schedule> {
        Ok(Evaluator::new(problem)
            .with_mode(self.dependency_mode)
            .decode(&self.best)?)
    }
}

/// Runs the genetic algorithm.
pub struct GaRunner;

impl GaRunner {
    /// Evolves placements for `problem` and returns the best one found.
    ///
    /// # Errors
    /// - [`PlacementError::Config`] if `config` is out of range.
    /// - [`PlacementError::NoFeasibleSchedule`] if no evaluated chromosome
    ///   was feasible.
    pub fn run(problem: &Problem, config: &GaConfig) -> Result<OptimizationResult> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        let evaluator = Evaluator::new(problem).with_mode(config.dependency_mode);

        info!(
            jobs = problem.job_count(),
            machines = problem.machine_count(),
            disks = problem.disk_count(),
            population = config.population_size,
            generations = config.max_generations,
            seed = ?config.seed,
            "starting genetic search"
        );

        let mut population = Population::random(problem, config.population_size, &mut rng);
        let mut best = Best::default();
        let mut history = Vec::with_capacity(config.max_generations);
        let mut degenerate_generations = 0;
        let mut evaluations = 0;

        for generation in 0..config.max_generations {
            let evals = population.evaluate(&evaluator, config.parallel);
            evaluations += evals.len();
            if best.absorb(&population, &evals) {
                debug!(generation, makespan = ?best.makespan(), "new best placement");
            }
            history.push(best.makespan());

            population = match population.select(&evals, &mut rng) {
                Some(pool) => Population::breed(
                    pool,
                    problem,
                    config.crossover_rate,
                    config.mutation_rate,
                    &mut rng,
                ),
                None => {
                    degenerate_generations += 1;
                    warn!(generation, "every chromosome infeasible, re-initializing population");
                    Population::random(problem, config.population_size, &mut rng)
                }
            };
        }

        let evals = population.evaluate(&evaluator, config.parallel);
        evaluations += evals.len();
        best.absorb(&population, &evals);

        match best.0 {
            Some((chromosome, makespan)) => {
                info!(makespan, evaluations, degenerate_generations, "genetic search finished");
                Ok(OptimizationResult {
                    best: chromosome,
                    makespan,
                    generations: config.max_generations,
                    degenerate_generations,
                    evaluations,
                    history,
                    dependency_mode: config.dependency_mode,
                })
            }
            None => {
                warn!(evaluations, "genetic search found no feasible placement");
                Err(PlacementError::NoFeasibleSchedule {
                    generations: config.max_generations,
                })
            }
        }
    }
}

/// Optimizes `problem` with the genetic algorithm.
///
/// Shorthand for [`GaRunner::run`].
///
/// # Example
/// ```
/// use u_placement::ga::GaConfig;
/// use u_placement::models::{Disk, Job, Machine, Problem};
///
/// let problem = Problem::new(
///     vec![Job::new(0, 10).with_affinity(vec![0])],
///     vec![Machine::new(0, 5)],
///     vec![Disk::new(0, 5, 100)],
/// )
/// .unwrap();
/// let config = GaConfig::default()
///     .with_population_size(10)
///     .with_max_generations(5)
///     .with_seed(1);
/// let result = u_placement::optimize(&problem, &config).unwrap();
/// assert_eq!(result.makespan, 2);
/// ```
pub fn optimize(problem: &Problem, config: &GaConfig) -> Result<OptimizationResult> {
    GaRunner::run(problem, config)
}

/// Best feasible chromosome seen so far.
#[derive(Debug, Default)]
struct Best(Option<(Chromosome, u64)>);

impl Best {
    fn makespan(&self) -> Option<u64> {
        self.0.as_ref().map(|(_, m)| *m)
    }

    /// Folds in one evaluated generation. Returns whether the best improved.
    fn absorb(&mut self, population: &Population, evals: &[Evaluation]) -> bool {
        let candidate = population
            .chromosomes
            .iter()
            .zip(evals)
            .filter_map(|(ch, e)| e.makespan().map(|m| (ch, m)))
            .min_by_key(|&(_, m)| m);

        match candidate {
            Some((ch, m)) if self.makespan().map_or(true, |current| m < current) => {
                self.0 = Some((ch.clone(), m));
                true
            }
            _ => false,
        }
    }
}
