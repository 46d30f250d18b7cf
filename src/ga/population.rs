//! Population of chromosomes for one generation.
//!
//! Provides the generation-level operators: random initialization,
//! evaluation (optionally parallel), roulette-wheel selection, and
//! pairwise recombination followed by mutation.
//!
//! # Pairing
//!
//! Selected individual `i` is crossed with individual `P - 1 - i`. With an
//! odd population the middle individual passes through unchanged, so the
//! next generation always has exactly `P` members.

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rayon::prelude::*;

use super::chromosome::{reassign_mutation, single_point_crossover};
use super::{Chromosome, Evaluation, Evaluator};
use crate::models::Problem;

/// One generation of candidate placements.
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    /// Members; order only matters for crossover pairing.
    pub chromosomes: Vec<Chromosome>,
}

impl Population {
    /// Wraps existing chromosomes.
    pub fn new(chromosomes: Vec<Chromosome>) -> Self {
        Self { chromosomes }
    }

    /// Creates `size` random chromosomes.
    pub fn random<R: Rng>(problem: &Problem, size: usize, rng: &mut R) -> Self {
        Self {
            chromosomes: (0..size).map(|_| Chromosome::random(problem, rng)).collect(),
        }
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.chromosomes.len()
    }

    /// Whether the population is empty.
    pub fn is_empty(&self) -> bool {
        self.chromosomes.is_empty()
    }

    /// Evaluates every member, in parallel when `parallel` is set.
    ///
    /// Results are positionally aligned with `chromosomes` either way.
    pub fn evaluate(&self, evaluator: &Evaluator<'_>, parallel: bool) -> Vec<Evaluation> {
        if parallel {
            self.chromosomes
                .par_iter()
                .map(|ch| evaluator.evaluate(ch))
                .collect()
        } else {
            self.chromosomes
                .iter()
                .map(|ch| evaluator.evaluate(ch))
                .collect()
        }
    }

    /// Roulette-wheel selection with replacement.
    ///
    /// Draws `len()` members, each with probability proportional to its
    /// fitness (`1 / makespan`, or 0 when infeasible).
    ///
    /// # Returns
    /// `None` when the total fitness is zero (every member infeasible).
    pub fn select<R: Rng>(&self, evaluations: &[Evaluation], rng: &mut R) -> Option<Vec<Chromosome>> {
        let weights: Vec<f64> = evaluations.iter().map(Evaluation::fitness).collect();
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return None;
        }

        let wheel = WeightedIndex::new(&weights).ok()?;
        Some(
            (0..self.len())
                .map(|_| self.chromosomes[wheel.sample(rng)].clone())
                .collect(),
        )
    }

    /// Builds the next generation from a selected pool.
    ///
    /// Pairs `pool[i]` with `pool[n - 1 - i]`, applies crossover with
    /// probability `crossover_rate`, then mutates every offspring gene with
    /// probability `mutation_rate`.
    pub fn breed<R: Rng>(
        pool: Vec<Chromosome>,
        problem: &Problem,
        crossover_rate: f64,
        mutation_rate: f64,
        rng: &mut R,
    ) -> Self {
        let n = pool.len();
        let mut offspring = Vec::with_capacity(n);

        for i in 0..n / 2 {
            let (c1, c2) = single_point_crossover(&pool[i], &pool[n - 1 - i], crossover_rate, rng);
            offspring.push(c1);
            offspring.push(c2);
        }
        if n % 2 == 1 {
            offspring.push(pool[n / 2].clone());
        }

        for ch in &mut offspring {
            reassign_mutation(ch, problem, mutation_rate, rng);
        }

        Self {
            chromosomes: offspring,
        }
    }
}
