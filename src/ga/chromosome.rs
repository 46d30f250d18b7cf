//! Gene-triple chromosome for job placement.
//!
//! # Encoding
//!
//! A chromosome is a sequence of L genes `(job, machine, disk)`, one per
//! job. The gene order is the evaluation order. Initialization uses the
//! identity job order and no operator ever moves a gene or touches its job
//! field, so every chromosome of a run shares the same job sequence and
//! crossover can exchange whole genes position by position.
//!
//! # Operators
//!
//! - [`single_point_crossover`]: swap every gene from a random cut onwards.
//! - [`reassign_mutation`]: per gene, redraw machine and disk.
//!
//! # Reference
//! Goldberg (1989), "Genetic Algorithms in Search, Optimization and Machine Learning"

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::Problem;

/// One job's placement: which machine runs it and which disk it uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gene {
    /// Job index.
    pub job: usize,
    /// Machine index.
    pub machine: usize,
    /// Disk index.
    pub disk: usize,
}

impl Gene {
    /// Creates a gene.
    pub fn new(job: usize, machine: usize, disk: usize) -> Self {
        Self { job, machine, disk }
    }
}

/// A candidate placement of every job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chromosome {
    /// Genes in evaluation order.
    pub genes: Vec<Gene>,
}

impl Chromosome {
    /// Wraps a gene sequence.
    pub fn new(genes: Vec<Gene>) -> Self {
        Self { genes }
    }

    /// Creates a random chromosome.
    ///
    /// Jobs appear in identity order. Machines are drawn uniformly from all
    /// machines, not just the job's affinity set; the evaluator filters out
    /// ineligible draws. Disks are drawn uniformly from all disks.
    pub fn random<R: Rng>(problem: &Problem, rng: &mut R) -> Self {
        let machines = problem.machine_count();
        let disks = problem.disk_count();
        let genes = (0..problem.job_count())
            .map(|job| Gene::new(job, rng.random_range(0..machines), rng.random_range(0..disks)))
            .collect();
        Self { genes }
    }

    /// Number of genes.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Whether the chromosome has no genes.
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Gene for a given job.
    pub fn gene_for(&self, job: usize) -> Option<&Gene> {
        self.genes.iter().find(|g| g.job == job)
    }

    /// Validates the chromosome's structure against a problem.
    ///
    /// Checks that every job appears exactly once and every machine/disk
    /// index exists. Affinity is not checked here.
    pub fn is_valid(&self, problem: &Problem) -> bool {
        if self.genes.len() != problem.job_count() {
            return false;
        }
        let mut seen = vec![false; problem.job_count()];
        for gene in &self.genes {
            if gene.job >= seen.len()
                || seen[gene.job]
                || gene.machine >= problem.machine_count()
                || gene.disk >= problem.disk_count()
            {
                return false;
            }
            seen[gene.job] = true;
        }
        true
    }
}

// ======================== Crossover operators ========================

/// Performs single-point crossover.
///
/// With probability `rate`, picks a cut point uniformly among gene
/// positions and swaps every gene from the cut onwards between the two
/// parents. Otherwise the offspring are copies of the parents.
///
/// # Panics
/// If `rate` is not within `[0, 1]` and the chromosomes are non-empty.
/// [`GaConfig::validate`](super::GaConfig::validate) rejects such rates
/// before a run.
pub fn single_point_crossover<R: Rng>(
    p1: &Chromosome,
    p2: &Chromosome,
    rate: f64,
    rng: &mut R,
) -> (Chromosome, Chromosome) {
    let mut c1 = p1.clone();
    let mut c2 = p2.clone();
    let len = c1.len().min(c2.len());

    if len > 0 && rng.random_bool(rate) {
        let cut = rng.random_range(0..len);
        c1.genes[cut..len].swap_with_slice(&mut c2.genes[cut..len]);
    }

    (c1, c2)
}

// ======================== Mutation operators ========================

/// Reassignment mutation: each gene, independently with probability `rate`,
/// gets a new machine and disk drawn uniformly. The job field is never
/// changed.
///
/// # Panics
/// If `rate` is not within `[0, 1]` and the chromosome is non-empty.
pub fn reassign_mutation<R: Rng>(
    chromosome: &mut Chromosome,
    problem: &Problem,
    rate: f64,
    rng: &mut R,
) {
    let machines = problem.machine_count();
    let disks = problem.disk_count();
    for gene in &mut chromosome.genes {
        if rng.random_bool(rate) {
            gene.machine = rng.random_range(0..machines);
            gene.disk = rng.random_range(0..disks);
        }
    }
}
