//! GA-based placement optimization.
//!
//! Searches job → (machine, disk) assignments for a short makespan with a
//! generational genetic algorithm: roulette-wheel selection, single-point
//! crossover, per-gene reassignment mutation, no elitism.
//!
//! # Encoding
//!
//! A [`Chromosome`] is a sequence of [`Gene`] triples `(job, machine, disk)`,
//! one per job, evaluated left to right.
//!
//! # Submodules
//!
//! - [`evaluator`]: cost model and feasibility checks
//! - [`population`]: generation-level selection and breeding
//!
//! # Reference
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization and Machine Learning"
//! - Holland (1975), "Adaptation in Natural and Artificial Systems"

mod chromosome;
mod config;
pub mod evaluator;
pub mod population;
mod runner;

pub use chromosome::{Chromosome, Gene, reassign_mutation, single_point_crossover};
pub use config::GaConfig;
pub use evaluator::{DependencyMode, Evaluation, Evaluator, Infeasibility};
pub use population::Population;
pub use runner::{GaRunner, OptimizationResult, optimize};
