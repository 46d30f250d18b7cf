//! Job placement optimizer for machines and disks.
//!
//! Assigns every job of a batch to a machine and a disk so that the
//! makespan is short while affinity, data and environment dependencies,
//! disk quotas, and non-overlap on each resource all hold.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Job`, `Machine`, `Disk`, `Problem`,
//!   `Schedule`, `Assignment`
//! - **`validation`**: Structural checks (positive values, affinity,
//!   dependency references, cycles)
//! - **`ga`**: Genetic algorithm: chromosome encoding, evaluator,
//!   population operators, generational runner
//! - **`scheduler`**: Exhaustive branch and bound and schedule KPIs
//! - **`io`**: Plain-text problem loader and problem/schedule writers
//! - **`error`**: Crate error type
//!
//! # Example
//!
//! ```
//! use u_placement::ga::GaConfig;
//! use u_placement::io::read_problem;
//!
//! // One job of size 10 on a power-5 machine and a speed-5 disk.
//! let problem = read_problem("1  1 10 0 1 1  1  1 5  1  1 5 100  0  0").unwrap();
//! let config = GaConfig::default().with_population_size(8).with_max_generations(4).with_seed(7);
//! let result = u_placement::optimize(&problem, &config).unwrap();
//! let schedule = result.schedule(&problem).unwrap();
//! assert_eq!(schedule.makespan(), 2);
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization and Machine Learning"

pub mod error;
pub mod ga;
pub mod io;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use error::{PlacementError, Result};
pub use ga::optimize;
