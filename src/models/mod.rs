//! Placement domain models.
//!
//! Provides the data types for describing a placement problem and its
//! solution. Records are plain values held in vectors; every reference
//! between them is a `usize` index.
//!
//! # Domain Mappings
//!
//! | u-placement | Batch cluster | Build farm |
//! |-------------|---------------|------------|
//! | Job | Task | Compile unit |
//! | Machine | Compute node | Worker |
//! | Disk | Storage volume | Artifact cache |
//! | Schedule | Execution plan | Build plan |

mod job;
mod problem;
mod resource;
mod schedule;

pub use job::Job;
pub use problem::Problem;
pub use resource::{Disk, Machine};
pub use schedule::{Assignment, Schedule};
