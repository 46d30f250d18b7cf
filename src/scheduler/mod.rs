//! Exact search and schedule KPIs.
//!
//! # Algorithm
//!
//! `ExhaustiveScheduler` enumerates every (machine, disk) placement with
//! depth-first branch and bound over the same cost model as the genetic
//! algorithm. It is exact when it completes within its node budget, which
//! only happens for small instances; use it as a baseline for the GA.
//!
//! # KPI
//!
//! `ScheduleKpi` computes makespan, mean completion time, per-machine
//! utilization, and per-disk usage against quota.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3-4
//! - Land & Doig (1960), "An Automatic Method of Solving Discrete Programming Problems"

mod exhaustive;
mod kpi;

pub use exhaustive::{ExhaustiveScheduler, SearchOutcome};
pub use kpi::ScheduleKpi;
