//! Schedule quality metrics (KPIs).
//!
//! Computes placement performance indicators from a decoded schedule and
//! the problem it solves.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan (C_max) | Latest completion time |
//! | Avg Completion | Mean job end time |
//! | Machine Utilization | busy time / makespan, per machine |
//! | Disk Usage | Output bytes written, per disk |
//! | Disk Fill | usage / quota, per disk |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use serde::Serialize;

use crate::models::{Problem, Schedule};

/// Schedule performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleKpi {
    /// Latest completion time.
    pub makespan: u64,
    /// Mean completion time over all assigned jobs.
    pub avg_completion: f64,
    /// Utilization of every machine, indexed by machine (0.0..=1.0).
    pub machine_utilization: Vec<f64>,
    /// Mean of `machine_utilization`.
    pub avg_machine_utilization: f64,
    /// Output bytes written to each disk.
    pub disk_usage: Vec<u64>,
    /// `disk_usage / quota` per disk. A zero quota reads as 0.0 when unused.
    pub disk_fill: Vec<f64>,
}

impl ScheduleKpi {
    /// Computes KPIs from a schedule and its problem.
    ///
    /// Assignments naming a machine or disk outside `problem` are ignored.
    pub fn calculate(schedule: &Schedule, problem: &Problem) -> Self {
        let makespan = schedule.makespan();

        let machine_utilization: Vec<f64> = (0..problem.machine_count())
            .map(|m| schedule.machine_utilization(m, makespan).unwrap_or(0.0))
            .collect();
        let avg_machine_utilization = if machine_utilization.is_empty() {
            0.0
        } else {
            machine_utilization.iter().sum::<f64>() / machine_utilization.len() as f64
        };

        let mut disk_usage = vec![0u64; problem.disk_count()];
        for a in &schedule.assignments {
            if let (Some(job), Some(used)) = (problem.job(a.job), disk_usage.get_mut(a.disk)) {
                *used = used.saturating_add(job.output_size);
            }
        }
        let disk_fill = problem
            .disks()
            .iter()
            .zip(&disk_usage)
            .map(|(disk, &used)| match (disk.quota, used) {
                (0, 0) => 0.0,
                (0, _) => f64::INFINITY,
                (quota, used) => used as f64 / quota as f64,
            })
            .collect();

        let avg_completion = if schedule.assignments.is_empty() {
            0.0
        } else {
            let total: f64 = schedule.assignments.iter().map(|a| a.end as f64).sum();
            total / schedule.assignments.len() as f64
        };

        Self {
            makespan,
            avg_completion,
            machine_utilization,
            avg_machine_utilization,
            disk_usage,
            disk_fill,
        }
    }

    /// Whether the schedule meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_makespan: u64, min_utilization: f64) -> bool {
        self.makespan <= max_makespan && self.avg_machine_utilization >= min_utilization
    }
}
