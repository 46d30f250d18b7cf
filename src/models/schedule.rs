//! Schedule (solution) model.
//!
//! A schedule is the decoded form of a feasible chromosome: one
//! job-machine-disk-time assignment per job.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A complete schedule, one assignment per job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Assignments in job-index order.
    pub assignments: Vec<Assignment>,
}

/// A job-machine-disk-time assignment.
///
/// The interval `[start, end)` covers reading dependency outputs,
/// execution, and writing the job's own output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Assigned job index.
    pub job: usize,
    /// Machine index.
    pub machine: usize,
    /// Disk index.
    pub disk: usize,
    /// Start time.
    pub start: u64,
    /// End time.
    pub end: u64,
}

impl Assignment {
    /// Creates a new assignment.
    pub fn new(job: usize, machine: usize, disk: usize, start: u64, end: u64) -> Self {
        Self {
            job,
            machine,
            disk,
            start,
            end,
        }
    }

    /// Total duration (end - start).
    #[inline]
    pub fn duration(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// Whether two assignments share any instant.
    #[inline]
    pub fn overlaps(&self, other: &Assignment) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a schedule, ordering assignments by job index.
    pub fn from_assignments(mut assignments: Vec<Assignment>) -> Self {
        assignments.sort_by_key(|a| a.job);
        Self { assignments }
    }

    /// Adds an assignment.
    pub fn add_assignment(&mut self, assignment: Assignment) {
        self.assignments.push(assignment);
    }

    /// Makespan: latest end time across all assignments.
    pub fn makespan(&self) -> u64 {
        self.assignments.iter().map(|a| a.end).max().unwrap_or(0)
    }

    /// Finds the assignment for a given job.
    pub fn assignment_for_job(&self, job: usize) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.job == job)
    }

    /// Returns all assignments on a given machine.
    pub fn assignments_for_machine(&self, machine: usize) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.machine == machine)
            .collect()
    }

    /// Returns all assignments through a given disk.
    pub fn assignments_for_disk(&self, disk: usize) -> Vec<&Assignment> {
        self.assignments.iter().filter(|a| a.disk == disk).collect()
    }

    /// Machine utilization: busy_time / horizon.
    ///
    /// Returns `None` if `horizon` is zero.
    pub fn machine_utilization(&self, machine: usize, horizon: u64) -> Option<f64> {
        if horizon == 0 {
            return None;
        }
        let busy: f64 = self
            .assignments_for_machine(machine)
            .iter()
            .map(|a| a.duration() as f64)
            .sum();
        Some(busy / horizon as f64)
    }

    /// Utilization of every machine that has assignments, over the makespan.
    pub fn all_machine_utilizations(&self) -> HashMap<usize, f64> {
        let horizon = self.makespan();
        if horizon == 0 {
            return HashMap::new();
        }

        let mut busy: HashMap<usize, f64> = HashMap::new();
        for a in &self.assignments {
            *busy.entry(a.machine).or_insert(0.0) += a.duration() as f64;
        }

        busy.into_iter()
            .map(|(id, b)| (id, b / horizon as f64))
            .collect()
    }

    /// Whether any two assignments on the same machine or disk overlap.
    pub fn has_conflicts(&self) -> bool {
        self.assignments.iter().enumerate().any(|(i, a)| {
            self.assignments[i + 1..]
                .iter()
                .any(|b| (a.machine == b.machine || a.disk == b.disk) && a.overlaps(b))
        })
    }

    /// Number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }
}
