//! Problem instance.
//!
//! Owns every job, machine, and disk of one placement problem. Records are
//! value types in plain vectors; every cross reference is an index into
//! them. A `Problem` is validated once at construction and never mutated.

use super::{Disk, Job, Machine};
use crate::validation::{self, ValidationError};

/// A validated placement problem.
///
/// # Example
/// ```
/// use u_placement::models::{Disk, Job, Machine, Problem};
///
/// let problem = Problem::new(
///     vec![Job::new(0, 10).with_affinity(vec![0])],
///     vec![Machine::new(0, 5)],
///     vec![Disk::new(0, 5, 100)],
/// )
/// .unwrap();
/// assert_eq!(problem.job_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    jobs: Vec<Job>,
    machines: Vec<Machine>,
    disks: Vec<Disk>,
    topological_order: Vec<usize>,
}

impl Problem {
    /// Builds a problem, rejecting structurally invalid input.
    ///
    /// Returns every detected violation, not just the first. Affinity entries
    /// naming a machine that does not exist are accepted: they only make the
    /// job unplaceable, which the evaluator reports as infeasibility.
    pub fn new(
        jobs: Vec<Job>,
        machines: Vec<Machine>,
        disks: Vec<Disk>,
    ) -> Result<Self, Vec<ValidationError>> {
        validation::validate_problem(&jobs, &machines, &disks)?;

        let topological_order = validation::topological_order(&jobs).ok_or_else(|| {
            vec![ValidationError::new(
                validation::ValidationErrorKind::CyclicDependency,
                "Dependency graph has no topological order",
            )]
        })?;

        Ok(Self {
            jobs,
            machines,
            disks,
            topological_order,
        })
    }

    /// All jobs, indexed by job id.
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// All machines, indexed by machine id.
    pub fn machines(&self) -> &[Machine] {
        &self.machines
    }

    /// All disks, indexed by disk id.
    pub fn disks(&self) -> &[Disk] {
        &self.disks
    }

    /// Job by index.
    pub fn job(&self, id: usize) -> Option<&Job> {
        self.jobs.get(id)
    }

    /// Machine by index.
    pub fn machine(&self, id: usize) -> Option<&Machine> {
        self.machines.get(id)
    }

    /// Disk by index.
    pub fn disk(&self, id: usize) -> Option<&Disk> {
        self.disks.get(id)
    }

    /// Number of jobs (L).
    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Number of machines (N).
    pub fn machine_count(&self) -> usize {
        self.machines.len()
    }

    /// Number of disks (M).
    pub fn disk_count(&self) -> usize {
        self.disks.len()
    }

    /// Job indices ordered so every predecessor precedes its successors.
    ///
    /// Ties are broken by lowest index, so a dependency-free problem yields
    /// the identity order.
    pub fn topological_order(&self) -> &[usize] {
        &self.topological_order
    }

    /// Jobs that `job` directly depends on (data first, then environment).
    pub fn predecessors(&self, job: usize) -> Vec<usize> {
        self.jobs
            .get(job)
            .map(|j| j.predecessors().collect())
            .unwrap_or_default()
    }

    /// Jobs that directly depend on `job`.
    pub fn successors(&self, job: usize) -> Vec<usize> {
        self.jobs
            .iter()
            .filter(|j| j.predecessors().any(|p| p == job))
            .map(|j| j.id)
            .collect()
    }

    /// Number of data and environment dependency edges.
    pub fn dependency_count(&self) -> (usize, usize) {
        self.jobs.iter().fold((0, 0), |(data, env), j| {
            (data + j.data_deps.len(), env + j.env_deps.len())
        })
    }
}
