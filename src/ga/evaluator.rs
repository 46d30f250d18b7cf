//! Schedule evaluation: chromosome → makespan or infeasibility.
//!
//! Replays a chromosome gene by gene, booking each job on its machine and
//! disk as early as its predecessors and both resources allow, then checks
//! the global constraints (disk quotas, no overlap).
//!
//! # Cost Model
//!
//! For gene `(job, machine, disk)`:
//!
//! ```text
//! start = max(end of every predecessor, machine free, disk free)
//! end   = start
//!       + Σ ceil(dep.output_size / disk.speed)   (data dependencies)
//!       + ceil(job.size / machine.power)
//!       + ceil(job.output_size / disk.speed)
//! ```
//!
//! # Dependency Resolution
//!
//! In [`DependencyMode::ChromosomeOrder`], genes are processed in chromosome
//! order, and a predecessor that has not been processed yet contributes a
//! lower bound of 0. [`DependencyMode::Topological`] processes genes in the
//! problem's topological order instead, so every predecessor is known.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Chromosome;
use crate::models::{Assignment, Problem, Schedule};

/// Order in which genes are replayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyMode {
    /// Chromosome order; unprocessed predecessors count as finished at 0.
    #[default]
    ChromosomeOrder,
    /// Topological order of the dependency graph.
    Topological,
}

/// Why a chromosome cannot be scheduled.
///
/// The optimizer treats every variant identically (zero fitness); the
/// distinction is diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Infeasibility {
    /// Wrong length, or a job missing or repeated.
    #[error("chromosome is not a permutation of the jobs")]
    MalformedChromosome,
    /// A gene names a job, machine, or disk that doesn't exist.
    #[error("job {job} is assigned to a machine or disk that does not exist")]
    OutOfRange { job: usize },
    /// A job is placed on a machine outside its affinity set.
    #[error("job {job} cannot run on machine {machine}")]
    AffinityViolation { job: usize, machine: usize },
    /// A disk receives more output than its quota.
    #[error("disk {disk} holds {used} bytes, quota is {quota}")]
    QuotaExceeded { disk: usize, used: u64, quota: u64 },
    /// Two jobs overlap on one machine.
    #[error("overlapping jobs on machine {machine}")]
    MachineOverlap { machine: usize },
    /// Two jobs overlap on one disk.
    #[error("overlapping jobs on disk {disk}")]
    DiskOverlap { disk: usize },
    /// Booking a job overflows a time or disk usage counter.
    #[error("time or disk usage overflows while booking job {job}")]
    Overflow { job: usize },
}

/// Outcome of evaluating one chromosome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    /// All constraints hold; carries the makespan.
    Feasible(u64),
    /// Some constraint is violated.
    Infeasible(Infeasibility),
}

impl Evaluation {
    /// Makespan if feasible.
    pub fn makespan(&self) -> Option<u64> {
        match *self {
            Evaluation::Feasible(makespan) => Some(makespan),
            Evaluation::Infeasible(_) => None,
        }
    }

    /// Whether all constraints hold.
    pub fn is_feasible(&self) -> bool {
        matches!(self, Evaluation::Feasible(_))
    }

    /// Roulette-wheel fitness: `1 / makespan`, or 0 when infeasible.
    pub fn fitness(&self) -> f64 {
        match *self {
            Evaluation::Feasible(makespan) if makespan > 0 => 1.0 / makespan as f64,
            _ => 0.0,
        }
    }
}

/// Evaluates and decodes chromosomes against one problem.
///
/// Holds no mutable state, so one evaluator can be shared across threads.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    problem: &'a Problem,
    mode: DependencyMode,
}

impl<'a> Evaluator<'a> {
    /// Creates an evaluator in chromosome-order mode.
    pub fn new(problem: &'a Problem) -> Self {
        Self {
            problem,
            mode: DependencyMode::default(),
        }
    }

    /// Sets the dependency resolution mode.
    pub fn with_mode(mut self, mode: DependencyMode) -> Self {
        self.mode = mode;
        self
    }

    /// The problem being evaluated against.
    pub fn problem(&self) -> &'a Problem {
        self.problem
    }

    /// The dependency resolution mode.
    pub fn mode(&self) -> DependencyMode {
        self.mode
    }

    /// Computes the makespan, or why the chromosome is infeasible.
    pub fn evaluate(&self, chromosome: &Chromosome) -> Evaluation {
        match self.replay(chromosome, None) {
            Ok(makespan) => Evaluation::Feasible(makespan),
            Err(reason) => Evaluation::Infeasible(reason),
        }
    }

    /// Decodes a chromosome into a full schedule.
    pub fn decode(&self, chromosome: &Chromosome) -> Result<Schedule, Infeasibility> {
        let mut assignments = Vec::with_capacity(chromosome.len());
        self.replay(chromosome, Some(&mut assignments))?;
        Ok(Schedule::from_assignments(assignments))
    }

    fn replay(
        &self,
        chromosome: &Chromosome,
        mut sink: Option<&mut Vec<Assignment>>,
    ) -> Result<u64, Infeasibility> {
        let problem = self.problem;
        let order = self.processing_order(chromosome)?;

        let mut state = ReplayState::new(problem);
        let mut machine_slots: Vec<Vec<(u64, u64)>> = vec![Vec::new(); problem.machine_count()];
        let mut disk_slots: Vec<Vec<(u64, u64)>> = vec![Vec::new(); problem.disk_count()];
        let mut disk_used = vec![0u64; problem.disk_count()];
        let mut makespan = 0;

        for pos in order {
            let gene = chromosome.genes[pos];
            if gene.machine >= problem.machine_count() || gene.disk >= problem.disk_count() {
                return Err(Infeasibility::OutOfRange { job: gene.job });
            }
            let job = &problem.jobs()[gene.job];
            if !job.allows(gene.machine) {
                return Err(Infeasibility::AffinityViolation {
                    job: gene.job,
                    machine: gene.machine,
                });
            }

            let overflow = Infeasibility::Overflow { job: gene.job };
            let (start, end) = state
                .book(problem, gene.job, gene.machine, gene.disk)
                .ok_or(overflow)?;
            disk_used[gene.disk] = disk_used[gene.disk]
                .checked_add(job.output_size)
                .ok_or(overflow)?;
            machine_slots[gene.machine].push((start, end));
            disk_slots[gene.disk].push((start, end));
            makespan = makespan.max(end);

            if let Some(out) = sink.as_deref_mut() {
                out.push(Assignment::new(gene.job, gene.machine, gene.disk, start, end));
            }
        }

        for (disk, &used) in problem.disks().iter().zip(&disk_used) {
            if !disk.fits(used) {
                return Err(Infeasibility::QuotaExceeded {
                    disk: disk.id,
                    used,
                    quota: disk.quota,
                });
            }
        }

        if let Some(machine) = machine_slots.iter_mut().position(|s| has_overlap(s)) {
            return Err(Infeasibility::MachineOverlap { machine });
        }
        if let Some(disk) = disk_slots.iter_mut().position(|s| has_overlap(s)) {
            return Err(Infeasibility::DiskOverlap { disk });
        }

        Ok(makespan)
    }

    /// Gene positions in processing order.
    ///
    /// Rejects chromosomes that are not a permutation of the job indices.
    fn processing_order(&self, chromosome: &Chromosome) -> Result<Vec<usize>, Infeasibility> {
        let job_count = self.problem.job_count();
        if chromosome.len() != job_count {
            return Err(Infeasibility::MalformedChromosome);
        }

        let mut position = vec![usize::MAX; job_count];
        for (pos, gene) in chromosome.genes.iter().enumerate() {
            if gene.job >= job_count {
                return Err(Infeasibility::OutOfRange { job: gene.job });
            }
            if position[gene.job] != usize::MAX {
                return Err(Infeasibility::MalformedChromosome);
            }
            position[gene.job] = pos;
        }

        Ok(match self.mode {
            DependencyMode::ChromosomeOrder => (0..job_count).collect(),
            DependencyMode::Topological => self
                .problem
                .topological_order()
                .iter()
                .map(|&job| position[job])
                .collect(),
        })
    }
}

/// Running end times for jobs, machines, and disks during a replay.
///
/// Shared with the exhaustive search, which books and unbooks jobs one at a
/// time over the same cost model.
#[derive(Debug, Clone)]
pub(crate) struct ReplayState {
    pub(crate) job_end: Vec<u64>,
    pub(crate) machine_end: Vec<u64>,
    pub(crate) disk_end: Vec<u64>,
}

impl ReplayState {
    pub(crate) fn new(problem: &Problem) -> Self {
        Self {
            job_end: vec![0; problem.job_count()],
            machine_end: vec![0; problem.machine_count()],
            disk_end: vec![0; problem.disk_count()],
        }
    }

    /// Start and end time of `job` if it were booked now, or `None` if the
    /// end time overflows. Indices must be valid.
    pub(crate) fn timing(
        &self,
        problem: &Problem,
        job: usize,
        machine: usize,
        disk: usize,
    ) -> Option<(u64, u64)> {
        let j = &problem.jobs()[job];
        let m = &problem.machines()[machine];
        let d = &problem.disks()[disk];

        let ready = j.predecessors().map(|p| self.job_end[p]).max().unwrap_or(0);
        let start = ready.max(self.machine_end[machine]).max(self.disk_end[disk]);

        let read_time = j.data_deps.iter().try_fold(0u64, |acc, &dep| {
            acc.checked_add(d.transfer_time(problem.jobs()[dep].output_size))
        })?;
        let exec_time = m.execution_time(j.size);
        let write_time = d.transfer_time(j.output_size);

        let end = start
            .checked_add(read_time)?
            .checked_add(exec_time)?
            .checked_add(write_time)?;
        Some((start, end))
    }

    /// Books `job` and advances the end-time trackers. Leaves the state
    /// untouched and returns `None` on overflow.
    pub(crate) fn book(
        &mut self,
        problem: &Problem,
        job: usize,
        machine: usize,
        disk: usize,
    ) -> Option<(u64, u64)> {
        let (start, end) = self.timing(problem, job, machine, disk)?;
        self.commit(job, machine, disk, end);
        Some((start, end))
    }

    /// Records `end` as the finish time of `job` and of both resources.
    pub(crate) fn commit(&mut self, job: usize, machine: usize, disk: usize, end: u64) {
        self.job_end[job] = end;
        self.machine_end[machine] = end;
        self.disk_end[disk] = end;
    }
}

/// Sorts intervals by start and reports whether any two overlap.
pub(crate) fn has_overlap(intervals: &mut [(u64, u64)]) -> bool {
    intervals.sort_unstable();
    intervals.windows(2).any(|w| w[1].0 < w[0].1)
}
