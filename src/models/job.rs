//! Job model.
//!
//! A job is a single non-preemptive unit of work. It runs on exactly one
//! machine from its affinity set and reads/writes through exactly one disk.
//!
//! # Dependencies
//!
//! - **Data dependency**: the producer's output is read from the job's disk
//!   before execution, so it adds transfer time as well as ordering.
//! - **Environment dependency**: the predecessor only has to finish first.

use serde::{Deserialize, Serialize};

/// A job to be placed on a machine and a disk.
///
/// All references (affinity, dependencies) are indices into the owning
/// [`Problem`](super::Problem)'s machine and job vectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Job index (0-based; equals the job's position in the problem).
    pub id: usize,
    /// Compute work units.
    pub size: u64,
    /// Bytes written to the assigned disk on completion.
    pub output_size: u64,
    /// Eligible machine indices.
    pub affinity: Vec<usize>,
    /// Jobs whose output must be read before this job runs.
    pub data_deps: Vec<usize>,
    /// Jobs that must complete before this job starts.
    pub env_deps: Vec<usize>,
}

impl Job {
    /// Creates a job with no output, affinity, or dependencies.
    pub fn new(id: usize, size: u64) -> Self {
        Self {
            id,
            size,
            output_size: 0,
            affinity: Vec::new(),
            data_deps: Vec::new(),
            env_deps: Vec::new(),
        }
    }

    /// Sets the output size in bytes.
    pub fn with_output_size(mut self, output_size: u64) -> Self {
        self.output_size = output_size;
        self
    }

    /// Sets the eligible machines.
    pub fn with_affinity(mut self, machines: Vec<usize>) -> Self {
        self.affinity = machines;
        self
    }

    /// Adds a data dependency on `producer`.
    pub fn with_data_dep(mut self, producer: usize) -> Self {
        self.data_deps.push(producer);
        self
    }

    /// Adds an environment dependency on `predecessor`.
    pub fn with_env_dep(mut self, predecessor: usize) -> Self {
        self.env_deps.push(predecessor);
        self
    }

    /// Whether `machine` is in this job's affinity set.
    #[inline]
    pub fn allows(&self, machine: usize) -> bool {
        self.affinity.contains(&machine)
    }

    /// All predecessors: data dependencies first, then environment ones.
    pub fn predecessors(&self) -> impl Iterator<Item = usize> + '_ {
        self.data_deps.iter().chain(self.env_deps.iter()).copied()
    }

    /// Whether this job waits on any other job.
    pub fn has_dependencies(&self) -> bool {
        !self.data_deps.is_empty() || !self.env_deps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_builder() {
        let job = Job::new(2, 10)
            .with_output_size(20)
            .with_affinity(vec![0, 1])
            .with_data_dep(0)
            .with_env_dep(1);

        assert_eq!(job.id, 2);
        assert_eq!(job.size, 10);
        assert_eq!(job.output_size, 20);
        assert!(job.allows(1));
        assert!(!job.allows(2));
        assert_eq!(job.predecessors().collect::<Vec<_>>(), vec![0, 1]);
        assert!(job.has_dependencies());
    }

    #[test]
    fn test_job_without_dependencies() {
        let job = Job::new(0, 5).with_affinity(vec![0]);
        assert!(!job.has_dependencies());
        assert_eq!(job.predecessors().count(), 0);
    }
}
