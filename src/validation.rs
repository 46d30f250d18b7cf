//! Input validation for placement problems.
//!
//! Checks structural integrity of jobs, machines, and disks before a
//! [`Problem`](crate::models::Problem) is built. Detects:
//! - Empty job, machine, or disk sets
//! - Ids that do not match their position
//! - Non-positive sizes, powers, and speeds
//! - Jobs with an empty affinity set
//! - Dependencies on jobs that don't exist (including self-dependencies)
//! - Circular dependencies (DAG validation)
//!
//! # Reference
//! Kahn (1962), "Topological sorting of large networks"

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;

use crate::models::{Disk, Job, Machine};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// No jobs, machines, or disks.
    EmptyInput,
    /// A record's id differs from its index.
    IdMismatch,
    /// Size, power, or speed is zero.
    NonPositiveValue,
    /// A job has no eligible machine.
    EmptyAffinity,
    /// A dependency references a job that doesn't exist, or the job itself.
    InvalidDependency,
    /// Dependency graph contains a cycle.
    CyclicDependency,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Joins error messages into a single line.
pub fn describe(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validates the input data for a placement problem.
///
/// Checks:
/// 1. At least one job, machine, and disk
/// 2. Every id equals its index
/// 3. Job sizes, machine powers, and disk speeds are positive
/// 4. Every job has at least one affinity entry
/// 5. All dependencies point to other existing jobs
/// 6. No circular dependencies
///
/// Affinity entries are not range-checked here; an entry naming a missing
/// machine can never be satisfied, which makes the job unplaceable rather
/// than the model malformed.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_problem(jobs: &[Job], machines: &[Machine], disks: &[Disk]) -> ValidationResult {
    let mut errors = Vec::new();

    for (what, len) in [("job", jobs.len()), ("machine", machines.len()), ("disk", disks.len())] {
        if len == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyInput,
                format!("Problem has no {what}s"),
            ));
        }
    }

    for (idx, m) in machines.iter().enumerate() {
        if m.id != idx {
            errors.push(ValidationError::new(
                ValidationErrorKind::IdMismatch,
                format!("Machine at position {idx} has id {}", m.id),
            ));
        }
        if m.power == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveValue,
                format!("Machine {} has zero power", m.id),
            ));
        }
    }

    for (idx, d) in disks.iter().enumerate() {
        if d.id != idx {
            errors.push(ValidationError::new(
                ValidationErrorKind::IdMismatch,
                format!("Disk at position {idx} has id {}", d.id),
            ));
        }
        if d.speed == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveValue,
                format!("Disk {} has zero speed", d.id),
            ));
        }
    }

    let mut dependencies_valid = true;
    for (idx, job) in jobs.iter().enumerate() {
        if job.id != idx {
            errors.push(ValidationError::new(
                ValidationErrorKind::IdMismatch,
                format!("Job at position {idx} has id {}", job.id),
            ));
        }
        if job.size == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveValue,
                format!("Job {idx} has zero size"),
            ));
        }
        if job.affinity.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyAffinity,
                format!("Job {idx} has no eligible machine"),
            ));
        }
        for dep in job.predecessors() {
            if dep >= jobs.len() || dep == idx {
                dependencies_valid = false;
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidDependency,
                    format!("Job {idx} depends on invalid job {dep}"),
                ));
            }
        }
    }

    // Cycle detection needs every edge in range
    if dependencies_valid {
        if let Some(cycle_err) = detect_cycles(jobs) {
            errors.push(cycle_err);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Detects cycles in the dependency graph.
fn detect_cycles(jobs: &[Job]) -> Option<ValidationError> {
    if topological_order(jobs).is_some() {
        return None;
    }
    let stuck = unsorted_jobs(jobs);
    Some(ValidationError::new(
        ValidationErrorKind::CyclicDependency,
        format!("Circular dependency detected among jobs {stuck:?}"),
    ))
}

/// Computes a topological order of the dependency graph.
///
/// # Algorithm
/// Kahn's algorithm with a min-heap for the ready set, so ties are broken by
/// lowest job index and the result is deterministic. Out-of-range edges are
/// ignored.
///
/// # Returns
/// `None` if the graph contains a cycle.
pub(crate) fn topological_order(jobs: &[Job]) -> Option<Vec<usize>> {
    let (order, _) = kahn(jobs);
    (order.len() == jobs.len()).then_some(order)
}

/// Jobs left over after Kahn's algorithm: members of, or downstream of, a cycle.
fn unsorted_jobs(jobs: &[Job]) -> Vec<usize> {
    let (_, in_degree) = kahn(jobs);
    in_degree
        .iter()
        .enumerate()
        .filter(|(_, &d)| d > 0)
        .map(|(i, _)| i)
        .collect()
}

fn kahn(jobs: &[Job]) -> (Vec<usize>, Vec<usize>) {
    let n = jobs.len();
    let mut in_degree = vec![0usize; n];
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); n];

    for (idx, job) in jobs.iter().enumerate() {
        for dep in job.predecessors().filter(|&d| d < n) {
            successors[dep].push(idx);
            in_degree[idx] += 1;
        }
    }

    let mut ready: BinaryHeap<Reverse<usize>> = (0..n)
        .filter(|&i| in_degree[i] == 0)
        .map(Reverse)
        .collect();
    let mut order = Vec::with_capacity(n);

    while let Some(Reverse(node)) = ready.pop() {
        order.push(node);
        for &next in &successors[node] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                ready.push(Reverse(next));
            }
        }
    }

    (order, in_degree)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_machines() -> Vec<Machine> {
        vec![Machine::new(0, 5), Machine::new(1, 10)]
    }

    fn sample_disks() -> Vec<Disk> {
        vec![Disk::new(0, 10, 100)]
    }

    fn sample_jobs() -> Vec<Job> {
        vec![
            Job::new(0, 10).with_output_size(20).with_affinity(vec![0, 1]),
            Job::new(1, 5).with_affinity(vec![1]).with_data_dep(0),
            Job::new(2, 8).with_affinity(vec![0]).with_env_dep(1),
        ]
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_problem(&sample_jobs(), &sample_machines(), &sample_disks()).is_ok());
    }

    #[test]
    fn test_empty_input() {
        let errors = validate_problem(&[], &[], &sample_disks()).unwrap_err();
        assert_eq!(
            errors
                .iter()
                .filter(|e| e.kind == ValidationErrorKind::EmptyInput)
                .count(),
            2
        );
    }

    #[test]
    fn test_id_mismatch() {
        let jobs = vec![Job::new(1, 10).with_affinity(vec![0])];
        let errors = validate_problem(&jobs, &sample_machines(), &sample_disks()).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::IdMismatch && e.message.contains("Job")));
    }

    #[test]
    fn test_non_positive_values() {
        let jobs = vec![Job::new(0, 0).with_affinity(vec![0])];
        let machines = vec![Machine::new(0, 0)];
        let disks = vec![Disk::new(0, 0, 10)];

        let errors = validate_problem(&jobs, &machines, &disks).unwrap_err();
        assert_eq!(
            errors
                .iter()
                .filter(|e| e.kind == ValidationErrorKind::NonPositiveValue)
                .count(),
            3
        );
    }

    #[test]
    fn test_zero_quota_is_valid() {
        let disks = vec![Disk::new(0, 10, 0)];
        assert!(validate_problem(&sample_jobs(), &sample_machines(), &disks).is_ok());
    }

    #[test]
    fn test_empty_affinity() {
        let jobs = vec![Job::new(0, 10)];
        let errors = validate_problem(&jobs, &sample_machines(), &sample_disks()).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::EmptyAffinity));
    }

    #[test]
    fn test_unknown_affinity_machine_is_accepted() {
        let jobs = vec![Job::new(0, 10).with_affinity(vec![7])];
        assert!(validate_problem(&jobs, &sample_machines(), &sample_disks()).is_ok());
    }

    #[test]
    fn test_invalid_dependency() {
        let jobs = vec![
            Job::new(0, 10).with_affinity(vec![0]).with_data_dep(5),
            Job::new(1, 10).with_affinity(vec![0]).with_env_dep(1),
        ];
        let errors = validate_problem(&jobs, &sample_machines(), &sample_disks()).unwrap_err();
        assert_eq!(
            errors
                .iter()
                .filter(|e| e.kind == ValidationErrorKind::InvalidDependency)
                .count(),
            2
        );
    }

    #[test]
    fn test_cyclic_dependency() {
        // 0 → 1 → 2 → 0 (cycle)
        let jobs = vec![
            Job::new(0, 1).with_affinity(vec![0]).with_env_dep(2),
            Job::new(1, 1).with_affinity(vec![0]).with_data_dep(0),
            Job::new(2, 1).with_affinity(vec![0]).with_env_dep(1),
        ];
        let errors = validate_problem(&jobs, &sample_machines(), &sample_disks()).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::CyclicDependency));
    }

    #[test]
    fn test_no_cycle_in_chain() {
        let order = topological_order(&sample_jobs()).unwrap();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn test_topological_order_respects_dependencies() {
        // 3 → 1, 2 → 0
        let jobs = vec![
            Job::new(0, 1).with_affinity(vec![0]).with_data_dep(2),
            Job::new(1, 1).with_affinity(vec![0]).with_env_dep(3),
            Job::new(2, 1).with_affinity(vec![0]),
            Job::new(3, 1).with_affinity(vec![0]),
        ];
        assert_eq!(topological_order(&jobs).unwrap(), vec![2, 0, 3, 1]);
    }

    #[test]
    fn test_multiple_errors() {
        let jobs = vec![Job::new(0, 0)];
        let errors = validate_problem(&jobs, &[], &[]).unwrap_err();
        assert!(errors.len() >= 4);
        assert!(describe(&errors).contains("; "));
    }
}
