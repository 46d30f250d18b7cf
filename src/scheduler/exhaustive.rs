//! Depth-first branch and bound over every placement.
//!
//! Jobs are placed one at a time in the evaluator's processing order. Each
//! level of the search tree tries every (affinity machine, disk) pair for
//! one job, booked with the same cost model the genetic algorithm uses.
//! A branch is cut when
//!
//! - the job's output would push its disk over quota, or
//! - booking it would overflow a time or byte counter, or
//! - the partial makespan already reaches the best complete one.
//!
//! The tree is walked with an explicit cursor stack. Booking a job pushes
//! the end times and disk usage it overwrites onto an undo log, and
//! backtracking pops it, so the search never copies state.
//!
//! The search is exponential in the job count. A node budget bounds it;
//! an exhausted budget leaves the best placement found so far.

use tracing::{debug, info};

use crate::ga::evaluator::ReplayState;
use crate::ga::{Chromosome, DependencyMode, Gene};
use crate::models::Problem;

/// Result of an exhaustive search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Best feasible chromosome and its makespan, if any exists.
    pub best: Option<(Chromosome, u64)>,
    /// Search tree nodes expanded.
    pub nodes: usize,
    /// Whether the whole tree was explored. Only then is `best` optimal.
    pub complete: bool,
}

impl SearchOutcome {
    /// Makespan of the best placement found.
    pub fn makespan(&self) -> Option<u64> {
        self.best.as_ref().map(|(_, m)| *m)
    }
}

/// Exact placement search for small instances.
///
/// # Example
/// ```
/// use u_placement::models::{Disk, Job, Machine, Problem};
/// use u_placement::scheduler::ExhaustiveScheduler;
///
/// let problem = Problem::new(
///     vec![Job::new(0, 10).with_affinity(vec![0, 1]), Job::new(1, 10).with_affinity(vec![0, 1])],
///     vec![Machine::new(0, 10), Machine::new(1, 10)],
///     vec![Disk::new(0, 10, 0), Disk::new(1, 10, 0)],
/// )
/// .unwrap();
/// let outcome = ExhaustiveScheduler::new().search(&problem);
/// assert!(outcome.complete);
/// assert_eq!(outcome.makespan(), Some(1));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ExhaustiveScheduler {
    mode: DependencyMode,
    node_budget: usize,
}

impl Default for ExhaustiveScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// State overwritten by one booking.
#[derive(Debug, Clone, Copy)]
struct Undo {
    job: usize,
    machine: usize,
    disk: usize,
    job_end: u64,
    machine_end: u64,
    disk_end: u64,
    makespan: u64,
}

impl ExhaustiveScheduler {
    /// Default node budget.
    pub const DEFAULT_NODE_BUDGET: usize = 1_000_000;

    /// Creates a scheduler in chromosome-order mode with the default budget.
    pub fn new() -> Self {
        Self {
            mode: DependencyMode::ChromosomeOrder,
            node_budget: Self::DEFAULT_NODE_BUDGET,
        }
    }

    /// Sets the dependency resolution mode.
    pub fn with_mode(mut self, mode: DependencyMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the maximum number of nodes to expand.
    pub fn with_node_budget(mut self, budget: usize) -> Self {
        self.node_budget = budget;
        self
    }

    /// Searches for a minimum-makespan placement.
    ///
    /// The returned chromosome lists jobs in index order, like the ones the
    /// genetic algorithm evolves, and evaluates to the returned makespan
    /// under this scheduler's dependency mode.
    pub fn search(&self, problem: &Problem) -> SearchOutcome {
        let order: Vec<usize> = match self.mode {
            DependencyMode::ChromosomeOrder => (0..problem.job_count()).collect(),
            DependencyMode::Topological => problem.topological_order().to_vec(),
        };
        let options: Vec<Vec<(usize, usize)>> = order
            .iter()
            .map(|&job| {
                problem.jobs()[job]
                    .affinity
                    .iter()
                    .filter(|&&m| m < problem.machine_count())
                    .flat_map(|&m| (0..problem.disk_count()).map(move |d| (m, d)))
                    .collect()
            })
            .collect();

        info!(
            jobs = problem.job_count(),
            branching = ?options.iter().map(Vec::len).collect::<Vec<_>>(),
            budget = self.node_budget,
            "starting exhaustive search"
        );

        let mut state = ReplayState::new(problem);
        let mut disk_used = vec![0u64; problem.disk_count()];
        let mut placement = vec![(0usize, 0usize); problem.job_count()];
        let mut makespan = 0u64;

        let mut cursor: Vec<usize> = vec![0];
        let mut undo: Vec<Undo> = Vec::with_capacity(order.len());
        let mut best: Option<(Vec<(usize, usize)>, u64)> = None;
        let mut nodes = 0usize;
        let mut complete = true;

        while let Some(&next) = cursor.last() {
            let depth = cursor.len() - 1;

            if depth == order.len() {
                if best.as_ref().map_or(true, |(_, b)| makespan < *b) {
                    debug!(makespan, nodes, "new best placement");
                    best = Some((placement.clone(), makespan));
                }
                cursor.pop();
                rollback(&mut undo, &mut state, &mut disk_used, &mut makespan, problem);
                continue;
            }

            if next >= options[depth].len() {
                cursor.pop();
                rollback(&mut undo, &mut state, &mut disk_used, &mut makespan, problem);
                continue;
            }
            cursor[depth] += 1;

            if nodes >= self.node_budget {
                complete = false;
                break;
            }
            nodes += 1;

            let job = order[depth];
            let (machine, disk) = options[depth][next];
            let output = problem.jobs()[job].output_size;
            let Some(used) = disk_used[disk].checked_add(output) else {
                continue;
            };
            if !problem.disks()[disk].fits(used) {
                continue;
            }
            let Some((_, end)) = state.timing(problem, job, machine, disk) else {
                continue;
            };
            let span = makespan.max(end);
            if best.as_ref().is_some_and(|(_, b)| span >= *b) {
                continue;
            }

            undo.push(Undo {
                job,
                machine,
                disk,
                job_end: state.job_end[job],
                machine_end: state.machine_end[machine],
                disk_end: state.disk_end[disk],
                makespan,
            });
            state.commit(job, machine, disk, end);
            disk_used[disk] = used;
            makespan = span;
            placement[job] = (machine, disk);
            cursor.push(0);
        }

        let best = best.map(|(placement, makespan)| {
            let genes = placement
                .into_iter()
                .enumerate()
                .map(|(job, (machine, disk))| Gene::new(job, machine, disk))
                .collect();
            (Chromosome::new(genes), makespan)
        });

        info!(
            nodes,
            complete,
            makespan = ?best.as_ref().map(|(_, m)| *m),
            "exhaustive search finished"
        );

        SearchOutcome {
            best,
            nodes,
            complete,
        }
    }
}

/// Reverts the most recent booking, if any.
fn rollback(
    undo: &mut Vec<Undo>,
    state: &mut ReplayState,
    disk_used: &mut [u64],
    makespan: &mut u64,
    problem: &Problem,
) {
    if let Some(u) = undo.pop() {
        state.job_end[u.job] = u.job_end;
        state.machine_end[u.machine] = u.machine_end;
        state.disk_end[u.disk] = u.disk_end;
        disk_used[u.disk] -= problem.jobs()[u.job].output_size;
        *makespan = u.makespan;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::{Evaluation, Evaluator, GaConfig, GaRunner};
    use crate::models::{Disk, Job, Machine};

    fn sample_problem() -> Problem {
        Problem::new(
            vec![
                Job::new(0, 10).with_output_size(20).with_affinity(vec![0, 1]),
                Job::new(1, 20).with_affinity(vec![0, 1]).with_data_dep(0),
                Job::new(2, 30).with_output_size(5).with_affinity(vec![1, 2]),
                Job::new(3, 15).with_affinity(vec![0, 2]).with_env_dep(2),
            ],
            vec![Machine::new(0, 5), Machine::new(1, 10), Machine::new(2, 3)],
            vec![Disk::new(0, 10, 100), Disk::new(1, 5, 100)],
        )
        .unwrap()
    }

    #[test]
    fn test_single_job() {
        let p = Problem::new(
            vec![Job::new(0, 10).with_affinity(vec![0])],
            vec![Machine::new(0, 5)],
            vec![Disk::new(0, 5, 100)],
        )
        .unwrap();
        let outcome = ExhaustiveScheduler::new().search(&p);

        assert!(outcome.complete);
        assert_eq!(outcome.makespan(), Some(2));
        assert_eq!(outcome.nodes, 1);
    }

    #[test]
    fn test_best_matches_evaluator() {
        let p = sample_problem();
        for mode in [DependencyMode::ChromosomeOrder, DependencyMode::Topological] {
            let outcome = ExhaustiveScheduler::new().with_mode(mode).search(&p);
            assert!(outcome.complete);

            let (chromosome, makespan) = outcome.best.unwrap();
            assert!(chromosome.is_valid(&p));
            assert_eq!(
                Evaluator::new(&p).with_mode(mode).evaluate(&chromosome),
                Evaluation::Feasible(makespan)
            );
        }
    }

    #[test]
    fn test_not_worse_than_ga() {
        let p = sample_problem();
        let exact = ExhaustiveScheduler::new().search(&p);
        let config = GaConfig::default()
            .with_population_size(20)
            .with_max_generations(30)
            .with_seed(42);
        let ga = GaRunner::run(&p, &config).unwrap();

        assert!(exact.makespan().unwrap() <= ga.makespan);
    }

    #[test]
    fn test_respects_cumulative_quota() {
        let p = Problem::new(
            vec![
                Job::new(0, 1).with_output_size(6).with_affinity(vec![0]),
                Job::new(1, 1).with_output_size(6).with_affinity(vec![0]),
            ],
            vec![Machine::new(0, 1)],
            vec![Disk::new(0, 3, 10), Disk::new(1, 3, 10)],
        )
        .unwrap();
        let (chromosome, makespan) = ExhaustiveScheduler::new().search(&p).best.unwrap();

        assert_ne!(chromosome.genes[0].disk, chromosome.genes[1].disk);
        assert_eq!(makespan, 6);
    }

    #[test]
    fn test_no_feasible_placement() {
        let p = Problem::new(
            vec![Job::new(0, 10).with_output_size(50).with_affinity(vec![0])],
            vec![Machine::new(0, 5)],
            vec![Disk::new(0, 5, 10)],
        )
        .unwrap();
        let outcome = ExhaustiveScheduler::new().search(&p);

        assert!(outcome.complete);
        assert!(outcome.best.is_none());
    }

    #[test]
    fn test_missing_affinity_machine() {
        let p = Problem::new(
            vec![Job::new(0, 10).with_affinity(vec![3])],
            vec![Machine::new(0, 5)],
            vec![Disk::new(0, 5, 100)],
        )
        .unwrap();
        let outcome = ExhaustiveScheduler::new().search(&p);

        assert!(outcome.complete);
        assert_eq!(outcome.nodes, 0);
        assert!(outcome.best.is_none());
    }

    #[test]
    fn test_overflowing_branches_are_pruned() {
        // Either disk overflows its byte count on the second job; only the
        // split placement survives.
        let p = Problem::new(
            vec![
                Job::new(0, 1).with_output_size(u64::MAX).with_affinity(vec![0]),
                Job::new(1, 1).with_output_size(u64::MAX).with_affinity(vec![0]),
            ],
            vec![Machine::new(0, 1)],
            vec![Disk::new(0, u64::MAX, u64::MAX), Disk::new(1, u64::MAX, u64::MAX)],
        )
        .unwrap();
        let outcome = ExhaustiveScheduler::new().search(&p);

        assert!(outcome.complete);
        let (chromosome, makespan) = outcome.best.unwrap();
        assert_ne!(chromosome.genes[0].disk, chromosome.genes[1].disk);
        assert_eq!(makespan, 4);
    }

    #[test]
    fn test_node_budget() {
        let p = sample_problem();
        let outcome = ExhaustiveScheduler::new().with_node_budget(3).search(&p);

        assert!(!outcome.complete);
        assert_eq!(outcome.nodes, 3);
    }
}
