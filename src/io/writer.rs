//! Text output for problems and schedules.
//!
//! [`write_problem`] emits the same format [`read_problem`](super::read_problem)
//! accepts, one record per line. [`write_schedule`] emits one
//! `job start machine disk` line per job in job order. Ids are 1-based.

use std::io::{self, Write};

use crate::models::{Problem, Schedule};

/// Writes `problem` in the loader's text format.
pub fn write_problem<W: Write>(problem: &Problem, out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", problem.job_count())?;
    for job in problem.jobs() {
        write!(
            out,
            "{} {} {} {}",
            job.id + 1,
            job.size,
            job.output_size,
            job.affinity.len()
        )?;
        for &machine in &job.affinity {
            write!(out, " {}", machine as u128 + 1)?;
        }
        writeln!(out)?;
    }

    writeln!(out, "{}", problem.machine_count())?;
    for machine in problem.machines() {
        writeln!(out, "{} {}", machine.id + 1, machine.power)?;
    }

    writeln!(out, "{}", problem.disk_count())?;
    for disk in problem.disks() {
        writeln!(out, "{} {} {}", disk.id + 1, disk.speed, disk.quota)?;
    }

    let (data, env) = problem.dependency_count();
    writeln!(out, "{data}")?;
    for job in problem.jobs() {
        for producer in &job.data_deps {
            writeln!(out, "{} {}", producer + 1, job.id + 1)?;
        }
    }
    writeln!(out, "{env}")?;
    for job in problem.jobs() {
        for predecessor in &job.env_deps {
            writeln!(out, "{} {}", predecessor + 1, job.id + 1)?;
        }
    }
    Ok(())
}

/// Writes one `job start machine disk` line per assignment.
pub fn write_schedule<W: Write>(schedule: &Schedule, out: &mut W) -> io::Result<()> {
    for a in &schedule.assignments {
        writeln!(out, "{} {} {} {}", a.job + 1, a.start, a.machine + 1, a.disk + 1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::read_problem;
    use crate::models::{Assignment, Disk, Job, Machine};

    fn render<F: FnOnce(&mut Vec<u8>) -> io::Result<()>>(f: F) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn sample_problem() -> Problem {
        Problem::new(
            vec![
                Job::new(0, 10).with_output_size(20).with_affinity(vec![0, 1]),
                Job::new(1, 8).with_affinity(vec![1]).with_data_dep(0),
                Job::new(2, 6).with_affinity(vec![0]).with_env_dep(1),
            ],
            vec![Machine::new(0, 5), Machine::new(1, 4)],
            vec![Disk::new(0, 10, 100)],
        )
        .unwrap()
    }

    #[test]
    fn test_write_problem_format() {
        let text = render(|out| write_problem(&sample_problem(), out));
        assert_eq!(
            text,
            "3\n1 10 20 2 1 2\n2 8 0 1 2\n3 6 0 1 1\n2\n1 5\n2 4\n1\n1 10 100\n1\n1 2\n1\n2 3\n"
        );
    }

    #[test]
    fn test_problem_survives_reload() {
        let original = sample_problem();
        let text = render(|out| write_problem(&original, out));
        assert_eq!(read_problem(&text).unwrap(), original);
    }

    #[test]
    fn test_missing_affinity_machine_survives_reload() {
        let original = Problem::new(
            vec![Job::new(0, 10).with_affinity(vec![1, usize::MAX])],
            vec![Machine::new(0, 5)],
            vec![Disk::new(0, 5, 100)],
        )
        .unwrap();
        let text = render(|out| write_problem(&original, out));

        assert!(text.starts_with(&format!("1\n1 10 0 2 2 {}\n", usize::MAX as u128 + 1)));
        assert_eq!(read_problem(&text).unwrap(), original);
    }

    #[test]
    fn test_write_schedule() {
        let schedule = Schedule::from_assignments(vec![
            Assignment::new(1, 1, 0, 3, 9),
            Assignment::new(0, 0, 0, 0, 3),
        ]);
        let text = render(|out| write_schedule(&schedule, out));
        assert_eq!(text, "1 0 1 1\n2 3 2 1\n");
    }
}
