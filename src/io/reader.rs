//! Problem instance loader.
//!
//! Parses the whitespace-separated text format:
//!
//! ```text
//! L                                   job count
//! id size output_size k m1 .. mk      × L   (k affinity machine ids)
//! N                                   machine count
//! id power                            × N
//! M                                   disk count
//! id speed quota                      × M
//! D                                   data dependency count (may be 0)
//! producer consumer                   × D
//! E                                   environment dependency count (may be 0)
//! predecessor successor               × E
//! ```
//!
//! Ids are 1-based in text and 0-based in memory. Records may appear in
//! any order but every id in `1..=count` must appear exactly once. Line
//! breaks carry no meaning.
//!
//! Affinity ids only need to be positive. An id past the machine count is
//! kept as is, like in [`Problem::new`]: it never matches a machine, so a
//! job left without any existing machine is unplaceable.
//!
//! A record count is rejected up front when the remaining input is too
//! short to hold that many records.

use thiserror::Error;

use crate::models::{Disk, Job, Machine, Problem};
use crate::validation::{self, ValidationError};

/// Why a problem instance could not be loaded.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    #[error("unexpected end of input while reading {0}")]
    UnexpectedEof(&'static str),

    #[error("expected an integer for {what}, found '{token}'")]
    InvalidToken { what: &'static str, token: String },

    #[error("invalid {what} count: {value}")]
    InvalidCount { what: &'static str, value: i128 },

    #[error("{what} {value} out of range 1..={max}")]
    OutOfRange {
        what: &'static str,
        value: i128,
        max: usize,
    },

    #[error("duplicate {what} id {id}")]
    DuplicateId { what: &'static str, id: i128 },

    #[error("invalid {what}: {value}")]
    InvalidValue { what: &'static str, value: i128 },

    #[error("unexpected trailing input starting at '{0}'")]
    TrailingInput(String),

    #[error("invalid problem: {}", validation::describe(.0))]
    Validation(Vec<ValidationError>),
}

/// Parses a problem instance from text.
///
/// # Example
/// ```
/// use u_placement::io::read_problem;
///
/// let problem = read_problem("1  1 10 0 1 1  1  1 5  1  1 5 100  0  0").unwrap();
/// assert_eq!(problem.job_count(), 1);
/// assert_eq!(problem.jobs()[0].affinity, vec![0]);
/// ```
pub fn read_problem(input: &str) -> Result<Problem, LoadError> {
    let mut tokens = Tokens::new(input);

    let job_count = tokens.count("job", JOB_RECORD_MIN)?;
    let mut job_slots: Vec<Option<Job>> = vec![None; job_count];
    for _ in 0..job_count {
        let id = tokens.id("job id", job_count)?;
        if job_slots[id].is_some() {
            return Err(LoadError::DuplicateId {
                what: "job",
                id: id as i128 + 1,
            });
        }
        let size = tokens.positive("job size")?;
        let output_size = tokens.non_negative("job output size")?;
        let affinity_count = tokens.non_negative("affinity count")?;
        let mut affinity = Vec::new();
        for _ in 0..affinity_count {
            affinity.push(tokens.handle("affinity machine id")?);
        }
        job_slots[id] = Some(
            Job::new(id, size)
                .with_output_size(output_size)
                .with_affinity(affinity),
        );
    }

    let machine_count = tokens.count("machine", MACHINE_RECORD_LEN)?;
    let mut machine_slots: Vec<Option<Machine>> = vec![None; machine_count];
    for _ in 0..machine_count {
        let id = tokens.id("machine id", machine_count)?;
        if machine_slots[id].is_some() {
            return Err(LoadError::DuplicateId {
                what: "machine",
                id: id as i128 + 1,
            });
        }
        let power = tokens.positive("machine power")?;
        machine_slots[id] = Some(Machine::new(id, power));
    }

    let disk_count = tokens.count("disk", DISK_RECORD_LEN)?;
    let mut disk_slots: Vec<Option<Disk>> = vec![None; disk_count];
    for _ in 0..disk_count {
        let id = tokens.id("disk id", disk_count)?;
        if disk_slots[id].is_some() {
            return Err(LoadError::DuplicateId {
                what: "disk",
                id: id as i128 + 1,
            });
        }
        let speed = tokens.positive("disk speed")?;
        let quota = tokens.non_negative("disk quota")?;
        disk_slots[id] = Some(Disk::new(id, speed, quota));
    }

    // Every slot is filled: `count` distinct ids drawn from 1..=count.
    let mut jobs: Vec<Job> = job_slots.into_iter().flatten().collect();
    let machines: Vec<Machine> = machine_slots.into_iter().flatten().collect();
    let disks: Vec<Disk> = disk_slots.into_iter().flatten().collect();

    let data_count = tokens.non_negative("data dependency count")?;
    for _ in 0..data_count {
        let producer = tokens.id("data dependency producer", job_count)?;
        let consumer = tokens.id("data dependency consumer", job_count)?;
        jobs[consumer].data_deps.push(producer);
    }

    let env_count = tokens.non_negative("environment dependency count")?;
    for _ in 0..env_count {
        let predecessor = tokens.id("environment dependency predecessor", job_count)?;
        let successor = tokens.id("environment dependency successor", job_count)?;
        jobs[successor].env_deps.push(predecessor);
    }

    if let Some(extra) = tokens.next() {
        return Err(LoadError::TrailingInput(extra.to_string()));
    }

    Problem::new(jobs, machines, disks).map_err(LoadError::Validation)
}

/// Fewest tokens a job record can take: id, size, output size, affinity count.
const JOB_RECORD_MIN: usize = 4;
const MACHINE_RECORD_LEN: usize = 2;
const DISK_RECORD_LEN: usize = 3;

fn to_index(what: &'static str, value: i128, max: usize) -> Result<usize, LoadError> {
    match usize::try_from(value) {
        Ok(v) if (1..=max).contains(&v) => Ok(v - 1),
        _ => Err(LoadError::OutOfRange { what, value, max }),
    }
}

struct Tokens<'a> {
    tokens: Vec<&'a str>,
    pos: usize,
}

impl<'a> Tokens<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            tokens: input.split_ascii_whitespace().collect(),
            pos: 0,
        }
    }

    fn next(&mut self) -> Option<&'a str> {
        let token = self.tokens.get(self.pos).copied()?;
        self.pos += 1;
        Some(token)
    }

    fn remaining(&self) -> usize {
        self.tokens.len() - self.pos
    }

    fn int(&mut self, what: &'static str) -> Result<i128, LoadError> {
        let token = self.next().ok_or(LoadError::UnexpectedEof(what))?;
        token.parse().map_err(|_| LoadError::InvalidToken {
            what,
            token: token.to_string(),
        })
    }

    /// A record count that must be at least 1 and leave room for that many
    /// records of at least `record_len` tokens each.
    fn count(&mut self, what: &'static str, record_len: usize) -> Result<usize, LoadError> {
        let value = self.int(what)?;
        let fits = self.remaining() / record_len;
        match usize::try_from(value) {
            Ok(v) if v > 0 && v <= fits => Ok(v),
            _ => Err(LoadError::InvalidCount { what, value }),
        }
    }

    fn positive(&mut self, what: &'static str) -> Result<u64, LoadError> {
        let value = self.int(what)?;
        match u64::try_from(value) {
            Ok(v) if v > 0 => Ok(v),
            _ => Err(LoadError::InvalidValue { what, value }),
        }
    }

    fn non_negative(&mut self, what: &'static str) -> Result<u64, LoadError> {
        let value = self.int(what)?;
        u64::try_from(value).map_err(|_| LoadError::InvalidValue { what, value })
    }

    /// A 1-based id in `1..=max`, returned 0-based.
    fn id(&mut self, what: &'static str, max: usize) -> Result<usize, LoadError> {
        let value = self.int(what)?;
        to_index(what, value, max)
    }

    /// A positive 1-based id with no upper bound, returned 0-based.
    fn handle(&mut self, what: &'static str) -> Result<usize, LoadError> {
        let value = self.int(what)?;
        if value <= 0 {
            return Err(LoadError::InvalidValue { what, value });
        }
        usize::try_from(value - 1).map_err(|_| LoadError::InvalidValue { what, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    const SAMPLE: &str = "\
4
1 10 20 2 1 2
2 8 0 1 2
3 6 10 2 1 2
4 12 5 1 1
2
1 5
2 4
2
1 10 100
2 5 100
2
1 2
1 3
1
3 4
";

    #[test]
    fn test_read_sample() {
        let p = read_problem(SAMPLE).unwrap();
        assert_eq!(p.job_count(), 4);
        assert_eq!(p.machine_count(), 2);
        assert_eq!(p.disk_count(), 2);

        let j0 = &p.jobs()[0];
        assert_eq!((j0.size, j0.output_size), (10, 20));
        assert_eq!(j0.affinity, vec![0, 1]);
        assert_eq!(p.jobs()[1].affinity, vec![1]);
        assert_eq!(p.jobs()[1].data_deps, vec![0]);
        assert_eq!(p.jobs()[2].data_deps, vec![0]);
        assert_eq!(p.jobs()[3].env_deps, vec![2]);
        assert_eq!(p.machines()[1].power, 4);
        assert_eq!(p.disks()[1].speed, 5);
        assert_eq!(p.dependency_count(), (2, 1));
    }

    #[test]
    fn test_records_placed_by_id() {
        let p = read_problem("2  2 7 0 1 1  1 3 0 1 1  1  1 1  1  1 1 0  0 0").unwrap();
        assert_eq!(p.jobs()[0].size, 3);
        assert_eq!(p.jobs()[1].size, 7);
    }

    #[test]
    fn test_invalid_job_count() {
        assert_eq!(
            read_problem("0"),
            Err(LoadError::InvalidCount {
                what: "job",
                value: 0
            })
        );
        assert!(matches!(
            read_problem("-3"),
            Err(LoadError::InvalidCount { value: -3, .. })
        ));
    }

    #[test]
    fn test_unexpected_eof() {
        assert_eq!(
            read_problem("1 1 10 0 2 1"),
            Err(LoadError::UnexpectedEof("affinity machine id"))
        );
        assert_eq!(
            read_problem("1  1 10 0 1 1  1  1 5  1  1 5 100  0"),
            Err(LoadError::UnexpectedEof("environment dependency count"))
        );
        assert_eq!(read_problem(""), Err(LoadError::UnexpectedEof("job")));
    }

    #[test]
    fn test_invalid_token() {
        assert_eq!(
            read_problem("1 1 ten 0 0"),
            Err(LoadError::InvalidToken {
                what: "job size",
                token: "ten".into()
            })
        );
    }

    #[test]
    fn test_non_positive_size() {
        assert!(matches!(
            read_problem("1 1 0 0 1 1"),
            Err(LoadError::InvalidValue { what: "job size", value: 0 })
        ));
        assert!(matches!(
            read_problem("1 1 5 -1 1 1"),
            Err(LoadError::InvalidValue { what: "job output size", .. })
        ));
    }

    #[test]
    fn test_count_larger_than_input() {
        assert_eq!(
            read_problem("9223372036854775807 1"),
            Err(LoadError::InvalidCount {
                what: "job",
                value: i64::MAX as i128
            })
        );
        // Two job records need at least 8 tokens.
        assert_eq!(
            read_problem("2  1 1 0 1 1"),
            Err(LoadError::InvalidCount {
                what: "job",
                value: 2
            })
        );
        assert!(matches!(
            read_problem("1  1 10 0 1 1  99999999999999999999  1 5"),
            Err(LoadError::InvalidCount { what: "machine", .. })
        ));
    }

    #[test]
    fn test_affinity_beyond_machine_count_is_kept() {
        let p = read_problem("1  1 10 0 2 3 1  1  1 5  1  1 5 100  0 0").unwrap();
        assert_eq!(p.jobs()[0].affinity, vec![2, 0]);
        assert!(p.jobs()[0].allows(0));
    }

    #[test]
    fn test_non_positive_affinity_id() {
        let err = read_problem("1  1 10 0 1 0  1  1 5  1  1 5 100  0 0").unwrap_err();
        assert_eq!(
            err,
            LoadError::InvalidValue {
                what: "affinity machine id",
                value: 0
            }
        );
    }

    #[test]
    fn test_values_beyond_i64_range() {
        let p = read_problem("1  1 18446744073709551615 18446744073709551615 1 1  1  1 5  1  1 5 18446744073709551615  0 0")
            .unwrap();
        assert_eq!(p.jobs()[0].size, u64::MAX);
        assert_eq!(p.disks()[0].quota, u64::MAX);

        assert!(matches!(
            read_problem("1  1 18446744073709551616 0 1 1  1  1 5  1  1 5 1  0 0"),
            Err(LoadError::InvalidValue { what: "job size", .. })
        ));
    }

    #[test]
    fn test_duplicate_id() {
        let err = read_problem("2  1 1 0 1 1  1 1 0 1 1").unwrap_err();
        assert_eq!(err, LoadError::DuplicateId { what: "job", id: 1 });
    }

    #[test]
    fn test_dependency_out_of_range() {
        let err = read_problem("1  1 10 0 1 1  1  1 5  1  1 5 100  1 1 2  0").unwrap_err();
        assert!(matches!(err, LoadError::OutOfRange { value: 2, max: 1, .. }));
    }

    #[test]
    fn test_trailing_input() {
        let err = read_problem("1  1 10 0 1 1  1  1 5  1  1 5 100  0 0 junk").unwrap_err();
        assert_eq!(err, LoadError::TrailingInput("junk".into()));
    }

    #[test]
    fn test_cycle_reported_as_validation_error() {
        let err = read_problem("2  1 1 0 1 1  2 1 0 1 1  1  1 1  1  1 1 0  1 1 2  1 2 1")
            .unwrap_err();
        match err {
            LoadError::Validation(errors) => assert!(errors
                .iter()
                .any(|e| e.kind == ValidationErrorKind::CyclicDependency)),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_affinity_reported_as_validation_error() {
        let err = read_problem("1  1 10 0 0  1  1 5  1  1 5 100  0 0").unwrap_err();
        assert!(matches!(err, LoadError::Validation(_)));
    }
}
