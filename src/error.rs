//! Error types for u-placement.
//!
//! ## Table of Contents
//! - **PlacementError**: Main error enum covering all failure modes
//! - **Result**: Type alias for `Result<T, PlacementError>`
//!
//! Infeasible chromosomes are not errors: the optimizer meets them
//! constantly and scores them as zero fitness. Only a run that never finds
//! a feasible chromosome surfaces as [`PlacementError::NoFeasibleSchedule`].

use thiserror::Error;

use crate::ga::Infeasibility;
use crate::io::LoadError;
use crate::validation::{self, ValidationError};

/// Result type alias for u-placement operations
pub type Result<T> = std::result::Result<T, PlacementError>;

/// Main error type for u-placement operations
#[derive(Error, Debug)]
pub enum PlacementError {
    /// Optimizer parameters out of range
    #[error("configuration error: {0}")]
    Config(String),

    /// Problem model violates structural invariants
    #[error("invalid problem: {}", validation::describe(.0))]
    InvalidProblem(Vec<ValidationError>),

    /// Problem text could not be loaded
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Every chromosome seen during the run was infeasible
    #[error("no feasible schedule found after {generations} generations")]
    NoFeasibleSchedule { generations: usize },

    /// A specific chromosome could not be decoded
    #[error("infeasible schedule: {0}")]
    Infeasible(#[from] Infeasibility),
}

impl PlacementError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<Vec<ValidationError>> for PlacementError {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::InvalidProblem(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_messages() {
        let e = PlacementError::config("population_size must be positive");
        assert_eq!(
            e.to_string(),
            "configuration error: population_size must be positive"
        );

        let e = PlacementError::NoFeasibleSchedule { generations: 5 };
        assert_eq!(e.to_string(), "no feasible schedule found after 5 generations");
    }

    #[test]
    fn test_from_validation_errors() {
        let errors = vec![
            ValidationError::new(ValidationErrorKind::EmptyInput, "Problem has no jobs"),
            ValidationError::new(ValidationErrorKind::EmptyInput, "Problem has no disks"),
        ];
        let e: PlacementError = errors.into();
        assert_eq!(
            e.to_string(),
            "invalid problem: Problem has no jobs; Problem has no disks"
        );
    }
}
