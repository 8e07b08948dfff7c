//! Errors returned by the scenarios.
use thiserror::Error;

use crate::solvers::{ResolutionError, SolutionStatus};

/// Why a scenario did not produce a report
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScenarioError {
    /// No backend with the requested name and capabilities is compiled in
    #[error("could not create solver {0:?}")]
    BackendUnavailable(String),
    /// The backend finished without an acceptable solution
    #[error("the problem does not have an acceptable solution: status {0}")]
    NoSolution(SolutionStatus),
    /// The backend failed
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

/// Convenience alias for scenario results
pub type Result<T> = std::result::Result<T, ScenarioError>;
