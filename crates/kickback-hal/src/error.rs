//! HAL error type.

use thiserror::Error;

/// Failures reported by a backend, grouped by the lifecycle stage they
/// come from.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    // Setup
    #[error("Backend configuration: {0}")]
    Configuration(String),

    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Access denied: {0}")]
    AuthenticationFailed(String),

    // Submission
    #[error("Circuit rejected: {0}")]
    InvalidCircuit(String),

    #[error("Circuit too large: {0}")]
    CircuitTooLarge(String),

    #[error("Shot count rejected: {0}")]
    InvalidShots(String),

    #[error("Submission failed: {0}")]
    SubmissionFailed(String),

    // Execution
    #[error("No such job: {0}")]
    JobNotFound(String),

    #[error("Job failed: {0}")]
    JobFailed(String),

    #[error("Job was cancelled")]
    JobCancelled,

    /// Carries the job id.
    #[error("Timed out waiting for job {0}")]
    Timeout(String),

    /// The backend answered, but the result could not be turned into counts.
    #[error("Malformed result: {0}")]
    MalformedResult(String),

    /// Anything the categories above do not cover.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result alias for backend operations.
pub type HalResult<T> = Result<T, HalError>;
