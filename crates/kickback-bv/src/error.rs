//! Error types for running Bernstein-Vazirani.

use kickback_hal::HalError;
use kickback_ir::IrError;
use thiserror::Error;

/// Errors surfaced by the oracle builder, execution client and decoder.
///
/// Every error aborts the current run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BvError {
    /// Malformed secret, or a shot count the device cannot run.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The device cannot accept the task.
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The task was accepted but did not produce a usable result.
    #[error("Execution failed: {0}")]
    ExecutionFailure(String),
}

/// Result type for Bernstein-Vazirani operations.
pub type BvResult<T> = Result<T, BvError>;

impl From<HalError> for BvError {
    fn from(e: HalError) -> Self {
        match e {
            HalError::InvalidShots(_) => BvError::InvalidArgument(e.to_string()),
            HalError::BackendUnavailable(_)
            | HalError::AuthenticationFailed(_)
            | HalError::Configuration(_)
            | HalError::SubmissionFailed(_)
            | HalError::InvalidCircuit(_)
            | HalError::CircuitTooLarge(_) => BvError::BackendUnavailable(e.to_string()),
            _ => BvError::ExecutionFailure(e.to_string()),
        }
    }
}

impl From<IrError> for BvError {
    fn from(e: IrError) -> Self {
        BvError::InvalidArgument(format!("cannot build circuit: {e}"))
    }
}
