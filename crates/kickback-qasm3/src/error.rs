//! Error types for the QASM3 emitter.

use thiserror::Error;

/// Errors that can occur while emitting source text.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EmitError {
    /// The instruction has no spelling in the requested dialect.
    #[error("'{instruction}' is not supported by the {dialect} dialect")]
    Unsupported {
        /// Instruction name.
        instruction: String,
        /// Dialect being emitted.
        dialect: &'static str,
    },

    /// Measurement operands do not pair up.
    #[error("Malformed measurement: {0}")]
    MalformedMeasure(String),
}

/// Result type for emit operations.
pub type EmitResult<T> = Result<T, EmitError>;
