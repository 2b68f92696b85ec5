//! Error types for the AWS Braket adapter.

use kickback_hal::HalError;
use thiserror::Error;

/// Result type for Braket operations.
pub type BraketResult<T> = Result<T, BraketError>;

/// Errors that can occur when using AWS Braket.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BraketError {
    /// AWS rejected the caller's credentials or permissions.
    #[error("AWS access denied: {0}")]
    AccessDenied(String),

    /// Missing S3 bucket configuration.
    #[error(
        "S3 bucket not configured. Set braket.s3_bucket in the config file or KICKBACK_BRAKET_S3_BUCKET."
    )]
    MissingS3Bucket,

    /// Invalid device ARN.
    #[error("Invalid device ARN: {0}")]
    InvalidDeviceArn(String),

    /// Device name is neither a known alias nor a Braket ARN.
    #[error("Unknown Braket device '{0}'")]
    UnknownDevice(String),

    /// Braket API error.
    #[error("Braket API error: {0}")]
    BraketApi(String),

    /// S3 error.
    #[error("S3 error: {0}")]
    S3Error(String),

    /// Task not found.
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    /// Task failed.
    #[error("Task failed: {0}")]
    TaskFailed(String),

    /// Task was cancelled.
    #[error("Task was cancelled: {0}")]
    TaskCancelled(String),

    /// Circuit conversion error.
    #[error("Circuit conversion error: {0}")]
    CircuitError(String),

    /// Device unavailable.
    #[error("Device not available: {0}")]
    DeviceUnavailable(String),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Circuit too large for device.
    #[error("Circuit requires {required} qubits but device only has {available}")]
    TooManyQubits {
        /// Qubits needed.
        required: usize,
        /// Qubits available.
        available: usize,
    },

    /// Invalid parameter.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Result parsing error.
    #[error("Failed to parse task result: {0}")]
    ResultParseError(String),
}

/// Classify a rendered AWS SDK error by the exception name it carries.
pub(crate) fn classify_api_error(message: String) -> BraketError {
    const AUTH_MARKERS: [&str; 5] = [
        "AccessDeniedException",
        "UnrecognizedClientException",
        "ExpiredToken",
        "InvalidClientTokenId",
        "failed to load credentials",
    ];

    if AUTH_MARKERS.iter().any(|m| message.contains(m)) {
        BraketError::AccessDenied(message)
    } else if message.contains("ResourceNotFoundException") {
        BraketError::TaskNotFound(message)
    } else if message.contains("DeviceOfflineException") || message.contains("DeviceRetiredException")
    {
        BraketError::DeviceUnavailable(message)
    } else {
        BraketError::BraketApi(message)
    }
}

impl From<BraketError> for HalError {
    fn from(e: BraketError) -> Self {
        match e {
            BraketError::AccessDenied(_) => HalError::AuthenticationFailed(e.to_string()),
            BraketError::MissingS3Bucket
            | BraketError::InvalidDeviceArn(_)
            | BraketError::UnknownDevice(_)
            | BraketError::InvalidParameter(_) => HalError::Configuration(e.to_string()),
            BraketError::TaskNotFound(id) => HalError::JobNotFound(id),
            BraketError::TaskFailed(msg) => HalError::JobFailed(msg),
            BraketError::TaskCancelled(_) => HalError::JobCancelled,
            BraketError::DeviceUnavailable(msg) => HalError::BackendUnavailable(msg),
            BraketError::TooManyQubits {
                required,
                available,
            } => HalError::CircuitTooLarge(format!(
                "Circuit requires {required} qubits but device only has {available}"
            )),
            BraketError::CircuitError(msg) => HalError::InvalidCircuit(msg),
            BraketError::ResultParseError(msg) => HalError::MalformedResult(msg),
            BraketError::JsonError(err) => HalError::MalformedResult(err.to_string()),
            BraketError::BraketApi(_) | BraketError::S3Error(_) => HalError::Backend(e.to_string()),
        }
    }
}
