//! Backend trait and configuration.
//!
//! The [`Backend`] trait defines the lifecycle for interacting with a
//! quantum backend:
//!
//! ```text
//!   capabilities() ──→ validate() ──→ submit() ──→ status() ──→ result()
//!    (sync, &ref)       (async)       (async)      (async)      (async)
//! ```
//!
//! | Method | Kind | Required | Returns |
//! |--------|------|----------|---------|
//! | `name()` | sync | yes | `&str` |
//! | `capabilities()` | sync | yes | `&Capabilities` |
//! | `availability()` | async | yes | `HalResult<BackendAvailability>` |
//! | `validate()` | async | yes | `HalResult<ValidationResult>` |
//! | `submit()` | async | yes | `HalResult<JobId>` |
//! | `status()` | async | yes | `HalResult<JobStatus>` |
//! | `result()` | async | yes | `HalResult<ExecutionResult>` |
//! | `cancel()` | async | yes | `HalResult<()>` |
//! | `wait()` | async | provided | `HalResult<ExecutionResult>` |
//! | `wait_with()` | async | provided | `HalResult<ExecutionResult>` |

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use kickback_ir::Circuit;

use crate::capability::Capabilities;
use crate::error::{HalError, HalResult};
use crate::job::{JobId, JobStatus};
use crate::result::ExecutionResult;

/// Configuration for a backend instance.
///
/// Backend-specific settings (S3 bucket, simulator seed, ...) travel in
/// `extra`, flattened when serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Name the backend reports.
    pub name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BackendConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// Add an extra setting.
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Read a string entry from the extra configuration.
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(serde_json::Value::as_str)
    }
}

/// How long and how often to poll a job before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    /// Delay between status polls.
    pub poll_interval: Duration,
    /// Total time to wait for a terminal status.
    pub timeout: Duration,
}

impl WaitPolicy {
    /// Create a policy from an interval and a timeout.
    pub fn new(poll_interval: Duration, timeout: Duration) -> Self {
        Self {
            poll_interval,
            timeout,
        }
    }
}

impl Default for WaitPolicy {
    /// Poll every 500ms for up to 5 minutes.
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
            timeout: Duration::from_secs(300),
        }
    }
}

/// Trait for quantum backends.
///
/// # Contract
///
/// - `capabilities()` MUST be synchronous and infallible. Capabilities
///   MUST be cached at construction time.
/// - `availability()` SHOULD perform a lightweight liveness check.
/// - `validate()` MUST check the circuit against backend constraints
///   before submission.
/// - `submit()` MUST return a `JobId` whose initial status is `Queued` or
///   later.
/// - `result()` MUST only be called when status is `Completed`.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Get the capabilities of this backend.
    fn capabilities(&self) -> &Capabilities;

    /// Check whether the backend is accepting jobs.
    async fn availability(&self) -> HalResult<BackendAvailability>;

    /// Validate a circuit against backend constraints.
    ///
    /// SHOULD check at minimum qubit count against
    /// `capabilities().num_qubits` and gate support against
    /// `capabilities().gate_set`.
    async fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult>;

    /// Submit a circuit for execution.
    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId>;

    /// Get the status of a job.
    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus>;

    /// Get the result of a completed job.
    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult>;

    /// Cancel a running job.
    async fn cancel(&self, job_id: &JobId) -> HalResult<()>;

    /// Wait for a job to complete and return its result.
    ///
    /// Default implementation polls every 500ms for up to 5 minutes.
    async fn wait(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        self.wait_with(job_id, &WaitPolicy::default()).await
    }

    /// Wait for a job under an explicit polling policy.
    async fn wait_with(&self, job_id: &JobId, policy: &WaitPolicy) -> HalResult<ExecutionResult> {
        use tokio::time::{Instant, sleep};

        let deadline = Instant::now() + policy.timeout;

        loop {
            let status = self.status(job_id).await?;
            debug!("Job {} status: {}", job_id, status);

            match status {
                JobStatus::Completed => return self.result(job_id).await,
                JobStatus::Failed(msg) => return Err(HalError::JobFailed(msg)),
                JobStatus::Cancelled => return Err(HalError::JobCancelled),
                JobStatus::Queued | JobStatus::Running => {}
            }

            let now = Instant::now();
            if now >= deadline {
                warn!("Gave up on job {} after {:?}", job_id, policy.timeout);
                return Err(HalError::Timeout(job_id.0.clone()));
            }
            sleep(policy.poll_interval.min(deadline - now)).await;
        }
    }
}

/// Whether a backend is accepting jobs right now.
#[derive(Debug, Clone)]
pub struct BackendAvailability {
    pub is_available: bool,
    /// Device status text, e.g. the reason a device is offline.
    pub status_message: Option<String>,
}

impl BackendAvailability {
    /// Online with nothing to report. Typical for simulators.
    pub fn always_available() -> Self {
        Self::available(None)
    }

    /// Create availability for an online backend with an optional message.
    pub fn available(status_message: Option<String>) -> Self {
        Self {
            is_available: true,
            status_message,
        }
    }

    /// Create availability for an offline backend.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            is_available: false,
            status_message: Some(reason.into()),
        }
    }
}

/// Result of circuit validation against backend constraints.
#[derive(Debug, Clone)]
pub enum ValidationResult {
    /// Circuit is valid and can be submitted directly.
    Valid,
    /// Circuit is invalid for this backend.
    Invalid {
        /// Reasons the circuit is invalid.
        reasons: Vec<String>,
    },
}

impl ValidationResult {
    /// Check if the circuit is valid (can be submitted as-is).
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// Check `circuit` against qubit capacity and supported gates.
    ///
    /// Shared by backends whose constraints are fully described by their
    /// [`Capabilities`].
    pub fn against(caps: &Capabilities, circuit: &Circuit) -> Self {
        let mut reasons = Vec::new();

        if circuit.num_qubits() > caps.num_qubits as usize {
            reasons.push(format!(
                "Circuit has {} qubits but {} supports {}",
                circuit.num_qubits(),
                caps.name,
                caps.num_qubits
            ));
        }

        let missing = caps.unsupported_gates(circuit);
        if !missing.is_empty() {
            reasons.push(format!(
                "Unsupported gates for {}: {}",
                caps.name,
                missing.join(", ")
            ));
        }

        if reasons.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid { reasons }
        }
    }
}

/// Trait for creating backends from configuration.
pub trait BackendFactory: Backend + Sized {
    /// Create a backend from configuration.
    fn from_config(config: BackendConfig) -> HalResult<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use kickback_ir::QubitId;

    #[test]
    fn test_backend_config_extras_flatten() {
        let config = BackendConfig::new("sv1")
            .with_extra("s3_bucket", serde_json::json!("results"))
            .with_extra("seed", serde_json::json!(7));

        assert_eq!(config.extra_str("s3_bucket"), Some("results"));
        assert_eq!(config.extra_str("seed"), None);
        assert_eq!(config.extra_str("missing"), None);

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "sv1", "s3_bucket": "results", "seed": 7})
        );
        let back: BackendConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back.name, "sv1");
        assert_eq!(back.extra.len(), 2);
    }

    #[test]
    fn test_wait_policy_default() {
        let policy = WaitPolicy::default();
        assert_eq!(policy.poll_interval, Duration::from_millis(500));
        assert_eq!(policy.timeout, Duration::from_secs(300));
    }

    #[test]
    fn test_backend_availability() {
        let avail = BackendAvailability::always_available();
        assert!(avail.is_available);
        assert!(avail.status_message.is_none());

        let avail = BackendAvailability::unavailable("maintenance");
        assert!(!avail.is_available);
        assert_eq!(avail.status_message, Some("maintenance".to_string()));
    }

    #[test]
    fn test_validation_against_capabilities() {
        let caps = Capabilities::simulator(2);
        let mut circuit = Circuit::with_size("wide", 3, 0);
        circuit.h(QubitId(2)).unwrap();

        match ValidationResult::against(&caps, &circuit) {
            ValidationResult::Invalid { reasons } => {
                assert_eq!(reasons.len(), 1);
                assert!(reasons[0].contains("3 qubits"));
            }
            other => panic!("expected Invalid, got {other:?}"),
        }

        let narrow = Circuit::bell().unwrap();
        assert!(ValidationResult::against(&caps, &narrow).is_valid());
    }
}
