//! Submitting circuits and waiting for their counts.

use kickback_hal::{Backend, ExecutionResult, HalError, ValidationResult, WaitPolicy};
use kickback_ir::Circuit;
use tracing::{debug, info, instrument, warn};

use crate::algorithm::bernstein_vazirani;
use crate::decode::{BvOutcome, decode};
use crate::error::{BvError, BvResult};
use crate::secret::SecretString;

/// Shots used when the caller does not choose.
pub const DEFAULT_SHOTS: u32 = 100;

/// Runs circuits on one backend.
///
/// The backend is handed in explicitly; the client holds no other state.
/// Failures are returned as they happen and never retried.
pub struct ExecutionClient {
    backend: Box<dyn Backend>,
    wait_policy: WaitPolicy,
}

impl ExecutionClient {
    /// Create a client using the default wait policy.
    pub fn new(backend: Box<dyn Backend>) -> Self {
        Self {
            backend,
            wait_policy: WaitPolicy::default(),
        }
    }

    /// Replace the polling interval and timeout.
    pub fn with_wait_policy(mut self, policy: WaitPolicy) -> Self {
        self.wait_policy = policy;
        self
    }

    /// The backend jobs are submitted to.
    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    /// The active wait policy.
    pub fn wait_policy(&self) -> &WaitPolicy {
        &self.wait_policy
    }

    /// Submit `circuit` and block until its counts are available.
    ///
    /// Shot count, qubit capacity and gate support are checked before
    /// anything is submitted.
    #[instrument(skip(self, circuit), fields(backend = %self.backend.name(), circuit = %circuit.name()))]
    pub async fn run(&self, circuit: &Circuit, shots: u32) -> BvResult<ExecutionResult> {
        let caps = self.backend.capabilities();

        if shots == 0 {
            return Err(BvError::InvalidArgument("shot count must be positive".into()));
        }
        if shots > caps.max_shots {
            return Err(BvError::InvalidArgument(format!(
                "{shots} shots exceeds the maximum of {} for {}",
                caps.max_shots, caps.name
            )));
        }
        if circuit.num_qubits() > caps.num_qubits as usize {
            return Err(BvError::BackendUnavailable(format!(
                "circuit needs {} qubits but {} has {}",
                circuit.num_qubits(),
                caps.name,
                caps.num_qubits
            )));
        }

        let availability = self.backend.availability().await?;
        if !availability.is_available {
            return Err(BvError::BackendUnavailable(
                availability
                    .status_message
                    .unwrap_or_else(|| format!("{} is not accepting jobs", caps.name)),
            ));
        }

        match self.backend.validate(circuit).await? {
            ValidationResult::Valid => {}
            ValidationResult::Invalid { reasons } => {
                return Err(BvError::BackendUnavailable(reasons.join("; ")));
            }
        }

        let job_id = self.backend.submit(circuit, shots).await?;
        info!("Submitted job {} ({} shots)", job_id, shots);

        match self.backend.wait_with(&job_id, &self.wait_policy).await {
            Ok(result) => {
                debug!("Job {} returned {} outcomes", job_id, result.counts.len());
                Ok(result)
            }
            Err(e @ HalError::Timeout(_)) => {
                if let Err(cancel_err) = self.backend.cancel(&job_id).await {
                    warn!("Could not cancel timed-out job {}: {}", job_id, cancel_err);
                }
                Err(e.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Assemble the circuit for `secret`, run it and decode the answer.
    pub async fn run_secret(&self, secret: &SecretString, shots: u32) -> BvResult<BvOutcome> {
        let circuit = bernstein_vazirani(secret)?;
        let result = self.run(&circuit, shots).await?;
        decode(&result.counts, secret.len())
    }
}
