//! Simulator backend implementation.

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use kickback_hal::{
    Backend, BackendAvailability, BackendConfig, BackendFactory, Capabilities, Counts,
    ExecutionResult, HalError, HalResult, Job, JobId, JobStatus, ValidationResult,
};
use kickback_ir::Circuit;

use crate::statevector::{Readout, Statevector};

/// Default qubit limit: 2^24 amplitudes, 256 MiB of state.
pub const DEFAULT_MAX_QUBITS: u32 = 24;

/// Job table size at which finished jobs are evicted.
const MAX_TRACKED_JOBS: usize = 10_000;

/// Job data for the simulator.
struct SimJob {
    job: Job,
    result: Option<ExecutionResult>,
}

type JobTable = Arc<Mutex<FxHashMap<String, SimJob>>>;

fn lock(jobs: &JobTable) -> MutexGuard<'_, FxHashMap<String, SimJob>> {
    jobs.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Insert `job`, first dropping every terminal job if the table holds `cap`.
fn track(jobs: &mut FxHashMap<String, SimJob>, id: String, job: SimJob, cap: usize) {
    if jobs.len() >= cap {
        let before = jobs.len();
        jobs.retain(|_, j| j.job.status.is_pending());
        debug!("Evicted {} finished jobs", before - jobs.len());
    }
    jobs.insert(id, job);
}

/// Local simulator backend.
///
/// Simulates each circuit once as a dense statevector and samples every
/// shot from the final distribution. Noiseless, so deterministic circuits
/// produce a single outcome. Simulation runs on tokio's blocking pool;
/// `submit` returns as soon as the job is queued.
pub struct SimulatorBackend {
    /// Backend configuration.
    config: BackendConfig,
    /// Cached capabilities.
    capabilities: Capabilities,
    /// Active jobs.
    jobs: JobTable,
    /// Seed for shot sampling; entropy-seeded when unset.
    seed: Option<u64>,
}

impl SimulatorBackend {
    /// Create a new simulator backend with default settings.
    pub fn new() -> Self {
        Self::with_max_qubits(DEFAULT_MAX_QUBITS)
    }

    /// Create a simulator with custom max qubits.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self {
            config: BackendConfig::new("simulator"),
            capabilities: Capabilities::simulator(max_qubits),
            jobs: Arc::new(Mutex::new(FxHashMap::default())),
            seed: None,
        }
    }

    /// Fix the sampling seed so repeated runs produce identical counts.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn check_request(&self, circuit: &Circuit, shots: u32) -> HalResult<()> {
        let caps = &self.capabilities;
        if shots == 0 || shots > caps.max_shots {
            return Err(HalError::InvalidShots(format!(
                "{shots} shots requested, simulator accepts 1..={}",
                caps.max_shots
            )));
        }
        if circuit.num_qubits() > caps.num_qubits as usize {
            return Err(HalError::CircuitTooLarge(format!(
                "Circuit has {} qubits but simulator only supports {}",
                circuit.num_qubits(),
                caps.num_qubits
            )));
        }
        match ValidationResult::against(caps, circuit) {
            ValidationResult::Valid => Ok(()),
            ValidationResult::Invalid { reasons } => {
                Err(HalError::InvalidCircuit(reasons.join("; ")))
            }
        }
    }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Run a simulation to completion on the calling thread.
#[instrument(skip(circuit), fields(circuit = circuit.name(), qubits = circuit.num_qubits()))]
fn run_simulation(circuit: &Circuit, shots: u32, seed: Option<u64>) -> ExecutionResult {
    let start = Instant::now();

    let sv = Statevector::from_circuit(circuit);
    let readout = Readout::for_circuit(circuit);

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let counts: Counts = sv
        .sample_counts(shots, &mut rng)
        .into_iter()
        .map(|(outcome, n)| (readout.bitstring(outcome), n))
        .collect();

    let elapsed = start.elapsed();
    debug!(
        "Simulation finished in {:?}: {} distinct outcomes",
        elapsed,
        counts.len()
    );

    ExecutionResult::new(counts, shots)
        .with_execution_time(elapsed.as_millis() as u64)
        .with_metadata(serde_json::json!({
            "backend": "simulator",
            "num_qubits": circuit.num_qubits(),
            "seed": seed,
        }))
}

#[async_trait]
impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn availability(&self) -> HalResult<BackendAvailability> {
        Ok(BackendAvailability::always_available())
    }

    async fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult> {
        Ok(ValidationResult::against(&self.capabilities, circuit))
    }

    #[instrument(skip(self, circuit))]
    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId> {
        self.check_request(circuit, shots)?;

        let job_id = JobId::new(Uuid::new_v4().to_string());
        let mut job = Job::new(job_id.clone(), shots);
        job.transition(JobStatus::Running);

        track(
            &mut lock(&self.jobs),
            job_id.0.clone(),
            SimJob { job, result: None },
            MAX_TRACKED_JOBS,
        );
        debug!("Submitted job: {}", job_id);

        let jobs = Arc::clone(&self.jobs);
        let circuit = circuit.clone();
        let seed = self.seed;
        let id = job_id.0.clone();
        tokio::spawn(async move {
            let outcome =
                tokio::task::spawn_blocking(move || run_simulation(&circuit, shots, seed)).await;

            let mut jobs = lock(&jobs);
            let Some(sim_job) = jobs.get_mut(&id) else {
                return;
            };
            match outcome {
                Ok(result) => {
                    if sim_job.job.status.is_pending() {
                        sim_job.result = Some(result);
                    }
                    sim_job.job.transition(JobStatus::Completed);
                }
                Err(e) => {
                    warn!("Simulation task for job {} aborted: {}", id, e);
                    sim_job
                        .job
                        .transition(JobStatus::Failed(format!("simulation aborted: {e}")));
                }
            }
        });

        Ok(job_id)
    }

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        lock(&self.jobs)
            .get(&job_id.0)
            .map(|j| j.job.status.clone())
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))
    }

    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let jobs = lock(&self.jobs);
        let sim_job = jobs
            .get(&job_id.0)
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;
        match (&sim_job.job.status, &sim_job.result) {
            (JobStatus::Completed, Some(result)) => Ok(result.clone()),
            (JobStatus::Failed(msg), _) => Err(HalError::JobFailed(msg.clone())),
            (JobStatus::Cancelled, _) => Err(HalError::JobCancelled),
            (status, _) => Err(HalError::Backend(format!(
                "Job {job_id} has no result yet (status: {status})"
            ))),
        }
    }

    async fn cancel(&self, job_id: &JobId) -> HalResult<()> {
        let mut jobs = lock(&self.jobs);
        let sim_job = jobs
            .get_mut(&job_id.0)
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;
        sim_job.job.transition(JobStatus::Cancelled);
        Ok(())
    }
}

impl BackendFactory for SimulatorBackend {
    fn from_config(config: BackendConfig) -> HalResult<Self> {
        let max_qubits = match config.extra.get("max_qubits") {
            None => DEFAULT_MAX_QUBITS,
            Some(value) => value
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .filter(|&v| (1..=30).contains(&v))
                .ok_or_else(|| {
                    HalError::Configuration(format!(
                        "max_qubits must be an integer in 1..=30, got {value}"
                    ))
                })?,
        };
        let seed = config
            .extra
            .get("seed")
            .and_then(serde_json::Value::as_u64);

        Ok(Self {
            capabilities: Capabilities::simulator(max_qubits),
            config,
            jobs: Arc::new(Mutex::new(FxHashMap::default())),
            seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kickback_hal::WaitPolicy;
    use std::time::Duration;

    fn fast_policy() -> WaitPolicy {
        WaitPolicy::new(Duration::from_millis(5), Duration::from_secs(30))
    }

    #[test]
    fn test_simulator_capabilities() {
        let backend = SimulatorBackend::new();
        let caps = backend.capabilities();

        assert!(caps.is_simulator);
        assert_eq!(caps.num_qubits, DEFAULT_MAX_QUBITS);
        assert_eq!(backend.name(), "simulator");
    }

    #[tokio::test]
    async fn test_simulator_bell_state() {
        let backend = SimulatorBackend::new().with_seed(11);

        let circuit = Circuit::bell().unwrap();
        let job_id = backend.submit(&circuit, 1000).await.unwrap();
        let result = backend.wait_with(&job_id, &fast_policy()).await.unwrap();

        assert_eq!(result.shots, 1000);
        assert_eq!(result.counts.total_shots(), 1000);
        for (bitstring, _) in result.counts.iter() {
            assert!(bitstring == "00" || bitstring == "11", "got {bitstring}");
        }
        assert!(backend.status(&job_id).await.unwrap().is_success());
    }

    #[tokio::test]
    async fn test_zero_and_excess_shots_rejected() {
        let backend = SimulatorBackend::new();
        let circuit = Circuit::bell().unwrap();

        let zero = backend.submit(&circuit, 0).await;
        assert!(matches!(zero, Err(HalError::InvalidShots(_))));

        let excess = backend.submit(&circuit, 100_001).await;
        assert!(matches!(excess, Err(HalError::InvalidShots(_))));
    }

    #[tokio::test]
    async fn test_unknown_job() {
        let backend = SimulatorBackend::new();
        let missing = JobId::new("missing");

        assert!(matches!(
            backend.status(&missing).await,
            Err(HalError::JobNotFound(_))
        ));
        assert!(matches!(
            backend.cancel(&missing).await,
            Err(HalError::JobNotFound(_))
        ));
    }

    fn sim_job(id: &str, status: JobStatus) -> SimJob {
        let mut job = Job::new(JobId::new(id), 1);
        job.transition(status);
        SimJob { job, result: None }
    }

    #[test]
    fn test_full_table_evicts_finished_jobs() {
        let mut jobs = FxHashMap::default();
        track(&mut jobs, "done".into(), sim_job("done", JobStatus::Completed), 3);
        track(&mut jobs, "busy".into(), sim_job("busy", JobStatus::Running), 3);
        track(&mut jobs, "gone".into(), sim_job("gone", JobStatus::Cancelled), 3);
        assert_eq!(jobs.len(), 3);

        track(&mut jobs, "next".into(), sim_job("next", JobStatus::Running), 3);

        let mut ids: Vec<&str> = jobs.keys().map(String::as_str).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["busy", "next"]);
    }

    #[test]
    fn test_table_below_cap_keeps_history() {
        let mut jobs = FxHashMap::default();
        track(&mut jobs, "a".into(), sim_job("a", JobStatus::Completed), 3);
        track(&mut jobs, "b".into(), sim_job("b", JobStatus::Completed), 3);
        assert_eq!(jobs.len(), 2);
    }

    #[test]
    fn test_from_config() {
        let config = BackendConfig::new("sim")
            .with_extra("max_qubits", serde_json::json!(8))
            .with_extra("seed", serde_json::json!(3));
        let backend = SimulatorBackend::from_config(config).unwrap();

        assert_eq!(backend.name(), "sim");
        assert_eq!(backend.capabilities().num_qubits, 8);
        assert_eq!(backend.seed, Some(3));
    }

    #[test]
    fn test_from_config_rejects_bad_max_qubits() {
        let config = BackendConfig::new("sim").with_extra("max_qubits", serde_json::json!("lots"));
        assert!(matches!(
            SimulatorBackend::from_config(config),
            Err(HalError::Configuration(_))
        ));
    }
}
