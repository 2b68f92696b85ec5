//! AWS Braket backend implementation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};

use kickback_hal::{
    Backend, BackendAvailability, BackendConfig, Capabilities, Counts, ExecutionResult, HalError,
    HalResult, Job, JobId, JobStatus, ValidationResult,
};
use kickback_ir::Circuit;
use kickback_qasm3::emit_braket;

use crate::api::{
    BraketClient, BraketConfig, DeviceInfo, DeviceStatus, DeviceType, TaskResult, TaskStatus,
};
use crate::device::{capabilities_for_device, region_from_arn, resolve_device};
use crate::error::{BraketError, BraketResult};

/// Maximum number of cached jobs before eviction of terminal entries.
const MAX_CACHED_JOBS: usize = 10_000;

/// How long to cache device info before refreshing from the API.
const DEVICE_INFO_TTL: Duration = Duration::from_secs(5 * 60);

/// A cached job entry.
struct CachedJob {
    /// Job bookkeeping, including the submitted shot count.
    job: Job,
    /// Cached result (if completed).
    result: Option<ExecutionResult>,
}

/// AWS Braket backend adapter.
///
/// Provides access to quantum hardware and simulators available through
/// the AWS Braket service: Rigetti, IonQ, IQM and Amazon's managed
/// simulators (SV1, TN1, DM1).
pub struct BraketBackend {
    /// Identifier the backend was selected by.
    name: String,
    /// Braket API client.
    client: Arc<BraketClient>,
    /// Device ARN.
    device_arn: String,
    /// Cached capabilities.
    capabilities: Capabilities,
    /// Job cache: task ARN -> cached job.
    jobs: Arc<Mutex<FxHashMap<String, CachedJob>>>,
    /// Cached device info with fetch timestamp for TTL-based refresh.
    device_info: Arc<RwLock<Option<(DeviceInfo, Instant)>>>,
}

impl BraketBackend {
    /// Connect to a Braket device.
    ///
    /// Devices pinned to a region (every QPU) are always called in that
    /// region; `config.region` only applies to the managed simulators.
    pub async fn connect(
        name: impl Into<String>,
        device_arn: impl Into<String>,
        mut config: BraketConfig,
    ) -> BraketResult<Self> {
        let device_arn = device_arn.into();

        if let Some(region) = region_from_arn(&device_arn) {
            if region != config.region {
                debug!("Using device region {} instead of {}", region, config.region);
                config.region = region.to_string();
            }
        }

        let client = BraketClient::new(config).await?;

        let capabilities = match capabilities_for_device(&device_arn) {
            Some(caps) => caps,
            None => {
                info!("No preset for {}, querying device", device_arn);
                let info = client.get_device(&device_arn).await?;
                build_capabilities_from_info(&info)
            }
        };

        Ok(Self {
            name: name.into(),
            client: Arc::new(client),
            device_arn,
            capabilities,
            jobs: Arc::new(Mutex::new(FxHashMap::default())),
            device_info: Arc::new(RwLock::new(None)),
        })
    }

    /// Connect using a generic backend configuration.
    ///
    /// `config.name` is a catalogue name, an alias or a raw device ARN.
    /// The result location comes from the `s3_bucket`, `s3_prefix` and
    /// `region` extras, falling back to the environment.
    pub async fn from_backend_config(config: BackendConfig) -> HalResult<Self> {
        let device_arn = resolve_device(&config.name)
            .ok_or_else(|| BraketError::UnknownDevice(config.name.clone()))?;
        let braket_config = braket_config(&config)?;
        Ok(Self::connect(config.name, device_arn, braket_config).await?)
    }

    /// Get the device ARN.
    pub fn device_arn(&self) -> &str {
        &self.device_arn
    }

    /// Get device info with TTL caching.
    async fn get_device_info(&self) -> BraketResult<DeviceInfo> {
        {
            let cached = self.device_info.read().await;
            if let Some((ref info, fetched_at)) = *cached {
                if fetched_at.elapsed() < DEVICE_INFO_TTL {
                    return Ok(info.clone());
                }
            }
        }

        let info = self.client.get_device(&self.device_arn).await?;
        *self.device_info.write().await = Some((info.clone(), Instant::now()));
        Ok(info)
    }

    fn check_request(&self, circuit: &Circuit, shots: u32) -> HalResult<()> {
        let caps = &self.capabilities;
        if shots == 0 || shots > caps.max_shots {
            return Err(HalError::InvalidShots(format!(
                "{shots} shots requested, {} accepts 1..={}",
                caps.name, caps.max_shots
            )));
        }
        if circuit.num_qubits() > caps.num_qubits as usize {
            return Err(BraketError::TooManyQubits {
                required: circuit.num_qubits(),
                available: caps.num_qubits as usize,
            }
            .into());
        }
        let missing = caps.unsupported_gates(circuit);
        if !missing.is_empty() {
            return Err(HalError::InvalidCircuit(format!(
                "{} does not support: {}",
                caps.name,
                missing.join(", ")
            )));
        }
        Ok(())
    }
}

/// Resolve the result location from backend extras, then the environment.
fn braket_config(config: &BackendConfig) -> BraketResult<BraketConfig> {
    BraketConfig::from_lookup(|key| {
        let extra_key = match key {
            "KICKBACK_BRAKET_S3_BUCKET" => "s3_bucket",
            "KICKBACK_BRAKET_S3_PREFIX" => "s3_prefix",
            "AWS_REGION" => "region",
            _ => return None,
        };
        config
            .extra_str(extra_key)
            .map(str::to_string)
            .or_else(|| std::env::var(key).ok())
    })
}

fn job_status(task_status: TaskStatus) -> JobStatus {
    match task_status {
        TaskStatus::Created | TaskStatus::Queued => JobStatus::Queued,
        // A cancel request can still lose to completion; keep polling.
        TaskStatus::Running | TaskStatus::Cancelling => JobStatus::Running,
        TaskStatus::Completed => JobStatus::Completed,
        TaskStatus::Failed(msg) => JobStatus::Failed(msg),
        TaskStatus::Cancelled => JobStatus::Cancelled,
    }
}

/// Parse a task result document into counts.
///
/// Tries `measurementCounts`, then raw `measurements`, then
/// `measurementProbabilities` scaled to `submitted_shots`.
fn parse_result(result: &TaskResult, submitted_shots: u32) -> BraketResult<Counts> {
    if let Some(counts) = result.measurement_counts.as_ref().filter(|c| !c.is_empty()) {
        return Ok(counts.iter().map(|(k, &v)| (k.clone(), v)).collect());
    }

    if let Some(measurements) = result.measurements.as_ref().filter(|m| !m.is_empty()) {
        let mut counts = Counts::new();
        for shot in measurements {
            let bitstring = shot
                .iter()
                .map(|bit| match bit {
                    0 => Ok('0'),
                    1 => Ok('1'),
                    other => Err(BraketError::ResultParseError(format!(
                        "measurement value {other} is not a bit"
                    ))),
                })
                .collect::<BraketResult<String>>()?;
            counts.insert(bitstring, 1);
        }
        return Ok(counts);
    }

    if let Some(probs) = result
        .measurement_probabilities
        .as_ref()
        .filter(|p| !p.is_empty())
    {
        return scale_probabilities(probs, submitted_shots);
    }

    Err(BraketError::ResultParseError(
        "result has no measurementCounts, measurements or measurementProbabilities".into(),
    ))
}

/// Turn probabilities into counts that sum exactly to `shots`.
///
/// Floors every expected count and hands the remaining shots to the
/// largest fractional parts (ties by bitstring).
fn scale_probabilities(probs: &HashMap<String, f64>, shots: u32) -> BraketResult<Counts> {
    if shots == 0 {
        return Err(BraketError::ResultParseError(
            "cannot scale probabilities without a shot count".into(),
        ));
    }
    if probs.values().any(|p| !p.is_finite() || *p < 0.0) {
        return Err(BraketError::ResultParseError(
            "probabilities must be finite and non-negative".into(),
        ));
    }
    let total: f64 = probs.values().sum();
    if total <= 0.0 {
        return Err(BraketError::ResultParseError("probabilities sum to zero".into()));
    }

    let shots_f = f64::from(shots);
    let mut entries: Vec<(&String, u64, f64)> = probs
        .iter()
        .map(|(bitstring, p)| {
            let exact = p / total * shots_f;
            (bitstring, exact.floor() as u64, exact - exact.floor())
        })
        .collect();

    let assigned: u64 = entries.iter().map(|e| e.1).sum();
    let remainder = u64::from(shots).saturating_sub(assigned) as usize;
    entries.sort_by(|a, b| b.2.total_cmp(&a.2).then_with(|| a.0.cmp(b.0)));
    for entry in entries.iter_mut().take(remainder) {
        entry.1 += 1;
    }

    Ok(entries
        .into_iter()
        .filter(|(_, count, _)| *count > 0)
        .map(|(bitstring, count, _)| (bitstring.clone(), count))
        .collect())
}

/// Build capabilities from device info for unknown devices.
fn build_capabilities_from_info(info: &DeviceInfo) -> Capabilities {
    let is_simulator = info.device_type == DeviceType::Simulator;

    let num_qubits =
        extract_qubit_count(&info.capabilities_json).unwrap_or(if is_simulator { 34 } else { 20 });

    if is_simulator {
        return Capabilities::braket_simulator(&info.device_name, num_qubits);
    }
    match info.provider_name.to_lowercase().as_str() {
        "ionq" => Capabilities::braket_ionq(&info.device_name, num_qubits),
        "iqm" => Capabilities::braket_iqm(&info.device_name, num_qubits),
        _ => Capabilities::braket_rigetti(&info.device_name, num_qubits),
    }
}

/// Extract `paradigm.qubitCount` from Braket device capabilities JSON.
fn extract_qubit_count(capabilities_json: &str) -> Option<u32> {
    let val: serde_json::Value = serde_json::from_str(capabilities_json).ok()?;
    val.get("paradigm")
        .and_then(|p| p.get("qubitCount"))
        .and_then(serde_json::Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
}

#[async_trait]
impl Backend for BraketBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn availability(&self) -> HalResult<BackendAvailability> {
        match self.get_device_info().await {
            Ok(info) if info.status == DeviceStatus::Online => Ok(BackendAvailability::available(
                Some(format!("{} ({})", info.device_name, info.provider_name)),
            )),
            Ok(info) => Ok(BackendAvailability::unavailable(format!(
                "{} is {:?}",
                info.device_name, info.status
            ))),
            Err(e @ BraketError::AccessDenied(_)) => Err(e.into()),
            Err(e) => Ok(BackendAvailability::unavailable(format!(
                "failed to query device: {e}"
            ))),
        }
    }

    async fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult> {
        Ok(ValidationResult::against(&self.capabilities, circuit))
    }

    #[instrument(skip(self, circuit), fields(device = %self.device_arn))]
    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId> {
        self.check_request(circuit, shots)?;

        let qasm = emit_braket(circuit).map_err(|e| HalError::InvalidCircuit(e.to_string()))?;
        debug!("Submitting program:\n{}", qasm);

        let task_arn = self
            .client
            .create_task(&self.device_arn, &qasm, shots)
            .await
            .map_err(|e| match e {
                BraketError::AccessDenied(_) | BraketError::DeviceUnavailable(_) => e.into(),
                other => HalError::SubmissionFailed(other.to_string()),
            })?;

        {
            let mut jobs = self.jobs.lock().await;
            if jobs.len() >= MAX_CACHED_JOBS {
                jobs.retain(|_, j| !j.job.status.is_terminal());
            }
            let job = Job::new(task_arn.clone(), shots);
            jobs.insert(task_arn.clone(), CachedJob { job, result: None });
        }

        info!("Created Braket task {}", task_arn);
        Ok(JobId(task_arn))
    }

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        {
            let jobs = self.jobs.lock().await;
            if let Some(cached) = jobs.get(&job_id.0) {
                if cached.job.status.is_terminal() {
                    return Ok(cached.job.status.clone());
                }
            }
        }

        let status = job_status(self.client.get_task_status(&job_id.0).await?);

        let mut jobs = self.jobs.lock().await;
        if let Some(cached) = jobs.get_mut(&job_id.0) {
            cached.job.transition(status.clone());
        }
        Ok(status)
    }

    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let submitted_shots = {
            let jobs = self.jobs.lock().await;
            match jobs.get(&job_id.0) {
                Some(CachedJob {
                    result: Some(result),
                    ..
                }) => return Ok(result.clone()),
                Some(cached) => cached.job.shots,
                None => 0,
            }
        };

        match self.client.get_task_status(&job_id.0).await? {
            TaskStatus::Completed => {}
            TaskStatus::Failed(msg) => return Err(HalError::JobFailed(msg)),
            TaskStatus::Cancelled => return Err(HalError::JobCancelled),
            other => {
                return Err(HalError::Backend(format!(
                    "Task {} not yet completed ({other:?})",
                    job_id.0
                )));
            }
        }

        let task_result = self.client.get_task_result(&job_id.0).await?;
        let counts = parse_result(&task_result, submitted_shots)?;
        let total = u32::try_from(counts.total_shots()).unwrap_or(u32::MAX);
        if submitted_shots != 0 && total != submitted_shots {
            warn!(
                "Task {} returned {} shots, {} were requested",
                job_id.0, total, submitted_shots
            );
        }

        let result = ExecutionResult::new(counts, total).with_metadata(serde_json::json!({
            "backend": self.name,
            "device_arn": self.device_arn,
            "task_arn": job_id.0,
            "measured_qubits": task_result.measured_qubits,
        }));

        let mut jobs = self.jobs.lock().await;
        if let Some(cached) = jobs.get_mut(&job_id.0) {
            cached.job.transition(JobStatus::Completed);
            cached.result = Some(result.clone());
        }

        Ok(result)
    }

    async fn cancel(&self, job_id: &JobId) -> HalResult<()> {
        // Braket acknowledges with CANCELLING; the next status poll settles it.
        self.client.cancel_task(&job_id.0).await?;
        info!("Requested cancellation of task {}", job_id.0);
        Ok(())
    }
}
