//! AWS Braket API client wrapper.
//!
//! Wraps the AWS SDK for Braket and S3: device lookup, quantum task
//! management and result retrieval from the task's S3 output location.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use aws_sdk_braket::error::DisplayErrorContext;
use serde::Deserialize;
use tracing::debug;

use crate::error::{BraketError, BraketResult, classify_api_error};

/// Where Braket writes task results, and which region to call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BraketConfig {
    /// S3 bucket for task results.
    pub s3_bucket: String,
    /// S3 key prefix for task results.
    pub s3_prefix: String,
    /// AWS region.
    pub region: String,
}

impl BraketConfig {
    /// Default S3 key prefix.
    pub const DEFAULT_PREFIX: &'static str = "kickback-results";
    /// Default AWS region.
    pub const DEFAULT_REGION: &'static str = "us-east-1";

    /// Create a configuration with the default prefix and region.
    pub fn new(s3_bucket: impl Into<String>) -> Self {
        Self {
            s3_bucket: s3_bucket.into(),
            s3_prefix: Self::DEFAULT_PREFIX.to_string(),
            region: Self::DEFAULT_REGION.to_string(),
        }
    }

    /// Set the S3 key prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.s3_prefix = prefix.into();
        self
    }

    /// Set the AWS region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Read the configuration from the environment:
    ///
    /// - `KICKBACK_BRAKET_S3_BUCKET` (required)
    /// - `KICKBACK_BRAKET_S3_PREFIX` (default `"kickback-results"`)
    /// - `AWS_REGION` (default `"us-east-1"`)
    pub fn from_env() -> BraketResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup using the environment variable names.
    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> BraketResult<Self> {
        let bucket = lookup("KICKBACK_BRAKET_S3_BUCKET")
            .filter(|b| !b.is_empty())
            .ok_or(BraketError::MissingS3Bucket)?;
        let mut config = Self::new(bucket);
        if let Some(prefix) = lookup("KICKBACK_BRAKET_S3_PREFIX") {
            config.s3_prefix = prefix;
        }
        if let Some(region) = lookup("AWS_REGION") {
            config.region = region;
        }
        Ok(config)
    }
}

/// AWS Braket API client.
pub struct BraketClient {
    /// Braket SDK client.
    braket: aws_sdk_braket::Client,
    /// S3 SDK client for result retrieval.
    s3: aws_sdk_s3::Client,
    /// Result location and region.
    config: BraketConfig,
}

impl fmt::Debug for BraketClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BraketClient")
            .field("s3_bucket", &self.config.s3_bucket)
            .field("s3_prefix", &self.config.s3_prefix)
            .field("region", &self.config.region)
            .field("credentials", &"[REDACTED]")
            .finish()
    }
}

impl BraketClient {
    /// Create a new Braket client.
    ///
    /// Loads AWS credentials from the default chain (environment, SSO,
    /// config files, IAM role).
    pub async fn new(config: BraketConfig) -> BraketResult<Self> {
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()))
            .timeout_config(
                aws_config::timeout::TimeoutConfig::builder()
                    .operation_timeout(Duration::from_secs(60))
                    .connect_timeout(Duration::from_secs(10))
                    .build(),
            )
            .load()
            .await;

        let braket = aws_sdk_braket::Client::new(&sdk_config);
        let s3 = aws_sdk_s3::Client::new(&sdk_config);

        Ok(Self { braket, s3, config })
    }

    /// Get device information.
    pub async fn get_device(&self, device_arn: &str) -> BraketResult<DeviceInfo> {
        let resp = self
            .braket
            .get_device()
            .device_arn(device_arn)
            .send()
            .await
            .map_err(|e| classify_api_error(DisplayErrorContext(&e).to_string()))?;

        let device_type = match resp.device_type() {
            aws_sdk_braket::types::DeviceType::Qpu => DeviceType::Qpu,
            _ => DeviceType::Simulator,
        };

        let status = match resp.device_status() {
            aws_sdk_braket::types::DeviceStatus::Online => DeviceStatus::Online,
            aws_sdk_braket::types::DeviceStatus::Retired => DeviceStatus::Retired,
            _ => DeviceStatus::Offline,
        };

        Ok(DeviceInfo {
            device_arn: device_arn.to_string(),
            device_name: resp.device_name().to_string(),
            device_type,
            status,
            provider_name: resp.provider_name().to_string(),
            capabilities_json: resp.device_capabilities().to_string(),
        })
    }

    /// Create a quantum task from an OpenQASM program.
    pub async fn create_task(
        &self,
        device_arn: &str,
        qasm: &str,
        shots: u32,
    ) -> BraketResult<String> {
        let action = serde_json::json!({
            "braketSchemaHeader": {
                "name": "braket.ir.openqasm.program",
                "version": "1"
            },
            "source": qasm
        });

        let resp = self
            .braket
            .create_quantum_task()
            .device_arn(device_arn)
            .action(action.to_string())
            .shots(i64::from(shots))
            .output_s3_bucket(&self.config.s3_bucket)
            .output_s3_key_prefix(&self.config.s3_prefix)
            .send()
            .await
            .map_err(|e| classify_api_error(DisplayErrorContext(&e).to_string()))?;

        debug!("Created Braket task {}", resp.quantum_task_arn());
        Ok(resp.quantum_task_arn().to_string())
    }

    /// Get quantum task status.
    pub async fn get_task_status(&self, task_arn: &str) -> BraketResult<TaskStatus> {
        let resp = self
            .braket
            .get_quantum_task()
            .quantum_task_arn(task_arn)
            .send()
            .await
            .map_err(|e| match classify_api_error(DisplayErrorContext(&e).to_string()) {
                BraketError::TaskNotFound(_) => BraketError::TaskNotFound(task_arn.to_string()),
                other => other,
            })?;

        use aws_sdk_braket::types::QuantumTaskStatus;
        let status = match resp.status() {
            QuantumTaskStatus::Created => TaskStatus::Created,
            QuantumTaskStatus::Queued => TaskStatus::Queued,
            QuantumTaskStatus::Running => TaskStatus::Running,
            QuantumTaskStatus::Completed => TaskStatus::Completed,
            QuantumTaskStatus::Failed => TaskStatus::Failed(
                resp.failure_reason()
                    .unwrap_or("Unknown failure")
                    .to_string(),
            ),
            QuantumTaskStatus::Cancelling => TaskStatus::Cancelling,
            QuantumTaskStatus::Cancelled => TaskStatus::Cancelled,
            other => TaskStatus::Failed(format!("Unknown task status {}", other.as_str())),
        };

        Ok(status)
    }

    /// Cancel a quantum task.
    pub async fn cancel_task(&self, task_arn: &str) -> BraketResult<()> {
        self.braket
            .cancel_quantum_task()
            .quantum_task_arn(task_arn)
            .send()
            .await
            .map_err(|e| classify_api_error(DisplayErrorContext(&e).to_string()))?;

        Ok(())
    }

    /// Get task result from S3.
    ///
    /// Braket stores results as JSON under `{prefix}/{task_id}/results.json`.
    pub async fn get_task_result(&self, task_arn: &str) -> BraketResult<TaskResult> {
        let key = result_key(&self.config.s3_prefix, task_id_from_arn(task_arn)?);
        debug!("Fetching s3://{}/{}", self.config.s3_bucket, key);

        let resp = self
            .s3
            .get_object()
            .bucket(&self.config.s3_bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| {
                BraketError::S3Error(aws_sdk_s3::error::DisplayErrorContext(&e).to_string())
            })?;

        let body = resp
            .body
            .collect()
            .await
            .map_err(|e| BraketError::S3Error(e.to_string()))?;

        Ok(serde_json::from_slice(&body.into_bytes())?)
    }
}

/// Extract the task id from `arn:aws:braket:<region>:<account>:quantum-task/<id>`.
pub(crate) fn task_id_from_arn(task_arn: &str) -> BraketResult<&str> {
    task_arn
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty() && *id != task_arn)
        .ok_or_else(|| BraketError::InvalidParameter(format!("not a task ARN: {task_arn}")))
}

fn result_key(prefix: &str, task_id: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        format!("{task_id}/results.json")
    } else {
        format!("{prefix}/{task_id}/results.json")
    }
}

/// Device type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceType {
    /// Quantum processing unit (real hardware).
    Qpu,
    /// Simulator.
    Simulator,
}

/// Device status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceStatus {
    /// Device is online and accepting tasks.
    Online,
    /// Device is offline.
    Offline,
    /// Device is retired.
    Retired,
}

/// Device information from Braket.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    /// Device ARN.
    pub device_arn: String,
    /// Device name.
    pub device_name: String,
    /// Device type (QPU or simulator).
    pub device_type: DeviceType,
    /// Device status.
    pub status: DeviceStatus,
    /// Provider name (e.g., "Rigetti", "IonQ").
    pub provider_name: String,
    /// Raw capabilities JSON from the API.
    pub capabilities_json: String,
}

/// Quantum task status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    /// Task has been created.
    Created,
    /// Task is queued.
    Queued,
    /// Task is running.
    Running,
    /// Task completed successfully.
    Completed,
    /// Task failed with reason.
    Failed(String),
    /// Task is being cancelled.
    Cancelling,
    /// Task was cancelled.
    Cancelled,
}

/// Task result document written to S3.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResult {
    /// Measurement counts (bitstring -> count).
    #[serde(default)]
    pub measurement_counts: Option<HashMap<String, u64>>,
    /// Measurement probabilities (bitstring -> probability).
    #[serde(default)]
    pub measurement_probabilities: Option<HashMap<String, f64>>,
    /// Raw per-shot measurements.
    #[serde(default)]
    pub measurements: Option<Vec<Vec<u8>>>,
    /// Qubits in bitstring order.
    #[serde(default)]
    pub measured_qubits: Option<Vec<u32>>,
    /// Result metadata.
    #[serde(default)]
    pub task_metadata: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_lookup() {
        let env: HashMap<&str, &str> = [
            ("KICKBACK_BRAKET_S3_BUCKET", "amazon-braket-results"),
            ("AWS_REGION", "eu-north-1"),
        ]
        .into_iter()
        .collect();

        let config = BraketConfig::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.s3_bucket, "amazon-braket-results");
        assert_eq!(config.s3_prefix, BraketConfig::DEFAULT_PREFIX);
        assert_eq!(config.region, "eu-north-1");
    }

    #[test]
    fn test_config_requires_bucket() {
        let err = BraketConfig::from_lookup(|_| None).unwrap_err();
        assert!(matches!(err, BraketError::MissingS3Bucket));

        let empty = BraketConfig::from_lookup(|k| {
            (k == "KICKBACK_BRAKET_S3_BUCKET").then(String::new)
        });
        assert!(matches!(empty, Err(BraketError::MissingS3Bucket)));
    }

    #[test]
    fn test_task_id_from_arn() {
        let arn = "arn:aws:braket:us-east-1:123456789012:quantum-task/5f7c-42";
        assert_eq!(task_id_from_arn(arn).unwrap(), "5f7c-42");
        assert!(task_id_from_arn("no-slashes").is_err());
        assert!(task_id_from_arn("arn:aws:braket:::quantum-task/").is_err());
    }

    #[test]
    fn test_result_key() {
        assert_eq!(result_key("runs", "abc"), "runs/abc/results.json");
        assert_eq!(result_key("runs/", "abc"), "runs/abc/results.json");
        assert_eq!(result_key("", "abc"), "abc/results.json");
    }

    #[test]
    fn test_task_result_deserialize_counts() {
        let json = r#"{
            "measurementCounts": {"00": 500, "11": 500},
            "measuredQubits": [0, 1]
        }"#;
        let result: TaskResult = serde_json::from_str(json).unwrap();
        let counts = result.measurement_counts.unwrap();
        assert_eq!(counts.get("00"), Some(&500));
        assert_eq!(counts.get("11"), Some(&500));
        assert_eq!(result.measured_qubits, Some(vec![0, 1]));
    }

    #[test]
    fn test_task_result_deserialize_measurements() {
        let json = r#"{
            "measurements": [[0, 0], [1, 1], [0, 0], [1, 1]],
            "measuredQubits": [0, 1],
            "taskMetadata": {"id": "t-1", "shots": 4}
        }"#;
        let result: TaskResult = serde_json::from_str(json).unwrap();
        let measurements = result.measurements.unwrap();
        assert_eq!(measurements.len(), 4);
        assert_eq!(measurements[1], vec![1, 1]);
        assert_eq!(result.task_metadata.unwrap()["shots"], 4);
    }
}
