//! Layered configuration.
//!
//! Values are resolved lowest to highest: built-in defaults, the YAML file
//! (`--config` or `~/.kickback/config.yaml`), `KICKBACK_*` environment
//! variables, then command-line flags.
//!
//! ```yaml
//! default_backend: sv1
//! shots: 500
//! wait:
//!   poll_interval_ms: 1000
//!   timeout_secs: 900
//! braket:
//!   s3_bucket: amazon-braket-results
//!   s3_prefix: kickback
//!   region: us-east-1
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use kickback_bv::DEFAULT_SHOTS;
use kickback_hal::{BackendConfig, WaitPolicy};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Backend used when neither the file nor the flags choose one.
pub const DEFAULT_BACKEND: &str = "simulator";

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Device identifier for `kickback run`.
    pub default_backend: String,
    /// Shots per run.
    pub shots: u32,
    /// Polling behaviour while a job runs.
    pub wait: WaitSettings,
    /// AWS Braket result storage.
    pub braket: BraketSettings,
}

/// How long and how often to poll a submitted job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WaitSettings {
    pub poll_interval_ms: u64,
    pub timeout_secs: u64,
}

/// Where Braket writes task results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BraketSettings {
    pub s3_bucket: Option<String>,
    pub s3_prefix: Option<String>,
    pub region: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_backend: DEFAULT_BACKEND.to_string(),
            shots: DEFAULT_SHOTS,
            wait: WaitSettings::default(),
            braket: BraketSettings::default(),
        }
    }
}

impl Default for WaitSettings {
    fn default() -> Self {
        let policy = WaitPolicy::default();
        Self {
            poll_interval_ms: policy.poll_interval.as_millis() as u64,
            timeout_secs: policy.timeout.as_secs(),
        }
    }
}

impl Config {
    /// Load the file layer and apply the process environment on top.
    ///
    /// An explicit `path` must exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        Self::from_yaml(&source).with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Parse YAML source. An empty document yields the defaults.
    pub fn from_yaml(source: &str) -> Result<Self> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml_ng::from_str(source)?)
    }

    /// Override values from environment variables looked up through `lookup`.
    ///
    /// Unparseable numbers are ignored with a debug log.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(backend) = non_empty("KICKBACK_BACKEND") {
            self.default_backend = backend;
        }
        if let Some(shots) = non_empty("KICKBACK_SHOTS") {
            match shots.parse() {
                Ok(shots) => self.shots = shots,
                Err(_) => debug!("Ignoring KICKBACK_SHOTS={}", shots),
            }
        }
        if let Some(ms) = non_empty("KICKBACK_POLL_INTERVAL_MS") {
            match ms.parse() {
                Ok(ms) => self.wait.poll_interval_ms = ms,
                Err(_) => debug!("Ignoring KICKBACK_POLL_INTERVAL_MS={}", ms),
            }
        }
        if let Some(secs) = non_empty("KICKBACK_TIMEOUT") {
            match secs.parse() {
                Ok(secs) => self.wait.timeout_secs = secs,
                Err(_) => debug!("Ignoring KICKBACK_TIMEOUT={}", secs),
            }
        }
        if let Some(bucket) = non_empty("KICKBACK_BRAKET_S3_BUCKET") {
            self.braket.s3_bucket = Some(bucket);
        }
        if let Some(prefix) = non_empty("KICKBACK_BRAKET_S3_PREFIX") {
            self.braket.s3_prefix = Some(prefix);
        }
        if let Some(region) = non_empty("AWS_REGION") {
            self.braket.region = Some(region);
        }
    }

    /// Reject settings no run could succeed with.
    pub fn validate(&self) -> Result<()> {
        if self.default_backend.trim().is_empty() {
            anyhow::bail!("default_backend must not be empty");
        }
        if self.wait.poll_interval_ms == 0 {
            anyhow::bail!("wait.poll_interval_ms must be positive");
        }
        if self.wait.timeout_secs == 0 {
            anyhow::bail!("wait.timeout_secs must be positive");
        }
        Ok(())
    }

    /// Wait policy, optionally with a different timeout.
    pub fn wait_policy(&self, timeout_secs: Option<u64>) -> WaitPolicy {
        WaitPolicy::new(
            Duration::from_millis(self.wait.poll_interval_ms),
            Duration::from_secs(timeout_secs.unwrap_or(self.wait.timeout_secs)),
        )
    }

    /// Backend configuration carrying the Braket storage settings.
    pub fn backend_config(&self, name: &str) -> BackendConfig {
        let mut config = BackendConfig::new(name);
        let settings = [
            ("s3_bucket", &self.braket.s3_bucket),
            ("s3_prefix", &self.braket.s3_prefix),
            ("region", &self.braket.region),
        ];
        for (key, value) in settings {
            if let Some(value) = value {
                config = config.with_extra(key, serde_json::Value::String(value.clone()));
            }
        }
        config
    }
}

/// `~/.kickback/config.yaml`, if a home directory exists.
pub fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".kickback").join("config.yaml"))
}
