//! Polling behaviour of the provided `wait`/`wait_with` methods.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use kickback_hal::{
    Backend, BackendAvailability, Capabilities, Counts, ExecutionResult, HalError, HalResult,
    JobId, JobStatus, ValidationResult, WaitPolicy,
};
use kickback_ir::Circuit;

/// Backend that replays a fixed sequence of statuses, repeating the last one.
struct ScriptedBackend {
    capabilities: Capabilities,
    script: Mutex<Vec<JobStatus>>,
    polls: AtomicUsize,
}

impl ScriptedBackend {
    fn new(script: Vec<JobStatus>) -> Self {
        Self {
            capabilities: Capabilities::simulator(4),
            script: Mutex::new(script),
            polls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Backend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn availability(&self) -> HalResult<BackendAvailability> {
        Ok(BackendAvailability::always_available())
    }

    async fn validate(&self, _circuit: &Circuit) -> HalResult<ValidationResult> {
        Ok(ValidationResult::Valid)
    }

    async fn submit(&self, _circuit: &Circuit, _shots: u32) -> HalResult<JobId> {
        Ok(JobId::new("job-1"))
    }

    async fn status(&self, _job_id: &JobId) -> HalResult<JobStatus> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        let mut script = self.script.lock().unwrap();
        if script.len() > 1 {
            Ok(script.remove(0))
        } else {
            Ok(script[0].clone())
        }
    }

    async fn result(&self, _job_id: &JobId) -> HalResult<ExecutionResult> {
        Ok(ExecutionResult::new(Counts::from_pairs([("01", 10)]), 10))
    }

    async fn cancel(&self, _job_id: &JobId) -> HalResult<()> {
        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn test_wait_returns_result_after_pending_polls() {
    let backend = ScriptedBackend::new(vec![
        JobStatus::Queued,
        JobStatus::Running,
        JobStatus::Completed,
    ]);

    let result = backend.wait(&JobId::new("job-1")).await.unwrap();
    assert_eq!(result.counts.get("01"), 10);
    assert_eq!(backend.polls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn test_wait_surfaces_failure() {
    let backend = ScriptedBackend::new(vec![
        JobStatus::Running,
        JobStatus::Failed("device calibration".into()),
    ]);

    let err = backend.wait(&JobId::new("job-1")).await.unwrap_err();
    assert!(matches!(err, HalError::JobFailed(ref msg) if msg == "device calibration"));
}

#[tokio::test(start_paused = true)]
async fn test_wait_surfaces_cancellation() {
    let backend = ScriptedBackend::new(vec![JobStatus::Cancelled]);
    let err = backend.wait(&JobId::new("job-1")).await.unwrap_err();
    assert!(matches!(err, HalError::JobCancelled));
}

#[tokio::test(start_paused = true)]
async fn test_wait_with_times_out() {
    let backend = ScriptedBackend::new(vec![JobStatus::Queued]);
    let policy = WaitPolicy::new(Duration::from_millis(100), Duration::from_secs(1));

    let err = backend
        .wait_with(&JobId::new("job-1"), &policy)
        .await
        .unwrap_err();

    assert!(matches!(err, HalError::Timeout(ref id) if id == "job-1"));
    // One poll at t=0, then one per interval up to and including the deadline.
    assert_eq!(backend.polls.load(Ordering::SeqCst), 11);
}
