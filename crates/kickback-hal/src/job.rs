//! Job identifiers and the job state machine.
//!
//! ```text
//!   Queued ──→ Running ──→ Completed
//!     │          ├──────→ Failed(reason)
//!     └──────────┴──────→ Cancelled
//! ```
//!
//! Once a job reaches a terminal state it stays there.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Backend-assigned job identifier (a UUID locally, a task ARN on Braket).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for JobId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Where a job is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    /// Carries the backend's failure reason.
    Failed(String),
    Cancelled,
}

impl JobStatus {
    /// `Completed`, `Failed` or `Cancelled`.
    pub fn is_terminal(&self) -> bool {
        !self.is_pending()
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Queued | Self::Running)
    }

    pub fn is_success(&self) -> bool {
        *self == Self::Completed
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queued => f.write_str("queued"),
            Self::Running => f.write_str("running"),
            Self::Completed => f.write_str("completed"),
            Self::Failed(reason) => write!(f, "failed ({reason})"),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// Entry in a backend's job table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    /// Shots requested at submission.
    pub shots: u32,
    pub submitted_at: DateTime<Utc>,
    /// Set when the job reaches a terminal state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl Job {
    /// A freshly submitted, queued job.
    pub fn new(id: impl Into<JobId>, shots: u32) -> Self {
        Self {
            id: id.into(),
            status: JobStatus::Queued,
            shots,
            submitted_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Move to `status`. Ignored once the job is terminal.
    pub fn transition(&mut self, status: JobStatus) {
        if self.status.is_terminal() {
            return;
        }
        if status.is_terminal() {
            self.finished_at = Some(Utc::now());
        }
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classes() {
        assert!(JobStatus::Queued.is_pending());
        assert!(JobStatus::Running.is_pending());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed("boom".into()).is_terminal());
        assert!(JobStatus::Cancelled.is_terminal());
        assert!(JobStatus::Completed.is_success());
        assert!(!JobStatus::Cancelled.is_success());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(JobStatus::Running.to_string(), "running");
        assert_eq!(
            JobStatus::Failed("calibration".into()).to_string(),
            "failed (calibration)"
        );
    }

    #[test]
    fn test_terminal_state_is_sticky() {
        let mut job = Job::new(JobId::new("job-1"), 10);
        assert_eq!(job.status, JobStatus::Queued);
        assert!(job.finished_at.is_none());

        job.transition(JobStatus::Running);
        assert!(job.finished_at.is_none());

        job.transition(JobStatus::Completed);
        let finished = job.finished_at;
        assert!(finished.is_some());

        job.transition(JobStatus::Cancelled);
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.finished_at, finished);
    }
}
