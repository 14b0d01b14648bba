//! Job status events delivered to webhook receivers.
//!
//! A job produces one ordered stream of events, terminated by exactly one
//! `completed` or `failed` event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assets::{JobAssets, JobSummary};
use crate::job::JobId;

/// Job processing status as seen by the webhook receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Job is actively being processed
    Running,
    /// Outputs are being finalized and uploaded
    Exporting,
    /// Job completed successfully
    Completed,
    /// Job failed with an error
    Failed,
}

impl JobStatus {
    /// Get string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Running => "running",
            JobStatus::Exporting => "exporting",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    /// Check if this is a terminal state (no more events follow).
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payload POSTed to the webhook URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatusEvent {
    pub job_id: JobId,
    pub status: JobStatus,
    /// Fraction in [0.0, 1.0]; absent on `failed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assets: Option<JobAssets>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<JobSummary>,
    /// Per-job position in the event stream, starting at 1
    pub sequence: u32,
    pub timestamp: DateTime<Utc>,
}

impl JobStatusEvent {
    fn new(job_id: &JobId, status: JobStatus, progress: Option<f64>, message: impl Into<String>) -> Self {
        Self {
            job_id: job_id.clone(),
            status,
            progress: progress.map(|p| p.clamp(0.0, 1.0)),
            message: message.into(),
            assets: None,
            error: None,
            summary: None,
            sequence: 0,
            timestamp: Utc::now(),
        }
    }

    /// Non-terminal progress update.
    pub fn running(job_id: &JobId, progress: f64, message: impl Into<String>) -> Self {
        Self::new(job_id, JobStatus::Running, Some(progress), message)
    }

    /// Non-terminal event with an explicit status.
    pub fn stage(job_id: &JobId, status: JobStatus, progress: f64, message: impl Into<String>) -> Self {
        Self::new(job_id, status, Some(progress), message)
    }

    /// Terminal success carrying the produced assets.
    pub fn completed(job_id: &JobId, assets: JobAssets, summary: JobSummary) -> Self {
        let mut event = Self::new(
            job_id,
            JobStatus::Completed,
            Some(1.0),
            "Video processing completed successfully",
        );
        event.assets = Some(assets);
        event.summary = Some(summary);
        event
    }

    /// Terminal failure.
    pub fn failed(job_id: &JobId, error: impl Into<String>) -> Self {
        let mut event = Self::new(job_id, JobStatus::Failed, None, "Video processing failed");
        event.error = Some(error.into());
        event
    }

    pub fn with_sequence(mut self, sequence: u32) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
