//! Worker error types.

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

/// Faults raised while a job is executing.
///
/// These never reach an HTTP caller; the runner converts them into a
/// terminal `failed` event.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Stage '{stage}' failed: {reason}")]
    StageFailed { stage: String, reason: String },

    #[error("Processing failed: {0}")]
    ProcessingFailed(String),

    #[error("Invalid stage plan: {0}")]
    InvalidPlan(String),
}

impl WorkerError {
    pub fn stage_failed(stage: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::StageFailed {
            stage: stage.into(),
            reason: reason.into(),
        }
    }

    pub fn processing_failed(msg: impl Into<String>) -> Self {
        Self::ProcessingFailed(msg.into())
    }

    pub fn invalid_plan(msg: impl Into<String>) -> Self {
        Self::InvalidPlan(msg.into())
    }
}

/// Webhook delivery failures. Logged and counted, never propagated.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Webhook timed out: {0}")]
    Timeout(String),

    #[error("Webhook request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Webhook rejected with status {0}")]
    Status(reqwest::StatusCode),
}

impl NotifyError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            NotifyError::Timeout(_) => "timeout",
            NotifyError::Request(_) => "request",
            NotifyError::Status(_) => "status",
        }
    }
}
