//! Shared data models for the Cre8 video worker.
//!
//! This crate provides Serde-serializable types for:
//! - Inbound job requests and their pass-through processing parameters
//! - Webhook targets (callback URL + secret)
//! - Job status events delivered to webhooks
//! - Result assets and processing summaries

pub mod assets;
pub mod job;
pub mod job_status;

// Re-export common types
pub use assets::{ClipAsset, JobAssets, JobSummary};
pub use job::{Job, JobId, JobParams, JobRequest, JobRequestError, WebhookTarget, DEFAULT_ASPECT};
pub use job_status::{JobStatus, JobStatusEvent};
