//! Background job execution for the Cre8 video worker.
//!
//! This crate provides:
//! - The job runner that drives a job through its stages as a detached task
//! - The webhook notifier used to report every status transition
//! - A pipeline trait with a simulated implementation
//! - Structured job logging and job metrics

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod runner;
pub mod webhook;

pub use config::WorkerConfig;
pub use error::{NotifyError, WorkerError, WorkerResult};
pub use logging::JobLogger;
pub use pipeline::{PipelineOutput, SimulatedPipeline, Stage, StagePlan, VideoPipeline, STARTED_PROGRESS};
pub use runner::JobRunner;
pub use webhook::{Notifier, WebhookNotifier};
