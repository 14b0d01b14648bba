//! Application state.

use std::sync::Arc;

use cre8_worker::{JobRunner, NotifyError, SimulatedPipeline, WebhookNotifier, WorkerConfig};

use crate::auth::Authenticator;
use crate::config::ApiConfig;

/// Shared application state.
///
/// Everything here is read-only after startup; jobs share no mutable state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ApiConfig>,
    pub auth: Authenticator,
    pub runner: JobRunner,
}

impl AppState {
    /// State wired to the HTTP webhook notifier and the simulated pipeline.
    pub fn new(config: ApiConfig, worker: &WorkerConfig) -> Result<Self, NotifyError> {
        let notifier = WebhookNotifier::new(worker.webhook_timeout)?;
        let pipeline = SimulatedPipeline::new(worker);
        let runner = JobRunner::new(Arc::new(pipeline), Arc::new(notifier));
        Ok(Self::with_runner(config, runner))
    }

    /// State with a caller-supplied runner.
    pub fn with_runner(config: ApiConfig, runner: JobRunner) -> Self {
        Self {
            auth: Authenticator::new(config.worker_secret.clone()),
            config: Arc::new(config),
            runner,
        }
    }
}
