//! Worker configuration.

use std::time::Duration;

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Timeout for a single webhook delivery
    pub webhook_timeout: Duration,
    /// Pause before each `running` stage is reported
    pub stage_delay: Duration,
    /// Pause before the `exporting` stage is reported
    pub export_delay: Duration,
    /// Pause before the `completed` event is reported
    pub finalize_delay: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            webhook_timeout: Duration::from_secs(10),
            stage_delay: Duration::from_millis(2000),
            export_delay: Duration::from_millis(3000),
            finalize_delay: Duration::from_millis(2000),
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            webhook_timeout: Duration::from_secs(
                std::env::var("WEBHOOK_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.webhook_timeout.as_secs()),
            ),
            stage_delay: env_millis("WORKER_STAGE_DELAY_MS").unwrap_or(defaults.stage_delay),
            export_delay: env_millis("WORKER_EXPORT_DELAY_MS").unwrap_or(defaults.export_delay),
            finalize_delay: env_millis("WORKER_FINALIZE_DELAY_MS")
                .unwrap_or(defaults.finalize_delay),
        }
    }

    /// Config with every simulated delay removed. Useful for tests and demos.
    pub fn instant() -> Self {
        Self {
            stage_delay: Duration::ZERO,
            export_delay: Duration::ZERO,
            finalize_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

fn env_millis(key: &str) -> Option<Duration> {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .map(Duration::from_millis)
}
