//! API configuration.

use std::fmt;

use thiserror::Error;

/// Errors raised while loading [`ApiConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("WORKER_SECRET is not set; refusing to start with an unsatisfiable authorizer")]
    MissingWorkerSecret,

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Shared secret expected in `Authorization: Bearer <secret>` on intake.
///
/// Guaranteed non-empty. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct WorkerSecret(String);

impl WorkerSecret {
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err(ConfigError::MissingWorkerSecret);
        }
        Ok(Self(secret))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for WorkerSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WorkerSecret(<redacted>)")
    }
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Inbound bearer secret
    pub worker_secret: WorkerSecret,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Max request body size
    pub max_body_size: usize,
    /// Environment (development/production)
    pub environment: String,
    /// Expose Prometheus metrics at /metrics
    pub metrics_enabled: bool,
}

impl ApiConfig {
    /// Config with defaults for everything but the secret.
    pub fn new(worker_secret: WorkerSecret) -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            worker_secret,
            cors_origins: vec!["*".to_string()],
            max_body_size: 10 * 1024 * 1024, // 10MB
            environment: "development".to_string(),
            metrics_enabled: true,
        }
    }

    /// Create config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = std::env::var("WORKER_SECRET").map_err(|_| ConfigError::MissingWorkerSecret)?;
        let defaults = Self::new(WorkerSecret::new(secret)?);

        let port = match std::env::var("PORT") {
            Ok(value) => value.parse().map_err(|_| ConfigError::Invalid { key: "PORT", value })?,
            Err(_) => defaults.port,
        };

        Ok(Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port,
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(defaults.cors_origins),
            max_body_size: std::env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_body_size),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            metrics_enabled: std::env::var("METRICS_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.metrics_enabled),
            worker_secret: defaults.worker_secret,
        })
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}
