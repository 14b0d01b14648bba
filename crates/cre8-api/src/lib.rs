//! Axum HTTP intake server for the Cre8 video worker.
//!
//! This crate provides:
//! - `POST /process`: bearer-authenticated job intake with immediate acknowledgment
//! - `POST /cancel`: acknowledgment-only cancellation
//! - Liveness endpoints and Prometheus metrics

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use auth::Authenticator;
pub use config::{ApiConfig, ConfigError, WorkerSecret};
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
