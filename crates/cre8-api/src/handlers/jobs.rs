//! Job intake and cancellation handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use tracing::info;

use cre8_models::{JobId, JobRequest};
use cre8_worker::metrics;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

// ============================================================================
// Types
// ============================================================================

/// Acknowledgment returned by `POST /process`.
#[derive(Debug, Serialize)]
pub struct AcceptResponse {
    pub success: bool,
    pub message: String,
    pub job_id: JobId,
}

/// Body of `POST /cancel`.
#[derive(Debug, Default, Deserialize)]
pub struct CancelRequest {
    #[serde(default)]
    pub job_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub success: bool,
    pub message: String,
}

/// Holds a job's first stage back until the acknowledgment is released.
///
/// Attached to the response extensions; the server drops it once the
/// response head has been handed to the connection, which releases the
/// background task.
#[derive(Clone)]
struct AcceptanceGate(#[allow(dead_code)] Arc<oneshot::Sender<()>>);

// ============================================================================
// Handlers
// ============================================================================

/// POST /process
///
/// Validates the request, acknowledges it, and starts processing in the
/// background. Authorization is enforced by middleware before the body is
/// read.
///
/// Returns:
/// - 200: `{success, message, job_id}`; processing starts after the response
/// - 400: Missing/empty `job_id`, `webhook_url`, `webhook_secret`, or malformed body
/// - 401: Invalid authorization
/// - 413: Body larger than the configured limit
/// - 500: Acknowledgment could not be built; nothing was started
pub async fn process_job(
    State(state): State<AppState>,
    payload: Result<Json<JobRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(request) = payload.map_err(|e| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(state.config.max_body_size)
        } else {
            ApiError::bad_request(e.body_text())
        }
    })?;
    let job = request.into_job()?;

    let ack = AcceptResponse {
        success: true,
        message: "Job received and processing started".to_string(),
        job_id: job.id.clone(),
    };
    let body = serde_json::to_vec(&ack).map_err(|e| ApiError::internal(&state.config, e))?;
    let mut response = ([(CONTENT_TYPE, "application/json")], body).into_response();

    info!(
        job_id = %job.id,
        webhook = %job.webhook.url(),
        params = job.params.0.len(),
        "Job accepted"
    );
    metrics::record_job_accepted();

    let (gate, released) = oneshot::channel::<()>();
    state.runner.spawn(job, async move {
        // Resolves when the gate is dropped.
        let _ = released.await;
    });
    response
        .extensions_mut()
        .insert(AcceptanceGate(Arc::new(gate)));

    Ok(response)
}

/// POST /cancel
///
/// Acknowledgment only. No job registry exists, so a running job is not
/// interrupted and unknown IDs are acknowledged the same way.
pub async fn cancel_job(payload: Result<Json<CancelRequest>, JsonRejection>) -> Json<CancelResponse> {
    let request = payload.map(|Json(r)| r).unwrap_or_default();
    info!(
        job_id = request.job_id.as_deref().unwrap_or("<none>"),
        "Cancel request received"
    );

    Json(CancelResponse {
        success: true,
        message: "Cancel request acknowledged".to_string(),
    })
}
