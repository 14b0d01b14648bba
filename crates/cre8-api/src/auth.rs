//! Bearer-token authentication for intake endpoints.

use axum::body::Body;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::config::WorkerSecret;
use crate::error::ApiError;
use crate::state::AppState;

/// Validates `Authorization: Bearer <secret>` against the configured secret.
#[derive(Debug, Clone)]
pub struct Authenticator {
    secret: WorkerSecret,
}

impl Authenticator {
    pub fn new(secret: WorkerSecret) -> Self {
        Self { secret }
    }

    /// True iff the header is present, uses the bearer scheme, and the token
    /// equals the configured secret.
    pub fn is_authorized(&self, authorization: Option<&str>) -> bool {
        let Some(token) = authorization.and_then(|h| h.strip_prefix("Bearer ")) else {
            return false;
        };
        token.as_bytes().ct_eq(self.secret.as_bytes()).into()
    }

    pub fn check_headers(&self, headers: &HeaderMap) -> Result<(), ApiError> {
        let authorization = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
        if self.is_authorized(authorization) {
            Ok(())
        } else {
            Err(ApiError::Unauthorized)
        }
    }
}

/// Rejects unauthorized requests before the body is read.
pub async fn require_bearer(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if let Err(e) = state.auth.check_headers(request.headers()) {
        warn!(uri = %request.uri(), "Rejected request with invalid authorization");
        return e.into_response();
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> Authenticator {
        Authenticator::new(WorkerSecret::new("s3cr3t").unwrap())
    }

    #[test]
    fn test_valid_bearer() {
        assert!(auth().is_authorized(Some("Bearer s3cr3t")));
    }

    #[test]
    fn test_rejects_missing_or_wrong() {
        let auth = auth();
        assert!(!auth.is_authorized(None));
        assert!(!auth.is_authorized(Some("")));
        assert!(!auth.is_authorized(Some("Bearer ")));
        assert!(!auth.is_authorized(Some("Bearer wrong")));
        assert!(!auth.is_authorized(Some("Bearer s3cr3t ")));
        assert!(!auth.is_authorized(Some("Bearer s3cr3")));
        assert!(!auth.is_authorized(Some("Basic s3cr3t")));
        assert!(!auth.is_authorized(Some("bearer s3cr3t")));
        assert!(!auth.is_authorized(Some("s3cr3t")));
    }

    #[test]
    fn test_check_headers() {
        let mut headers = HeaderMap::new();
        assert!(matches!(auth().check_headers(&headers), Err(ApiError::Unauthorized)));

        headers.insert(AUTHORIZATION, "Bearer s3cr3t".parse().unwrap());
        assert!(auth().check_headers(&headers).is_ok());
    }
}
