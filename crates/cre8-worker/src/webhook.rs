//! Outbound webhook delivery.
//!
//! Delivery is at-most-once and best-effort: one POST per event, a bounded
//! timeout, no retry. Failures are logged, counted and dropped.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use tracing::debug;

use cre8_models::{JobStatusEvent, WebhookTarget};

use crate::error::NotifyError;
use crate::logging::JobLogger;
use crate::metrics;

/// Sink for job status events.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one event. Must never fail or panic from the caller's view.
    async fn notify(&self, target: &WebhookTarget, event: &JobStatusEvent);
}

/// HTTP webhook notifier.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    http: Client,
}

impl WebhookNotifier {
    /// Create a notifier whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, NotifyError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("cre8-worker/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http })
    }

    /// POST the event to the target, surfacing any failure.
    pub async fn deliver(
        &self,
        target: &WebhookTarget,
        event: &JobStatusEvent,
    ) -> Result<(), NotifyError> {
        let response = self
            .http
            .post(target.url().clone())
            .header(AUTHORIZATION, format!("Bearer {}", target.secret()))
            .json(event)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    NotifyError::Timeout(e.to_string())
                } else {
                    NotifyError::Request(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status));
        }

        Ok(())
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, target: &WebhookTarget, event: &JobStatusEvent) {
        match self.deliver(target, event).await {
            Ok(()) => {
                debug!(
                    job_id = %event.job_id,
                    status = %event.status,
                    "Webhook sent"
                );
                metrics::record_webhook_sent(event.status.as_str());
            }
            Err(e) => {
                JobLogger::new(&event.job_id, "webhook").log_warning(&format!(
                    "{} webhook to {} failed: {}",
                    event.status,
                    target.url(),
                    e
                ));
                metrics::record_webhook_failure(event.status.as_str(), e.kind());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cre8_models::JobId;
    use url::Url;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn target(server: &MockServer) -> WebhookTarget {
        let url = Url::parse(&format!("{}/hook", server.uri())).unwrap();
        WebhookTarget::new(url, "s3cr3t")
    }

    fn event() -> JobStatusEvent {
        JobStatusEvent::running(&JobId::from_string("abc"), 0.1, "Video processing started")
            .with_sequence(1)
    }

    #[tokio::test]
    async fn test_deliver_sends_bearer_and_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(header("authorization", "Bearer s3cr3t"))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(serde_json::json!({
                "job_id": "abc",
                "status": "running",
                "progress": 0.1,
                "sequence": 1
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = WebhookNotifier::new(Duration::from_secs(5)).unwrap();
        notifier.deliver(&target(&server), &event()).await.unwrap();
    }

    #[tokio::test]
    async fn test_deliver_reports_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let notifier = WebhookNotifier::new(Duration::from_secs(5)).unwrap();
        let err = notifier.deliver(&target(&server), &event()).await.unwrap_err();
        assert!(matches!(err, NotifyError::Status(s) if s.as_u16() == 503));
    }

    #[tokio::test]
    async fn test_deliver_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let notifier = WebhookNotifier::new(Duration::from_millis(100)).unwrap();
        let err = notifier.deliver(&target(&server), &event()).await.unwrap_err();
        assert!(matches!(err, NotifyError::Timeout(_)), "got {err}");
    }

    #[tokio::test]
    async fn test_notify_swallows_failures() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = WebhookNotifier::new(Duration::from_secs(5)).unwrap();
        // Returns normally even though the receiver failed.
        notifier.notify(&target(&server), &event()).await;
    }

    #[tokio::test]
    async fn test_notify_unreachable_endpoint() {
        let notifier = WebhookNotifier::new(Duration::from_secs(1)).unwrap();
        let unreachable = WebhookTarget::new(Url::parse("http://127.0.0.1:9/hook").unwrap(), "s3cr3t");

        assert!(notifier.deliver(&unreachable, &event()).await.is_err());
        notifier.notify(&unreachable, &event()).await;
    }
}
