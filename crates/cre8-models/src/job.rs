//! Job request definitions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;
use url::Url;
use validator::{Validate, ValidationErrors};

/// Aspect ratio reported when the request does not carry `transform.layout.aspect`.
pub const DEFAULT_ASPECT: &str = "9:16";

/// Caller-assigned job identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque processing parameters passed through to the pipeline.
///
/// Everything in the request body other than the three required fields
/// lands here untouched (e.g. `transform.layout.aspect`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobParams(pub Map<String, Value>);

impl JobParams {
    /// Look up a nested value by key path.
    pub fn pointer(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        rest.iter()
            .try_fold(self.0.get(*first)?, |value, key| value.get(key))
    }

    /// Requested output aspect ratio, if the caller supplied one.
    pub fn aspect(&self) -> Option<&str> {
        self.pointer(&["transform", "layout", "aspect"])
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Output aspect ratio, falling back to [`DEFAULT_ASPECT`].
    pub fn aspect_or_default(&self) -> &str {
        self.aspect().unwrap_or(DEFAULT_ASPECT)
    }
}

/// Errors raised while turning a [`JobRequest`] into a [`Job`].
#[derive(Debug, Error)]
pub enum JobRequestError {
    #[error("Missing required fields: {0}")]
    MissingFields(String),

    #[error("Invalid webhook_url: {0}")]
    InvalidWebhookUrl(String),
}

impl From<ValidationErrors> for JobRequestError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|k| k.to_string())
            .collect();
        fields.sort_unstable();
        Self::MissingFields(fields.join(", "))
    }
}

/// Raw body of `POST /process`.
///
/// Required fields default to empty so that a missing field and an empty
/// one are rejected the same way by [`JobRequest::into_job`].
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct JobRequest {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub job_id: String,

    #[serde(default)]
    #[validate(length(min = 1))]
    pub webhook_url: String,

    #[serde(default)]
    #[validate(length(min = 1))]
    pub webhook_secret: String,

    #[serde(flatten)]
    pub params: JobParams,
}

impl JobRequest {
    /// Validate required fields and split the request into a [`Job`].
    pub fn into_job(self) -> Result<Job, JobRequestError> {
        self.validate()?;

        let url = Url::parse(&self.webhook_url)
            .map_err(|e| JobRequestError::InvalidWebhookUrl(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(JobRequestError::InvalidWebhookUrl(format!(
                    "unsupported scheme '{}'",
                    scheme
                )))
            }
        }

        Ok(Job {
            id: JobId(self.job_id),
            params: self.params,
            webhook: WebhookTarget::new(url, self.webhook_secret),
        })
    }
}

/// Where and how status events for a job are delivered.
#[derive(Clone)]
pub struct WebhookTarget {
    url: Url,
    secret: String,
}

impl WebhookTarget {
    pub fn new(url: Url, secret: impl Into<String>) -> Self {
        Self {
            url,
            secret: secret.into(),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Bearer credential sent with every callback.
    pub fn secret(&self) -> &str {
        &self.secret
    }
}

// The secret never reaches logs.
impl fmt::Debug for WebhookTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookTarget")
            .field("url", &self.url.as_str())
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// A validated job, owned by its background runner until it terminates.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub params: JobParams,
    pub webhook: WebhookTarget,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(body: Value) -> JobRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_into_job_splits_params() {
        let job = request(json!({
            "job_id": "abc",
            "webhook_url": "https://cb.example/hook",
            "webhook_secret": "s3cr3t",
            "transform": { "layout": { "aspect": "16:9" } },
            "source_url": "https://videos.example/in.mp4"
        }))
        .into_job()
        .unwrap();

        assert_eq!(job.id.as_str(), "abc");
        assert_eq!(job.webhook.url().as_str(), "https://cb.example/hook");
        assert_eq!(job.webhook.secret(), "s3cr3t");
        assert_eq!(job.params.aspect(), Some("16:9"));
        assert!(job.params.0.contains_key("source_url"));
        assert!(!job.params.0.contains_key("job_id"));
        assert!(!job.params.0.contains_key("webhook_secret"));
    }

    #[test]
    fn test_non_string_job_id_rejected() {
        let body = json!({
            "job_id": 123,
            "webhook_url": "https://cb.example/hook",
            "webhook_secret": "s3cr3t"
        });
        assert!(serde_json::from_value::<JobRequest>(body).is_err());
    }

    #[test]
    fn test_missing_fields_rejected() {
        let err = request(json!({ "webhook_url": "https://cb.example/hook" }))
            .into_job()
            .unwrap_err();

        match err {
            JobRequestError::MissingFields(fields) => {
                assert_eq!(fields, "job_id, webhook_secret");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_fields_rejected() {
        for field in ["job_id", "webhook_url", "webhook_secret"] {
            let mut body = json!({
                "job_id": "abc",
                "webhook_url": "https://cb.example/hook",
                "webhook_secret": "s3cr3t"
            });
            body[field] = json!("");
            assert!(
                matches!(request(body).into_job(), Err(JobRequestError::MissingFields(_))),
                "empty {field} should be rejected"
            );
        }
    }

    #[test]
    fn test_webhook_url_must_be_http() {
        let err = request(json!({
            "job_id": "abc",
            "webhook_url": "ftp://cb.example/hook",
            "webhook_secret": "s3cr3t"
        }))
        .into_job()
        .unwrap_err();
        assert!(matches!(err, JobRequestError::InvalidWebhookUrl(_)));

        let err = request(json!({
            "job_id": "abc",
            "webhook_url": "not a url",
            "webhook_secret": "s3cr3t"
        }))
        .into_job()
        .unwrap_err();
        assert!(matches!(err, JobRequestError::InvalidWebhookUrl(_)));
    }

    #[test]
    fn test_aspect_defaults() {
        assert_eq!(JobParams::default().aspect_or_default(), DEFAULT_ASPECT);

        let params: JobParams =
            serde_json::from_value(json!({ "transform": { "layout": {} } })).unwrap();
        assert_eq!(params.aspect(), None);
        assert_eq!(params.aspect_or_default(), "9:16");

        let params: JobParams =
            serde_json::from_value(json!({ "transform": { "layout": { "aspect": 1 } } })).unwrap();
        assert_eq!(params.aspect_or_default(), "9:16");
    }

    #[test]
    fn test_webhook_target_debug_redacts_secret() {
        let target = WebhookTarget::new(Url::parse("https://cb.example/hook").unwrap(), "s3cr3t");
        let rendered = format!("{:?}", target);
        assert!(rendered.contains("cb.example"));
        assert!(!rendered.contains("s3cr3t"));
    }
}
