//! Job and webhook metrics.
//!
//! Emitted through the `metrics` facade; the API binary installs the
//! Prometheus recorder. Without a recorder these calls are no-ops.

use metrics::{counter, gauge};

/// Metric names as constants for consistency.
pub mod names {
    pub const JOBS_ACCEPTED_TOTAL: &str = "cre8_jobs_accepted_total";
    pub const JOBS_COMPLETED_TOTAL: &str = "cre8_jobs_completed_total";
    pub const JOBS_FAILED_TOTAL: &str = "cre8_jobs_failed_total";
    pub const JOBS_IN_FLIGHT: &str = "cre8_jobs_in_flight";

    pub const WEBHOOKS_SENT_TOTAL: &str = "cre8_webhooks_sent_total";
    pub const WEBHOOK_FAILURES_TOTAL: &str = "cre8_webhook_failures_total";
}

/// Record a job accepted at intake.
pub fn record_job_accepted() {
    counter!(names::JOBS_ACCEPTED_TOTAL).increment(1);
}

pub fn record_job_started() {
    gauge!(names::JOBS_IN_FLIGHT).increment(1.0);
}

pub fn record_job_completed() {
    gauge!(names::JOBS_IN_FLIGHT).decrement(1.0);
    counter!(names::JOBS_COMPLETED_TOTAL).increment(1);
}

pub fn record_job_failed() {
    gauge!(names::JOBS_IN_FLIGHT).decrement(1.0);
    counter!(names::JOBS_FAILED_TOTAL).increment(1);
}

/// Record a webhook delivered with a success response.
pub fn record_webhook_sent(status: &str) {
    let labels = [("status", status.to_string())];
    counter!(names::WEBHOOKS_SENT_TOTAL, &labels).increment(1);
}

/// Record a webhook delivery that failed and was dropped.
pub fn record_webhook_failure(status: &str, kind: &str) {
    let labels = [("status", status.to_string()), ("kind", kind.to_string())];
    counter!(names::WEBHOOK_FAILURES_TOTAL, &labels).increment(1);
}
