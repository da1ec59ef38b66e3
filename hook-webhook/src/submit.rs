//! Bounded retry around posting the outcome.
//!
//! Each attempt ends one of three ways:
//! - the send fails before any response: log, sleep `retry_delay`, go on
//! - a 2xx response: done
//! - any other response: log and go straight to the next attempt, no sleep
//!
//! The run only fails once every attempt is used.
use crate::types::Submission;
use async_trait::async_trait;
use hook_common::{HookError, Result};
use hook_config::{DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY_MS, SubmissionConfig};
use hook_http::{HttpError, StatusCode};
use std::time::Duration;
use tokio::time::sleep;

/// Destination for a finished [`Submission`].
///
/// `Ok` carries the status of a completed response, whatever it was; `Err`
/// means the send itself failed.
#[async_trait]
pub trait ResultSink: Send + Sync {
    async fn deliver(&self, submission: &Submission) -> std::result::Result<StatusCode, HttpError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitPolicy {
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

impl Default for SubmitPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        }
    }
}

impl From<&SubmissionConfig> for SubmitPolicy {
    fn from(cfg: &SubmissionConfig) -> Self {
        Self {
            max_attempts: cfg.max_attempts,
            retry_delay: cfg.retry_delay(),
        }
    }
}

/// Deliver `submission` through `sink`, returning the 1-based attempt that
/// got a 2xx response.
pub async fn submit_with_retry<S>(
    sink: &S,
    submission: &Submission,
    policy: &SubmitPolicy,
) -> Result<u32>
where
    S: ResultSink + ?Sized,
{
    for attempt in 1..=policy.max_attempts {
        match sink.deliver(submission).await {
            Ok(status) if status.is_success() => {
                tracing::info!(attempt, %status, "submit.succeeded");
                return Ok(attempt);
            }
            // TODO: decide whether rejected responses should also back off;
            // today they fall through to the next attempt immediately.
            Ok(status) => {
                tracing::warn!(attempt, max_attempts = policy.max_attempts, %status, "submit.rejected");
            }
            Err(err) => {
                tracing::warn!(
                    attempt,
                    max_attempts = policy.max_attempts,
                    transport = err.is_transport(),
                    error = %err,
                    "submit.attempt_failed"
                );
                if attempt < policy.max_attempts {
                    sleep(policy.retry_delay).await;
                }
            }
        }
    }

    tracing::error!(attempts = policy.max_attempts, "submit.exhausted");
    Err(HookError::Submission {
        attempts: policy.max_attempts,
    })
}
