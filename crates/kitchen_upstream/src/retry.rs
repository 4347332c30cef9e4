//! Backoff retry client.

use crate::{Transport, UpstreamRequest, UpstreamResponse};
use kitchen_error::{StatusClass, UpstreamError, UpstreamErrorKind, UpstreamResult, classify};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio_retry2::strategy::ExponentialFactorBackoff;
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, instrument, warn};

const BODY_PREVIEW_CHARS: usize = 500;

/// Wraps a [`Transport`] with bounded exponential backoff.
///
/// | Attempt outcome            | Treatment                                  |
/// |----------------------------|--------------------------------------------|
/// | 2xx                        | parse JSON, return `Ok(Some(body))`        |
/// | 429 / 5xx                  | sleep, double delay, retry; `Ok(None)` when out of attempts |
/// | other status (400, 403...) | stop immediately, `Ok(None)`               |
/// | network error or timeout   | sleep, retry; `Err` if it was the last attempt |
///
/// A 2xx whose body is not JSON is an `Err` without retry.
#[derive(Debug, Clone)]
pub struct RetryClient {
    transport: Arc<dyn Transport>,
    base_delay: Duration,
    max_delay: Duration,
}

impl RetryClient {
    /// Create a client over `transport` with the given backoff bounds.
    pub fn new(transport: Arc<dyn Transport>, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            transport,
            base_delay,
            max_delay,
        }
    }

    /// Execute `request`, retrying transient failures.
    #[instrument(
        skip(self, request),
        fields(label = %request.label(), max_attempts = *request.max_attempts())
    )]
    pub async fn execute(&self, request: &UpstreamRequest) -> UpstreamResult<Option<Value>> {
        let max_attempts = (*request.max_attempts()).max(1);
        let attempt = AtomicUsize::new(0);
        let schedule = self.schedule(max_attempts);

        let outcome = Retry::spawn(schedule, || {
            let current = attempt.fetch_add(1, Ordering::SeqCst) + 1;
            self.attempt(request, current, max_attempts)
        })
        .await;

        match outcome {
            Ok(body) => Ok(body),
            Err(e) if matches!(e.kind(), UpstreamErrorKind::Status { .. }) => {
                warn!(label = %request.label(), max_attempts, "Retries exhausted on upstream status");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Delays between the attempts of one request: the base delay, doubling,
    /// capped at the maximum delay.
    fn schedule(&self, max_attempts: usize) -> impl Iterator<Item = Duration> {
        let base_ms = u64::try_from(self.base_delay.as_millis()).unwrap_or(u64::MAX);
        ExponentialFactorBackoff::from_millis(base_ms, 2.0)
            .max_delay(self.max_delay)
            .take(max_attempts.saturating_sub(1))
    }

    /// Send `request` once, honouring its timeout, and report the raw status.
    #[instrument(skip(self, request), fields(label = %request.label()))]
    pub async fn probe(&self, request: &UpstreamRequest) -> UpstreamResult<u16> {
        self.send_once(request).await.map(|r| *r.status())
    }

    async fn send_once(&self, request: &UpstreamRequest) -> UpstreamResult<UpstreamResponse> {
        let timeout = *request.timeout();
        match tokio::time::timeout(timeout, self.transport.send(request)).await {
            Ok(result) => result,
            Err(_) => Err(UpstreamError::new(UpstreamErrorKind::Timeout(
                timeout.as_millis() as u64,
            ))),
        }
    }

    async fn attempt(
        &self,
        request: &UpstreamRequest,
        attempt: usize,
        max_attempts: usize,
    ) -> Result<Option<Value>, RetryError<UpstreamError>> {
        let label = request.label();

        let err = match self.send_once(request).await {
            Ok(response) => {
                let status = *response.status();
                match classify(status) {
                    StatusClass::Success => {
                        debug!(label = %label, attempt, status, "Upstream call succeeded");
                        return serde_json::from_str(response.body()).map(Some).map_err(|e| {
                            RetryError::Permanent(UpstreamError::new(UpstreamErrorKind::Decode(
                                e.to_string(),
                            )))
                        });
                    }
                    StatusClass::NonRetryable => {
                        warn!(
                            label = %label,
                            attempt,
                            max_attempts,
                            status,
                            body = %preview(response.body()),
                            "Upstream rejected request"
                        );
                        return Ok(None);
                    }
                    StatusClass::Retryable => UpstreamError::new(UpstreamErrorKind::Status {
                        status,
                        body: preview(response.body()),
                    }),
                }
            }
            Err(err) => err,
        };

        if err.kind().is_retryable() {
            warn!(label = %label, attempt, max_attempts, error = %err.kind(), "Upstream transient failure");
            Err(RetryError::Transient {
                err,
                retry_after: None,
            })
        } else {
            warn!(label = %label, attempt, error = %err.kind(), "Upstream failure, not retrying");
            Err(RetryError::Permanent(err))
        }
    }
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[derive(Debug)]
    struct Unreachable;

    #[async_trait]
    impl Transport for Unreachable {
        async fn send(&self, _request: &UpstreamRequest) -> UpstreamResult<UpstreamResponse> {
            Err(UpstreamError::new(UpstreamErrorKind::Transport("unreachable".into())))
        }
    }

    fn client(base_ms: u64, max_ms: u64) -> RetryClient {
        RetryClient::new(
            Arc::new(Unreachable),
            Duration::from_millis(base_ms),
            Duration::from_millis(max_ms),
        )
    }

    #[test]
    fn test_schedule_doubles_from_base() {
        let delays: Vec<_> = client(1000, 30_000).schedule(5).collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_millis(1000),
                Duration::from_millis(2000),
                Duration::from_millis(4000),
                Duration::from_millis(8000),
            ]
        );
    }

    #[test]
    fn test_schedule_capped_and_bounded() {
        let delays: Vec<_> = client(1000, 30_000).schedule(40).collect();
        assert_eq!(delays.len(), 39);
        assert!(delays.iter().all(|d| *d <= Duration::from_secs(30)));
        assert_eq!(delays.last(), Some(&Duration::from_secs(30)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_network_failure_retried_then_raised() {
        let request = UpstreamRequest::post("https://upstream.test/m", serde_json::json!({}))
            .with_max_attempts(3);
        let started = tokio::time::Instant::now();

        let err = client(1000, 30_000).execute(&request).await.unwrap_err();

        assert!(matches!(err.kind(), UpstreamErrorKind::Transport(_)));
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(3) && elapsed < Duration::from_millis(3100));
    }

    #[test]
    fn test_single_attempt_never_sleeps() {
        assert_eq!(client(1000, 30_000).schedule(1).count(), 0);
        assert_eq!(client(1000, 30_000).schedule(0).count(), 0);
    }

    #[test]
    fn test_preview_truncates_by_chars() {
        let body = "ж".repeat(600);
        assert_eq!(preview(&body).chars().count(), 500);
        assert_eq!(preview("short"), "short");
    }
}
