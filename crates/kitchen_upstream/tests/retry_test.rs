//! Retry client behaviour against scripted upstream replies.

mod test_utils;

use kitchen_error::UpstreamErrorKind;
use kitchen_upstream::{RetryClient, UpstreamRequest};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use test_utils::{MockReply, MockTransport};
use tokio::time::Instant;

fn client(transport: &MockTransport) -> RetryClient {
    RetryClient::new(
        Arc::new(transport.clone()),
        Duration::from_millis(1000),
        Duration::from_secs(30),
    )
}

fn request(max_attempts: usize) -> UpstreamRequest {
    UpstreamRequest::post("https://upstream.test/models/m:generateContent", json!({}))
        .with_max_attempts(max_attempts)
        .with_label("test")
}

#[tokio::test(start_paused = true)]
async fn test_transient_status_exhausts_attempts_then_returns_none() {
    let transport = MockTransport::always(MockReply::status(503));
    let started = Instant::now();

    let result = client(&transport).execute(&request(5)).await;

    assert!(matches!(result, Ok(None)));
    assert_eq!(transport.call_count(), 5);
    // 1s + 2s + 4s + 8s between five attempts.
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(15) && elapsed < Duration::from_secs(16));
}

#[tokio::test(start_paused = true)]
async fn test_retry_ceiling_respected_for_other_budgets() {
    for max_attempts in [1, 2, 3] {
        let transport = MockTransport::always(MockReply::status(429));
        let result = client(&transport).execute(&request(max_attempts)).await;
        assert!(matches!(result, Ok(None)));
        assert_eq!(transport.call_count(), max_attempts);
    }
}

#[tokio::test(start_paused = true)]
async fn test_forbidden_short_circuits_without_sleep() {
    let transport = MockTransport::new(vec![MockReply::status(403), MockReply::ok_json(json!({}))]);
    let started = Instant::now();

    let result = client(&transport).execute(&request(5)).await;

    assert!(matches!(result, Ok(None)));
    assert_eq!(transport.call_count(), 1);
    assert!(started.elapsed() < Duration::from_millis(1000));
}

#[tokio::test(start_paused = true)]
async fn test_bad_request_and_legal_block_are_not_retried() {
    for status in [400, 451] {
        let transport = MockTransport::always(MockReply::status(status));
        let result = client(&transport).execute(&request(5)).await;
        assert!(matches!(result, Ok(None)));
        assert_eq!(transport.call_count(), 1);
    }
}

#[tokio::test(start_paused = true)]
async fn test_network_failure_on_last_attempt_propagates() {
    let transport = MockTransport::always(MockReply::NetworkError("connection reset".into()));

    let err = client(&transport)
        .execute(&request(5))
        .await
        .expect_err("network failure on final attempt must surface");

    assert_eq!(transport.call_count(), 5);
    assert!(matches!(err.kind(), UpstreamErrorKind::Transport(msg) if msg == "connection reset"));
}

#[tokio::test(start_paused = true)]
async fn test_network_errors_then_success() {
    let transport = MockTransport::new(vec![
        MockReply::NetworkError("dns".into()),
        MockReply::status(500),
        MockReply::ok_json(json!({"candidates": []})),
    ]);

    let result = client(&transport).execute(&request(5)).await.unwrap();

    assert_eq!(result, Some(json!({"candidates": []})));
    assert_eq!(transport.call_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_status_failure_on_last_attempt_is_none_even_after_network_errors() {
    let transport = MockTransport::new(vec![
        MockReply::NetworkError("refused".into()),
        MockReply::status(502),
    ]);

    let result = client(&transport).execute(&request(2)).await;
    assert!(matches!(result, Ok(None)));
}

#[tokio::test(start_paused = true)]
async fn test_timeout_counts_as_network_failure() {
    let transport = MockTransport::always(MockReply::Hang(Duration::from_secs(120)));
    let request = request(2).with_timeout(Duration::from_secs(15));

    let err = client(&transport).execute(&request).await.unwrap_err();

    assert_eq!(transport.call_count(), 2);
    assert!(matches!(err.kind(), UpstreamErrorKind::Timeout(15_000)));
}

#[tokio::test(start_paused = true)]
async fn test_success_with_invalid_json_is_decode_error() {
    let transport = MockTransport::always(MockReply::Status(200, "<html>".into()));

    let err = client(&transport).execute(&request(5)).await.unwrap_err();

    assert_eq!(transport.call_count(), 1);
    assert!(matches!(err.kind(), UpstreamErrorKind::Decode(_)));
}

#[tokio::test(start_paused = true)]
async fn test_backoff_capped_for_large_budgets() {
    let transport = MockTransport::always(MockReply::status(503));
    let started = Instant::now();
    let client = RetryClient::new(
        Arc::new(transport.clone()),
        Duration::from_millis(1000),
        Duration::from_secs(4),
    );

    client.execute(&request(6)).await.unwrap();

    // 1 + 2 + 4 + 4 + 4
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(15) && elapsed < Duration::from_secs(16));
}
