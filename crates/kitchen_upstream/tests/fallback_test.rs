//! Sequential image-provider fallback.

mod test_utils;

use kitchen_upstream::{
    FallbackChain, ImageModel, ImagenCandidate, ModelFamily, ProbeStatus, ProviderCandidate,
    RetryClient, UpstreamConfig,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use test_utils::{MockReply, MockTransport};

fn retry(transport: &MockTransport) -> RetryClient {
    RetryClient::new(
        Arc::new(transport.clone()),
        Duration::from_millis(1000),
        Duration::from_secs(30),
    )
}

fn imagen_chain(models: &[&str]) -> FallbackChain {
    let candidates: Vec<Box<dyn ProviderCandidate>> = models
        .iter()
        .map(|m| {
            Box::new(ImagenCandidate::new(
                "https://upstream.test/models",
                "key",
                *m,
                Duration::from_secs(15),
            )) as Box<dyn ProviderCandidate>
        })
        .collect();
    FallbackChain::new(candidates)
}

fn imagen_image(base64: &str) -> MockReply {
    MockReply::ok_json(json!({"predictions": [{"bytesBase64Encoded": base64, "mimeType": "image/png"}]}))
}

#[tokio::test(start_paused = true)]
async fn test_second_candidate_wins_and_third_is_never_called() {
    let transport = MockTransport::new(vec![MockReply::status(500), imagen_image("QkJC")]);
    let chain = imagen_chain(&["a", "b", "c"]);

    let winner = chain.run(&retry(&transport), "Pasta").await.expect("b succeeds");

    assert_eq!(winner.model, "b");
    assert_eq!(winner.image.base64(), "QkJC");
    assert_eq!(
        transport.calls(),
        vec![
            "https://upstream.test/models/a:predict",
            "https://upstream.test/models/b:predict",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_chain_returns_none() {
    let transport = MockTransport::new(vec![
        MockReply::status(403),
        MockReply::NetworkError("reset".into()),
        MockReply::ok_json(json!({"predictions": []})),
    ]);
    let chain = imagen_chain(&["a", "b", "c"]);

    let winner = chain.run(&retry(&transport), "Pasta").await;

    assert!(winner.is_none());
    assert_eq!(transport.call_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_each_candidate_gets_a_single_attempt() {
    let transport = MockTransport::always(MockReply::status(503));
    let chain = imagen_chain(&["a", "b"]);

    assert!(chain.run(&retry(&transport), "Soup").await.is_none());
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_timed_out_candidate_is_skipped() {
    let transport = MockTransport::new(vec![
        MockReply::Hang(Duration::from_secs(60)),
        imagen_image("T0s="),
    ]);
    let chain = imagen_chain(&["slow", "fast"]);

    let winner = chain.run(&retry(&transport), "Cake").await.expect("fast wins");
    assert_eq!(winner.model, "fast");
}

#[tokio::test(start_paused = true)]
async fn test_gemini_family_candidate_at_end_of_chain() {
    let transport = MockTransport::new(vec![
        MockReply::status(404),
        MockReply::ok_json(json!({"candidates": [{"content": {"parts": [
            {"inlineData": {"mimeType": "image/jpeg", "data": "SlBH"}}
        ]}}]})),
    ]);
    let config = UpstreamConfig::default().with_image_models(vec![
        ImageModel::new(ModelFamily::Imagen, "imagen-a"),
        ImageModel::new(ModelFamily::Gemini, "gemini-b"),
    ]);
    let chain = FallbackChain::from_config(&config);

    let winner = chain.run(&retry(&transport), "Tacos").await.expect("gemini wins");

    assert_eq!(winner.model, "gemini-b");
    assert_eq!(winner.image.data_uri(), "data:image/jpeg;base64,SlBH");
    assert!(transport.calls()[1].ends_with("gemini-b:generateContent"));
}

#[tokio::test(start_paused = true)]
async fn test_probe_reports_every_candidate() {
    let transport = MockTransport::new(vec![
        MockReply::status(403),
        MockReply::NetworkError("unreachable".into()),
        imagen_image("QQ=="),
    ]);
    let chain = imagen_chain(&["a", "b", "c"]);

    let results = chain.probe(&retry(&transport), "red apple").await;

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].status, ProbeStatus::Http(403));
    assert!(!results[0].ok);
    assert!(matches!(results[1].status, ProbeStatus::Failed(_)));
    assert!(results[1].error.is_some());
    assert!(results[2].ok);
}
