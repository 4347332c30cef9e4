//! The single-exchange HTTP seam.

use crate::{UpstreamRequest, UpstreamResponse};
use async_trait::async_trait;
use kitchen_error::{UpstreamError, UpstreamErrorKind, UpstreamResult};
use tracing::{debug, instrument};

/// Performs exactly one HTTP exchange. No retries, no status interpretation.
///
/// Connection-level failures are `Err`; every received response, whatever
/// its status, is `Ok`.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Send the request and return status plus body.
    async fn send(&self, request: &UpstreamRequest) -> UpstreamResult<UpstreamResponse>;
}

/// Production transport over a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport with gzip enabled.
    pub fn new() -> UpstreamResult<Self> {
        let client = reqwest::Client::builder()
            .gzip(true)
            .build()
            .map_err(|e| {
                UpstreamError::new(UpstreamErrorKind::Transport(format!(
                    "Failed to build HTTP client: {}",
                    e
                )))
            })?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[instrument(skip(self, request), fields(label = %request.label()))]
    async fn send(&self, request: &UpstreamRequest) -> UpstreamResult<UpstreamResponse> {
        let mut builder = self
            .client
            .request(request.method().clone(), request.url())
            .json(request.body());
        for (name, value) in request.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                UpstreamError::new(UpstreamErrorKind::Timeout(request.timeout().as_millis() as u64))
            } else {
                UpstreamError::new(UpstreamErrorKind::Transport(e.to_string()))
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| UpstreamError::new(UpstreamErrorKind::Transport(e.to_string())))?;

        debug!(status, bytes = body.len(), "Received upstream response");
        Ok(UpstreamResponse::new(status, body))
    }
}
