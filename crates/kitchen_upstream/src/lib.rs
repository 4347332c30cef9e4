//! Outbound calls to the generative API.
//!
//! Layers, leaf first:
//!
//! - [`Transport`]: one HTTP exchange. [`ReqwestTransport`] in production,
//!   scripted doubles in tests.
//! - [`RetryClient`]: bounded exponential backoff over a transport. Rejected
//!   requests come back as `Ok(None)`; a network failure on the final
//!   attempt comes back as `Err`.
//! - [`FallbackChain`]: an ordered list of image [`ProviderCandidate`]s tried
//!   one at a time until one yields an image.
//! - [`GeminiClient`]: the facade the HTTP handlers use.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod config;
mod fallback;
mod gemini;
mod request;
mod retry;
mod transport;

pub use client::{GeminiClient, TextRequest};
pub use config::{ImageModel, ModelFamily, UpstreamConfig};
pub use fallback::{
    FallbackChain, FallbackWinner, GeminiImageCandidate, ImagenCandidate, ProbeFailure,
    ProbeResult, ProbeStatus, ProviderCandidate,
};
pub use gemini::{
    Candidate, Content, GenerateContentResponse, InlineData, Part, PredictResponse, Prediction,
    generate_content_url, predict_url,
};
pub use request::{UpstreamRequest, UpstreamResponse};
pub use retry::RetryClient;
pub use transport::{ReqwestTransport, Transport};
