//! Error types for the Kitchen backend.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! Upstream failures also carry the retry classification used by the
//! backoff client ([`classify`], [`UpstreamErrorKind::is_retryable`]).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod json;
mod server;
mod upstream;
mod validation;

pub use config::ConfigError;
pub use error::{KitchenError, KitchenErrorKind, KitchenResult};
pub use json::JsonError;
pub use server::{ServerError, ServerErrorKind};
pub use upstream::{StatusClass, UpstreamError, UpstreamErrorKind, UpstreamResult, classify};
pub use validation::{ValidationError, ValidationErrorKind, ValidationResult};
