//! HTTP API for the Kitchen recipe assistant.
//!
//! Proxies recipe, meal-plan, drink-pairing, ingredient-detection and
//! food-photo requests to the generative API. Every request passes the
//! per-client rate limiter first, then input validation, then a retried
//! upstream call; image generation walks an ordered model fallback chain and
//! parks the winning image in a short-lived in-memory store.
//!
//! # Routes
//!
//! | Route | Method | Rate-limit group |
//! |---|---|---|
//! | `/api/health` | GET | none |
//! | `/api/vision` | POST | standard |
//! | `/api/recipe` | POST | standard |
//! | `/api/recipes` | POST | standard |
//! | `/api/recipe-detail` | POST | standard |
//! | `/api/meal-plan` | POST | standard |
//! | `/api/drinks` | POST | standard |
//! | `/api/image` | POST | image |
//! | `/api/image/:id` | GET | standard |
//! | `/api/image-diagnostics` | GET | image |
//!
//! # Example
//!
//! ```no_run
//! use kitchen_server::{AppState, ServerConfig, router};
//! use kitchen_upstream::ReqwestTransport;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::load(None)?;
//! let state = AppState::new(config, Arc::new(ReqwestTransport::new()?))?;
//! let app = router(state);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod feature;
mod middleware;
mod observability;
pub mod prompts;
mod routes;
mod server;
mod state;

pub use config::{HttpConfig, ServerConfig};
pub use error::ApiError;
pub use feature::Feature;
pub use middleware::{client_key, rate_limit, route_group};
pub use observability::{ObservabilityConfig, init_observability};
pub use routes::router;
pub use server::{serve, shutdown_signal, spawn_rate_limit_sweeper};
pub use state::AppState;
