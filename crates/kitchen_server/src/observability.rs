//! Tracing subscriber setup.

use derive_getters::Getters;
use kitchen_error::{KitchenResult, ServerError, ServerErrorKind};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Getters, derive_setters::Setters)]
#[setters(prefix = "with_")]
pub struct ObservabilityConfig {
    /// Filter used when `RUST_LOG` is unset
    #[setters(into)]
    log_level: String,
    /// Emit JSON lines instead of human-readable output
    json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info,kitchen=debug".to_string(),
            json_logs: false,
        }
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `config.log_level`. Fails if a
/// subscriber is already installed.
pub fn init_observability(config: &ObservabilityConfig) -> KitchenResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| ServerError::new(ServerErrorKind::Observability(e.to_string())))?;

    let fmt_layer = if config.json_logs {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_line_number(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| ServerError::new(ServerErrorKind::Observability(e.to_string())))?;

    Ok(())
}
