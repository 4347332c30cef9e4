//! Layered server configuration.

use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use derive_getters::Getters;
use kitchen_cache::ImageStoreConfig;
use kitchen_error::{ConfigError, KitchenError, KitchenResult};
use kitchen_rate_limit::RateLimitConfig;
use kitchen_security::InputLimits;
use kitchen_upstream::UpstreamConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;
use tracing::{debug, instrument};

/// Bundled defaults shipped with the binary.
const DEFAULT_CONFIG: &str = include_str!("../kitchen.toml");

/// Prefix for structured environment overrides (`KITCHEN__SERVER__PORT`).
const ENV_PREFIX: &str = "KITCHEN";

/// Listener and HTTP hardening settings.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_setters::Setters,
)]
#[setters(prefix = "with_")]
pub struct HttpConfig {
    /// TCP port to listen on
    #[serde(default = "default_port")]
    port: u16,
    /// Largest accepted request body in bytes
    #[serde(default = "default_body_limit_bytes")]
    body_limit_bytes: usize,
    /// Allowed CORS origins: empty for none, `*` for any, else comma-separated
    #[serde(default)]
    #[setters(into)]
    cors_origin: String,
}

fn default_port() -> u16 {
    5050
}

fn default_body_limit_bytes() -> usize {
    12 * 1024 * 1024
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            body_limit_bytes: default_body_limit_bytes(),
            cors_origin: String::new(),
        }
    }
}

impl HttpConfig {
    /// Address the server binds to (all interfaces).
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

/// Complete server configuration.
///
/// Sources, later overriding earlier:
/// 1. bundled `kitchen.toml`
/// 2. `~/.config/kitchen/kitchen.toml`
/// 3. `./kitchen.toml`, or the file given with `--config`
/// 4. `KITCHEN__<SECTION>__<KEY>` environment variables
/// 5. `GEMINI_API_KEY` / `GOOGLE_API_KEY`, `PORT`, `CORS_ORIGIN`, `GEMINI_MODEL`
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Getters, derive_setters::Setters,
)]
#[setters(prefix = "with_")]
pub struct ServerConfig {
    #[serde(default)]
    server: HttpConfig,
    #[serde(default)]
    upstream: UpstreamConfig,
    #[serde(default)]
    rate_limit: RateLimitConfig,
    #[serde(default)]
    image_store: ImageStoreConfig,
    #[serde(default)]
    limits: InputLimits,
}

impl ServerConfig {
    /// Load configuration from every source against the process environment.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use kitchen_server::ServerConfig;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = ServerConfig::load(None)?;
    /// println!("listening on {}", config.server().socket_addr());
    /// # Ok(())
    /// # }
    /// ```
    pub fn load(path: Option<&Path>) -> KitchenResult<Self> {
        let env: HashMap<String, String> = std::env::vars().collect();
        Self::load_with_env(path, &env)
    }

    /// Load configuration against an explicit environment map.
    #[instrument(skip(env))]
    pub fn load_with_env(path: Option<&Path>, env: &HashMap<String, String>) -> KitchenResult<Self> {
        let mut builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("kitchen").join("kitchen.toml");
            builder = builder.add_source(File::from(user_config).required(false));
        }

        builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name("kitchen").required(false)),
        };

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .source(Some(env.clone())),
        );

        let builder = apply_legacy_env(builder, env)?;

        let config: Self = builder
            .build()
            .map_err(|e| {
                KitchenError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                KitchenError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;

        debug!(?config, "Loaded configuration");
        Ok(config)
    }
}

/// Environment names used by existing deployments.
fn apply_legacy_env(
    builder: ConfigBuilder<DefaultState>,
    env: &HashMap<String, String>,
) -> KitchenResult<ConfigBuilder<DefaultState>> {
    let lookup = |name: &str| env.get(name).filter(|v| !v.trim().is_empty()).cloned();
    let api_key = lookup("GEMINI_API_KEY").or_else(|| lookup("GOOGLE_API_KEY"));

    let overrides = [
        ("upstream.api_key", api_key),
        ("server.port", lookup("PORT")),
        ("server.cors_origin", lookup("CORS_ORIGIN")),
        ("upstream.text_model", lookup("GEMINI_MODEL")),
    ];

    overrides
        .into_iter()
        .try_fold(builder, |builder, (key, value)| {
            builder.set_override_option(key, value)
        })
        .map_err(|e| {
            KitchenError::from(ConfigError::new(format!(
                "Invalid environment override: {}",
                e
            )))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_bundled_defaults() {
        let config = ServerConfig::load_with_env(None, &HashMap::new()).unwrap();
        assert_eq!(*config.server().port(), 5050);
        assert_eq!(*config.server().body_limit_bytes(), 12 * 1024 * 1024);
        assert_eq!(*config.rate_limit().standard_max(), 30);
        assert_eq!(*config.image_store().ttl_secs(), 600);
        assert_eq!(config.upstream().image_models().len(), 4);
        assert!(!config.upstream().has_api_key());
    }

    #[test]
    fn test_legacy_env_names() {
        let config = ServerConfig::load_with_env(
            None,
            &env(&[
                ("GOOGLE_API_KEY", "google-key"),
                ("PORT", "8088"),
                ("CORS_ORIGIN", "https://a.test"),
            ]),
        )
        .unwrap();
        assert_eq!(config.upstream().api_key(), "google-key");
        assert_eq!(*config.server().port(), 8088);
        assert_eq!(config.server().cors_origin(), "https://a.test");
    }

    #[test]
    fn test_gemini_key_preferred() {
        let config = ServerConfig::load_with_env(
            None,
            &env(&[("GEMINI_API_KEY", "gemini"), ("GOOGLE_API_KEY", "google")]),
        )
        .unwrap();
        assert_eq!(config.upstream().api_key(), "gemini");
    }

    #[test]
    fn test_prefixed_env_override() {
        let config = ServerConfig::load_with_env(
            None,
            &env(&[("KITCHEN__RATE_LIMIT__IMAGE_MAX", "3")]),
        )
        .unwrap();
        assert_eq!(*config.rate_limit().image_max(), 3);
    }
}
