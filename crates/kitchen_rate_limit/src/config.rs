//! Quota configuration.

use crate::RouteGroup;
use config::{Config, File};
use derive_getters::Getters;
use kitchen_error::{ConfigError, KitchenError, KitchenResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Window length and per-group ceilings.
///
/// ```toml
/// window_secs = 60
/// standard_max = 30
/// image_max = 10
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct RateLimitConfig {
    /// Window length in seconds
    #[serde(default = "default_window_secs")]
    window_secs: u64,
    /// Requests per window for standard routes
    #[serde(default = "default_standard_max")]
    standard_max: u32,
    /// Requests per window for image routes
    #[serde(default = "default_image_max")]
    image_max: u32,
}

fn default_window_secs() -> u64 {
    60
}

fn default_standard_max() -> u32 {
    30
}

fn default_image_max() -> u32 {
    10
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: default_window_secs(),
            standard_max: default_standard_max(),
            image_max: default_image_max(),
        }
    }
}

impl RateLimitConfig {
    /// Create a configuration with explicit values.
    pub fn new(window_secs: u64, standard_max: u32, image_max: u32) -> Self {
        Self {
            window_secs,
            standard_max,
            image_max,
        }
    }

    /// Ceiling for a route group.
    pub fn max_for(&self, group: RouteGroup) -> u32 {
        match group {
            RouteGroup::Standard => self.standard_max,
            RouteGroup::Image => self.image_max,
        }
    }

    /// Load quotas from a standalone TOML file. Missing keys take defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> KitchenResult<Self> {
        debug!("Loading rate limit configuration");
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                KitchenError::from(ConfigError::new(format!(
                    "Failed to load rate limit config: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                KitchenError::from(ConfigError::new(format!(
                    "Failed to parse rate limit config: {}",
                    e
                )))
            })
    }
}
