//! Fixed-window request counters.
//!
//! Each (route group, client) pair owns a counter and the instant its window
//! opened. The counter resets only once a full window has elapsed since that
//! instant, so a client gets at most the group ceiling per window. Outcomes of
//! earlier requests never affect the count.

use crate::{RateLimitConfig, RouteGroup};
use kitchen_error::{ConfigError, KitchenResult};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use strum::IntoEnumIterator;
use tracing::{debug, instrument, warn};

/// A request refused by the limiter.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Rate limit exceeded for {} routes, retry after {:?}", group, retry_after)]
pub struct RateLimitExceeded {
    /// Route group whose quota is exhausted
    pub group: RouteGroup,
    /// Time until the client's window resets
    pub retry_after: Duration,
}

impl RateLimitExceeded {
    /// Whole seconds for a `Retry-After` header, never zero.
    pub fn retry_after_secs(&self) -> u64 {
        let secs = self.retry_after.as_secs();
        if self.retry_after.subsec_nanos() > 0 {
            secs + 1
        } else {
            secs.max(1)
        }
    }
}

/// Counter for one client in one route group.
#[derive(Debug, Clone, Copy)]
struct Window {
    opened: Instant,
    count: u32,
}

impl Window {
    fn open(now: Instant) -> Self {
        Self {
            opened: now,
            count: 0,
        }
    }

    fn is_expired(&self, now: Instant, length: Duration) -> bool {
        now.duration_since(self.opened) >= length
    }
}

/// Per-client, per-route-group request limiter.
///
/// Cloning is cheap; clones share state.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    windows: Arc<Mutex<HashMap<(RouteGroup, String), Window>>>,
    window: Duration,
    config: RateLimitConfig,
}

impl RateLimiter {
    /// Build a limiter for both route groups.
    ///
    /// Fails when the window is zero or a ceiling is zero.
    #[instrument(name = "rate_limiter_new", skip_all, fields(window_secs = config.window_secs()))]
    pub fn new(config: RateLimitConfig) -> KitchenResult<Self> {
        if *config.window_secs() == 0 {
            return Err(ConfigError::new("Rate limit window must be greater than zero").into());
        }
        if RouteGroup::iter().any(|group| config.max_for(group) == 0) {
            return Err(ConfigError::new("Rate limit ceiling must be greater than zero").into());
        }

        debug!(
            standard_max = config.max_for(RouteGroup::Standard),
            image_max = config.max_for(RouteGroup::Image),
            "Created rate limiter"
        );

        Ok(Self {
            windows: Arc::new(Mutex::new(HashMap::new())),
            window: Duration::from_secs(*config.window_secs()),
            config,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Count one request from `client` against `group`.
    pub fn check(&self, group: RouteGroup, client: &str) -> Result<(), RateLimitExceeded> {
        self.check_at(group, client, Instant::now())
    }

    fn check_at(
        &self,
        group: RouteGroup,
        client: &str,
        now: Instant,
    ) -> Result<(), RateLimitExceeded> {
        let max = self.config.max_for(group);
        let mut windows = self.windows.lock();
        let window = windows
            .entry((group, client.to_string()))
            .or_insert_with(|| Window::open(now));

        if window.is_expired(now, self.window) {
            *window = Window::open(now);
        }

        if window.count >= max {
            let retry_after = self.window.saturating_sub(now.duration_since(window.opened));
            drop(windows);
            warn!(client, route_group = %group, ?retry_after, "Rate limit exceeded");
            return Err(RateLimitExceeded { group, retry_after });
        }

        window.count += 1;
        Ok(())
    }

    /// Drop counters whose window has elapsed.
    pub fn sweep(&self) {
        self.sweep_at(Instant::now());
    }

    fn sweep_at(&self, now: Instant) {
        let mut windows = self.windows.lock();
        windows.retain(|_, window| !window.is_expired(now, self.window));
        windows.shrink_to_fit();
        let tracked = windows.len();
        drop(windows);
        debug!(tracked, "Swept idle rate limit state");
    }

    /// Number of client counters currently held across groups.
    pub fn tracked_clients(&self) -> usize {
        self.windows.lock().len()
    }
}
