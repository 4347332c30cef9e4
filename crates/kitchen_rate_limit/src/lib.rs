//! Per-client request quotas.
//!
//! Requests are bucketed by client address and route group. Each group has
//! its own ceiling per window; the image group is tighter because every
//! image request fans out to several paid upstream calls.
//!
//! # Example
//!
//! ```
//! use kitchen_rate_limit::{RateLimitConfig, RateLimiter, RouteGroup};
//!
//! let limiter = RateLimiter::new(RateLimitConfig::default()).unwrap();
//! assert!(limiter.check(RouteGroup::Standard, "203.0.113.7").is_ok());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod group;
mod limiter;

pub use config::RateLimitConfig;
pub use group::RouteGroup;
pub use limiter::{RateLimitExceeded, RateLimiter};
