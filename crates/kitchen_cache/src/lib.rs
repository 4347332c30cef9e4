//! Ephemeral in-memory image store.
//!
//! Generated images are kept for a short TTL so clients can fetch them by URL
//! instead of carrying megabytes of base64 in JSON. Entries are never updated
//! and never persisted.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod store;

pub use store::{ImageStore, ImageStoreConfig, ImageStoreConfigBuilder, StoredImage};
