//! TTL-expiring image map.

use derive_getters::Getters;
use parking_lot::Mutex;
use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Configuration for the image store.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
pub struct ImageStoreConfig {
    /// Lifetime of every entry (seconds)
    #[serde(default = "default_ttl_secs")]
    #[builder(default = "default_ttl_secs()")]
    ttl_secs: u64,
}

fn default_ttl_secs() -> u64 {
    600 // 10 minutes
}

impl Default for ImageStoreConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

/// An image held by the store.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct StoredImage {
    id: String,
    bytes: Vec<u8>,
    mime_type: String,
    created_at: Instant,
}

/// Process-wide store of short-lived images.
///
/// Identifiers are 128-bit values from the OS random source, hex encoded.
/// Each [`put`](ImageStore::put) schedules its own removal; [`get`](ImageStore::get)
/// also refuses entries past their TTL so a delayed timer never serves stale data.
///
/// # Example
///
/// ```
/// use kitchen_cache::{ImageStore, ImageStoreConfig};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let store = ImageStore::new(ImageStoreConfig::default());
/// let id = store.put(vec![0x89, b'P', b'N', b'G'], "image/png");
///
/// let image = store.get(&id).unwrap();
/// assert_eq!(image.mime_type(), "image/png");
/// assert!(store.get("0123").is_none());
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ImageStore {
    entries: Arc<Mutex<HashMap<String, StoredImage>>>,
    ttl: Duration,
}

impl ImageStore {
    /// Create an empty store.
    pub fn new(config: ImageStoreConfig) -> Self {
        tracing::debug!(ttl_secs = config.ttl_secs, "Creating ImageStore");
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            ttl: Duration::from_secs(config.ttl_secs),
        }
    }

    /// Entry lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Store an image and return its identifier.
    ///
    /// Must be called from within a Tokio runtime; removal is scheduled on it.
    #[tracing::instrument(skip(self, bytes, mime_type), fields(size = bytes.len()))]
    pub fn put(&self, bytes: Vec<u8>, mime_type: impl Into<String>) -> String {
        let id = random_id();
        let created_at = Instant::now();
        let image = StoredImage {
            id: id.clone(),
            bytes,
            mime_type: mime_type.into(),
            created_at,
        };
        self.entries.lock().insert(id.clone(), image);

        let entries = Arc::clone(&self.entries);
        let deadline = created_at + self.ttl;
        let expiring = id.clone();
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if entries.lock().remove(&expiring).is_some() {
                tracing::debug!(id = %expiring, "Image expired");
            }
        });

        tracing::debug!(id = %id, "Stored image");
        id
    }

    /// Fetch an image if it exists and has not expired.
    pub fn get(&self, id: &str) -> Option<StoredImage> {
        let entries = self.entries.lock();
        entries
            .get(id)
            .filter(|image| image.created_at.elapsed() < self.ttl)
            .cloned()
    }

    /// Number of entries currently held, expired or not.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

fn random_id() -> String {
    let mut raw = [0u8; 16];
    OsRng.fill_bytes(&mut raw);
    format!("{:032x}", u128::from_be_bytes(raw))
}
