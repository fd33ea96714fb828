//! Picture Cache
//!
//! ## Responsibilities
//!
//! - Keep the last captured still image per camera with its capture time
//! - Serve it back only while younger than the freshness window
//!
//! One entry per camera, overwritten on every fresh capture.

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

/// Cached capture
struct CachedPicture {
    data: Vec<u8>,
    captured_at: DateTime<Utc>,
}

/// Last-capture cache for one camera.
pub struct PictureCache {
    entry: RwLock<Option<CachedPicture>>,
    max_age: chrono::Duration,
}

impl PictureCache {
    /// Create a cache whose entries stay fresh for `max_age_secs` seconds.
    pub fn new(max_age_secs: i64) -> Self {
        Self {
            entry: RwLock::new(None),
            max_age: chrono::Duration::seconds(max_age_secs),
        }
    }

    /// The cached bytes, if an entry exists and is still fresh.
    pub async fn fresh(&self) -> Option<Vec<u8>> {
        let entry = self.entry.read().await;
        let cached = entry.as_ref()?;

        let age = Utc::now().signed_duration_since(cached.captured_at);
        if age < self.max_age {
            Some(cached.data.clone())
        } else {
            None
        }
    }

    /// Replace the cached entry.
    pub async fn store(&self, data: Vec<u8>, captured_at: DateTime<Utc>) {
        let mut entry = self.entry.write().await;
        *entry = Some(CachedPicture { data, captured_at });
    }
}
