//! Test doubles shared by the unit tests

use crate::error::{CacheError, Result};
use crate::fetch::AssetFetcher;
use async_trait::async_trait;
use blob_bucket_store::StoredBlob;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

/// Scripted fetcher: serves canned responses and counts network calls.
#[derive(Default)]
pub struct StubFetcher {
    responses: HashMap<String, StoredBlob>,
    fail_keys: HashSet<String>,
    offline: bool,
    calls: AtomicU64,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetcher for which every fetch fails, as if the network were down.
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    pub fn with_asset(mut self, key: &str, data: &[u8], content_type: &str) -> Self {
        self.responses
            .insert(key.to_string(), StoredBlob::new(data.to_vec(), content_type));
        self
    }

    /// Make fetches for `key` fail while others keep working.
    pub fn with_failing(mut self, key: &str) -> Self {
        self.fail_keys.insert(key.to_string());
        self
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl AssetFetcher for StubFetcher {
    async fn fetch(&self, key: &str) -> Result<StoredBlob> {
        self.calls.fetch_add(1, Ordering::Relaxed);

        if self.offline {
            return Err(CacheError::Fetch {
                key: key.to_string(),
                reason: "connection refused".to_string(),
            });
        }
        if self.fail_keys.contains(key) {
            return Err(CacheError::Fetch {
                key: key.to_string(),
                reason: "status 500".to_string(),
            });
        }
        self.responses
            .get(key)
            .cloned()
            .ok_or_else(|| CacheError::Fetch {
                key: key.to_string(),
                reason: "status 404".to_string(),
            })
    }
}
