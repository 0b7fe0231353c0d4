//! Cache-first request interception
//!
//! Per request the policy walks two states, CHECK_CACHE then
//! NETWORK_FALLBACK, terminal on response. Keys outside the manifest skip
//! both and pass straight through to the network, uncached.

use crate::error::{CacheError, Result};
use crate::fetch::AssetFetcher;
use crate::manifest::AssetManifest;
use blob_bucket_store::{Bucket, StoredBlob};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// A request for one asset, identified by its manifest key
#[derive(Debug, Clone)]
pub struct AssetRequest {
    pub key: String,
}

impl AssetRequest {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Where a response came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServedFrom {
    Cache,
    Network,
}

/// A served asset
#[derive(Debug, Clone)]
pub struct AssetResponse {
    pub blob: StoredBlob,
    pub served_from: ServedFrom,
}

/// Serves requests from the current version's bucket, falling back to the
/// network and backfilling the cache on the way out. Holds a handle to the
/// current bucket only; stale buckets are never consulted.
pub struct RequestInterceptor {
    bucket: Arc<dyn Bucket>,
    fetcher: Arc<dyn AssetFetcher>,
    manifest_keys: HashSet<String>,
}

impl RequestInterceptor {
    pub fn new(
        bucket: Arc<dyn Bucket>,
        fetcher: Arc<dyn AssetFetcher>,
        manifest: &AssetManifest,
    ) -> Self {
        Self {
            bucket,
            fetcher,
            manifest_keys: manifest.assets.iter().cloned().collect(),
        }
    }

    pub async fn handle(&self, request: &AssetRequest) -> Result<AssetResponse> {
        let key = request.key.as_str();

        // Unmanifested keys bypass the cache entirely
        if !self.manifest_keys.contains(key) {
            debug!(key, "Pass-through request");
            let blob = self.fetcher.fetch(key).await?;
            return Ok(AssetResponse {
                blob,
                served_from: ServedFrom::Network,
            });
        }

        // CHECK_CACHE
        match self.bucket.get(key).await {
            Ok(Some(blob)) => {
                debug!(key, "Cache hit");
                return Ok(AssetResponse {
                    blob,
                    served_from: ServedFrom::Cache,
                });
            }
            Ok(None) => debug!(key, "Cache miss"),
            Err(e) => warn!(key, error = %e, "Cache read failed, falling back to network"),
        }

        // NETWORK_FALLBACK
        let blob = self.fetcher.fetch(key).await.map_err(|e| {
            warn!(key, error = %e, "Network fallback failed");
            CacheError::Unavailable {
                key: key.to_string(),
            }
        })?;

        // Detached backfill: the response never waits on the cache write,
        // and cancelling the caller does not cancel a write already
        // scheduled. A failed backfill only costs future hit rate.
        let bucket = Arc::clone(&self.bucket);
        let stored = blob.clone();
        let owned_key = key.to_string();
        tokio::spawn(async move {
            match bucket.put(&owned_key, stored).await {
                Ok(()) => debug!(key = %owned_key, "Backfilled cache"),
                Err(e) => warn!(key = %owned_key, error = %e, "Backfill write failed"),
            }
        });

        Ok(AssetResponse {
            blob,
            served_from: ServedFrom::Network,
        })
    }
}
