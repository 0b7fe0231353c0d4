//! Bucket lifecycle: populate on install, prune stale versions on activate

use crate::error::{CacheError, Result};
use crate::fetch::AssetFetcher;
use crate::manifest::{AssetManifest, BucketName, Version};
use blob_bucket_store::BlobStore;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Owns bucket lifecycle: creates and fills one bucket per manifest
/// version, and deletes buckets for superseded versions. The request path
/// never touches stale buckets; only the manager deletes anything.
pub struct CacheManager {
    store: Arc<dyn BlobStore>,
    fetcher: Arc<dyn AssetFetcher>,
    bucket_prefix: String,
    /// At most one in-flight populate per version.
    populate_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl CacheManager {
    pub fn new(
        store: Arc<dyn BlobStore>,
        fetcher: Arc<dyn AssetFetcher>,
        bucket_prefix: impl Into<String>,
    ) -> Self {
        Self {
            store,
            fetcher,
            bucket_prefix: bucket_prefix.into(),
            populate_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn bucket_name(&self, version: &Version) -> BucketName {
        BucketName::derive(&self.bucket_prefix, version)
    }

    async fn populate_lock(&self, version: &Version) -> Arc<Mutex<()>> {
        let mut locks = self.populate_locks.lock().await;
        locks
            .entry(version.as_str().to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Fetch every manifest asset from the network into the version's
    /// bucket.
    ///
    /// All-or-nothing: the first asset that cannot be fetched or stored
    /// aborts the install. A partially filled bucket may stay behind, but
    /// `is_ready` reports false for it and the next install event retries
    /// the whole manifest.
    pub async fn populate(&self, manifest: &AssetManifest) -> Result<()> {
        let lock = self.populate_lock(&manifest.version).await;
        let _guard = lock.lock().await;

        let bucket_name = self.bucket_name(&manifest.version);
        let bucket = self.store.open(bucket_name.as_str()).await?;
        info!(
            version = %manifest.version,
            bucket = bucket_name.as_str(),
            assets = manifest.assets.len(),
            "Populating cache"
        );

        for key in &manifest.assets {
            let blob = self
                .fetcher
                .fetch(key)
                .await
                .map_err(|e| CacheError::Populate {
                    version: manifest.version.as_str().to_string(),
                    key: key.clone(),
                    reason: e.to_string(),
                })?;

            bucket
                .put(key, blob)
                .await
                .map_err(|e| CacheError::Populate {
                    version: manifest.version.as_str().to_string(),
                    key: key.clone(),
                    reason: e.to_string(),
                })?;
            debug!(key, "Cached manifest asset");
        }

        info!(version = %manifest.version, "Cache populated");
        Ok(())
    }

    /// Delete every bucket of this cache's prefix that does not belong to
    /// `current`. Returns the number of buckets removed.
    ///
    /// Idempotent, best-effort cleanup: individual delete failures are
    /// logged and skipped, never propagated to the host lifecycle.
    /// Buckets without the prefix belong to someone else and are left
    /// alone.
    pub async fn prune_stale(&self, current: &Version) -> Result<u64> {
        let keep = self.bucket_name(current);
        let mut removed = 0u64;

        for name in self.store.list_buckets().await? {
            if name == keep.as_str() {
                continue;
            }
            if !BucketName::has_prefix(&name, &self.bucket_prefix) {
                continue;
            }
            match self.store.delete_bucket(&name).await {
                Ok(()) => {
                    info!(bucket = %name, "Pruned stale bucket");
                    removed += 1;
                }
                Err(e) => warn!(bucket = %name, error = %e, "Failed to prune stale bucket"),
            }
        }
        Ok(removed)
    }

    /// Whether the manifest version's bucket exists and holds every
    /// manifest asset. Checked by key enumeration, not content hashing:
    /// assets are immutable within a version.
    pub async fn is_ready(&self, manifest: &AssetManifest) -> bool {
        let bucket_name = self.bucket_name(&manifest.version);

        let names = match self.store.list_buckets().await {
            Ok(names) => names,
            Err(e) => {
                warn!(error = %e, "Failed to enumerate buckets");
                return false;
            }
        };
        if !names.iter().any(|n| n == bucket_name.as_str()) {
            return false;
        }

        let bucket = match self.store.open(bucket_name.as_str()).await {
            Ok(bucket) => bucket,
            Err(e) => {
                warn!(bucket = bucket_name.as_str(), error = %e, "Failed to open bucket");
                return false;
            }
        };
        let keys: HashSet<String> = match bucket.keys().await {
            Ok(keys) => keys.into_iter().collect(),
            Err(e) => {
                warn!(bucket = bucket_name.as_str(), error = %e, "Failed to enumerate keys");
                return false;
            }
        };

        manifest.assets.iter().all(|a| keys.contains(a))
    }
}
