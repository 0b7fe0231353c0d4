//! Host lifecycle bridge
//!
//! The core exposes plain async contracts; whatever event mechanism the
//! host runs (startup hooks, a service-worker shim, signals) calls these.
//! Install must complete populate before the host reports install done;
//! activate prunes superseded versions and never fails the host.

use crate::error::Result;
use crate::fetch::AssetFetcher;
use crate::interceptor::{AssetRequest, AssetResponse, RequestInterceptor};
use crate::manager::CacheManager;
use crate::manifest::AssetManifest;
use blob_bucket_store::{BlobStore, Bucket};
use std::sync::Arc;
use tracing::{error, info};

pub struct LifecycleAdapter {
    manager: CacheManager,
    interceptor: RequestInterceptor,
    bucket: Arc<dyn Bucket>,
    manifest: AssetManifest,
}

impl LifecycleAdapter {
    /// Wire the core against a store and fetcher for one manifest. Opens
    /// the current version's bucket; the interceptor only ever sees that
    /// bucket.
    pub async fn new(
        store: Arc<dyn BlobStore>,
        fetcher: Arc<dyn AssetFetcher>,
        manifest: AssetManifest,
        bucket_prefix: &str,
    ) -> Result<Self> {
        let manager = CacheManager::new(Arc::clone(&store), Arc::clone(&fetcher), bucket_prefix);
        let bucket = store
            .open(manager.bucket_name(&manifest.version).as_str())
            .await?;
        let interceptor = RequestInterceptor::new(Arc::clone(&bucket), fetcher, &manifest);

        Ok(Self {
            manager,
            interceptor,
            bucket,
            manifest,
        })
    }

    /// Install event: populate the current version's bucket. An error
    /// means install did not complete and must be retried as a whole.
    pub async fn on_install(&self) -> Result<()> {
        self.manager.populate(&self.manifest).await
    }

    /// Activate event: prune buckets of superseded versions. Best-effort;
    /// returns the number of buckets removed and never fails the host.
    pub async fn on_activate(&self) -> u64 {
        match self.manager.prune_stale(&self.manifest.version).await {
            Ok(removed) => {
                info!(removed, version = %self.manifest.version, "Activate complete");
                removed
            }
            Err(e) => {
                error!(error = %e, "Bucket enumeration failed during activate");
                0
            }
        }
    }

    /// Request event: answer from cache or network per the interception
    /// policy.
    pub async fn on_request(&self, request: &AssetRequest) -> Result<AssetResponse> {
        self.interceptor.handle(request).await
    }

    /// Whether the current version's bucket holds every manifest asset.
    pub async fn is_ready(&self) -> bool {
        self.manager.is_ready(&self.manifest).await
    }

    /// Number of assets currently cached for the active version.
    pub async fn cached_assets(&self) -> usize {
        self.bucket.keys().await.map(|k| k.len()).unwrap_or(0)
    }

    pub fn manifest(&self) -> &AssetManifest {
        &self.manifest
    }
}
