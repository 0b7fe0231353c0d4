//! In-memory bucket store for tests and embedded use

use crate::error::Result;
use crate::store::{BlobStore, Bucket};
use crate::types::StoredBlob;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

type BucketMap = Arc<RwLock<HashMap<String, StoredBlob>>>;

/// Bucket store backed entirely by in-memory maps
#[derive(Default)]
pub struct MemoryBucketStore {
    buckets: RwLock<HashMap<String, BucketMap>>,
}

impl MemoryBucketStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStore for MemoryBucketStore {
    async fn open(&self, name: &str) -> Result<Arc<dyn Bucket>> {
        let mut buckets = self.buckets.write().await;
        let map = buckets.entry(name.to_string()).or_default().clone();
        Ok(Arc::new(MemoryBucket { map }))
    }

    async fn list_buckets(&self) -> Result<Vec<String>> {
        Ok(self.buckets.read().await.keys().cloned().collect())
    }

    async fn delete_bucket(&self, name: &str) -> Result<()> {
        self.buckets.write().await.remove(name);
        Ok(())
    }
}

struct MemoryBucket {
    map: BucketMap,
}

#[async_trait]
impl Bucket for MemoryBucket {
    async fn put(&self, key: &str, blob: StoredBlob) -> Result<()> {
        self.map.write().await.insert(key.to_string(), blob);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<StoredBlob>> {
        Ok(self.map.read().await.get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.map.write().await.remove(key);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self.map.read().await.keys().cloned().collect())
    }
}
