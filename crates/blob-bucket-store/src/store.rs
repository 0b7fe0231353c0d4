//! Storage contracts
//!
//! A `BlobStore` hands out named buckets; a `Bucket` is a flat key -> blob
//! map. Puts replace whole values, and a concurrent reader never observes
//! a partially written blob.

use crate::error::Result;
use crate::types::StoredBlob;
use async_trait::async_trait;
use std::sync::Arc;

/// A collection of named buckets
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Open a bucket, creating it if absent.
    async fn open(&self, name: &str) -> Result<Arc<dyn Bucket>>;

    /// Names of every bucket currently present.
    async fn list_buckets(&self) -> Result<Vec<String>>;

    /// Delete a bucket and everything in it. Deleting a missing bucket is
    /// a no-op.
    async fn delete_bucket(&self, name: &str) -> Result<()>;
}

/// A flat key -> blob map inside one bucket
#[async_trait]
pub trait Bucket: Send + Sync {
    /// Store a blob under `key`, replacing any previous value atomically.
    async fn put(&self, key: &str, blob: StoredBlob) -> Result<()>;

    /// Fetch the blob stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<StoredBlob>>;

    /// Remove the blob stored under `key`. Missing keys are a no-op.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Every key currently stored in the bucket.
    async fn keys(&self) -> Result<Vec<String>>;
}
