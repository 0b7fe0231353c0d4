//! Versioned offline asset cache
//!
//! Populates a named bucket per manifest version on install, prunes
//! buckets of superseded versions on activate, and serves requests
//! cache-first with network fallback and asynchronous backfill.

pub mod error;
pub mod fetch;
pub mod interceptor;
pub mod lifecycle;
pub mod manager;
pub mod manifest;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{CacheError, Result};
pub use fetch::{AssetFetcher, HttpAssetFetcher};
pub use interceptor::{AssetRequest, AssetResponse, RequestInterceptor, ServedFrom};
pub use lifecycle::LifecycleAdapter;
pub use manager::CacheManager;
pub use manifest::{AssetManifest, BucketName, Version};
