//! Error types for the offline asset cache

use blob_bucket_store::BlobStoreError;
use std::fmt;

#[derive(Debug)]
pub enum CacheError {
    /// An asset could not be fetched or stored during install. The
    /// version's bucket must not be treated as ready; the whole manifest
    /// is retried on the next install event.
    Populate {
        version: String,
        key: String,
        reason: String,
    },
    /// A manifested asset is neither cached nor reachable over the network.
    Unavailable { key: String },
    /// A network fetch failed outside the unavailable case (pass-through
    /// requests, populate-time fetches).
    Fetch { key: String, reason: String },
    /// The storage substrate failed.
    Store(BlobStoreError),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::Populate {
                version,
                key,
                reason,
            } => write!(f, "Populate failed for version {} at {}: {}", version, key, reason),
            CacheError::Unavailable { key } => write!(f, "Asset unavailable: {}", key),
            CacheError::Fetch { key, reason } => write!(f, "Fetch failed for {}: {}", key, reason),
            CacheError::Store(err) => write!(f, "Store error: {}", err),
        }
    }
}

impl std::error::Error for CacheError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CacheError::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BlobStoreError> for CacheError {
    fn from(err: BlobStoreError) -> Self {
        CacheError::Store(err)
    }
}

pub type Result<T> = std::result::Result<T, CacheError>;
