//! Blob store types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A blob plus the content metadata served alongside it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub data: Vec<u8>,
    pub content_type: String,
}

impl StoredBlob {
    pub fn new(data: impl Into<Vec<u8>>, content_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            content_type: content_type.into(),
        }
    }
}

/// Sidecar metadata persisted next to each blob file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlobMeta {
    pub key: String,
    pub content_type: String,
    pub size: u64,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_blob_new() {
        let blob = StoredBlob::new(b"hello".to_vec(), "text/plain");
        assert_eq!(blob.data, b"hello");
        assert_eq!(blob.content_type, "text/plain");
    }

    #[test]
    fn test_blob_meta_serialization() {
        let meta = BlobMeta {
            key: "./index.html".to_string(),
            content_type: "text/html".to_string(),
            size: 2048,
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&meta).unwrap();
        assert!(json.contains("./index.html"));
        assert!(json.contains("text/html"));
        assert!(json.contains("2048"));

        let deserialized: BlobMeta = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.key, meta.key);
        assert_eq!(deserialized.size, meta.size);
    }
}
