//! Named-bucket blob storage
//!
//! Blobs are grouped into named buckets, each bucket a flat key -> bytes
//! map. Ships a file-backed implementation and an in-memory one for tests
//! and embedded use.

pub mod error;
pub mod file;
pub mod memory;
pub mod store;
pub mod types;

pub use error::{BlobStoreError, Result};
pub use file::FileBucketStore;
pub use memory::MemoryBucketStore;
pub use store::{BlobStore, Bucket};
pub use types::{BlobMeta, StoredBlob};
