//! File-backed bucket store
//!
//! One directory per bucket under a root directory. Each blob lives in a
//! file named by the SHA-256 of its key, next to a JSON sidecar holding
//! the original key and content metadata so `keys()` survives restarts.
//! Puts go through a temp file and rename, atomic per key.

use crate::error::{BlobStoreError, Result};
use crate::store::{BlobStore, Bucket};
use crate::types::{BlobMeta, StoredBlob};
use async_trait::async_trait;
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, warn};

const META_SUFFIX: &str = ".meta.json";

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Temp sibling for `path`, unique per call: concurrent writers of the
/// same key must never share a temp file, or one writer's rename would
/// publish another writer's half-written bytes.
fn tmp_sibling(path: &Path) -> PathBuf {
    let n = TMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let mut name = path
        .file_name()
        .map(|s| s.to_os_string())
        .unwrap_or_default();
    name.push(format!(".{}.{}.tmp", std::process::id(), n));
    path.with_file_name(name)
}

/// Bucket store that keeps each bucket as a directory of blob files
pub struct FileBucketStore {
    root: PathBuf,
}

impl FileBucketStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Ensure the root directory exists.
    pub async fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        debug!(root = ?self.root, "Bucket store initialized");
        Ok(())
    }

    fn bucket_dir(&self, name: &str) -> Result<PathBuf> {
        // Bucket names become directory names; anything that could walk
        // out of the root is rejected.
        if name.is_empty() || name.starts_with('.') || name.contains(['/', '\\']) {
            return Err(BlobStoreError::InvalidBucketName(name.to_string()));
        }
        Ok(self.root.join(name))
    }
}

/// On-disk file name for a key: hex SHA-256, so arbitrary identifiers
/// (paths, full URLs) map to flat file names.
fn blob_file_name(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl BlobStore for FileBucketStore {
    async fn open(&self, name: &str) -> Result<Arc<dyn Bucket>> {
        let dir = self.bucket_dir(name)?;
        fs::create_dir_all(&dir).await?;
        Ok(Arc::new(FileBucket { dir }))
    }

    async fn list_buckets(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(names),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        Ok(names)
    }

    async fn delete_bucket(&self, name: &str) -> Result<()> {
        let dir = self.bucket_dir(name)?;
        match fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

struct FileBucket {
    dir: PathBuf,
}

impl FileBucket {
    fn blob_path(&self, key: &str) -> PathBuf {
        self.dir.join(blob_file_name(key))
    }

    fn meta_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}{}", blob_file_name(key), META_SUFFIX))
    }
}

#[async_trait]
impl Bucket for FileBucket {
    async fn put(&self, key: &str, blob: StoredBlob) -> Result<()> {
        let meta = BlobMeta {
            key: key.to_string(),
            content_type: blob.content_type.clone(),
            size: blob.data.len() as u64,
            created_at: Utc::now(),
        };

        // Blob first, sidecar last: a key is not visible to get()/keys()
        // until both files are in place, and each lands via rename.
        let blob_path = self.blob_path(key);
        let blob_tmp = tmp_sibling(&blob_path);
        fs::write(&blob_tmp, &blob.data).await?;
        fs::rename(&blob_tmp, &blob_path).await?;

        let meta_path = self.meta_path(key);
        let meta_tmp = tmp_sibling(&meta_path);
        fs::write(&meta_tmp, serde_json::to_vec(&meta)?).await?;
        fs::rename(&meta_tmp, &meta_path).await?;

        debug!(key, size = meta.size, "Stored blob");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<StoredBlob>> {
        let meta_bytes = match fs::read(self.meta_path(key)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let meta: BlobMeta = serde_json::from_slice(&meta_bytes)?;

        match fs::read(self.blob_path(key)).await {
            Ok(data) => Ok(Some(StoredBlob {
                data,
                content_type: meta.content_type,
            })),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(key, "Blob file missing for metadata entry");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, key: &str) -> Result<()> {
        // Sidecar first so a concurrent keys() never lists a key whose
        // blob file is already gone.
        for path in [self.meta_path(key), self.blob_path(key)] {
            match fs::remove_file(&path).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(keys),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if !name.ends_with(META_SUFFIX) {
                continue;
            }
            match fs::read(entry.path()).await {
                Ok(bytes) => match serde_json::from_slice::<BlobMeta>(&bytes) {
                    Ok(meta) => keys.push(meta.key),
                    Err(e) => warn!(file = name, error = %e, "Skipping unreadable metadata"),
                },
                Err(e) => warn!(file = name, error = %e, "Skipping unreadable metadata"),
            }
        }
        Ok(keys)
    }
}
