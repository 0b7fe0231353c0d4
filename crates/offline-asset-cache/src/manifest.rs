//! Manifest and version types
//!
//! A manifest is the ordered list of resource identifiers that must be
//! cached for one version. Versions are opaque tags chosen by the
//! deploying party: the cache compares them for equality only and never
//! infers ordering between them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque manifest-generation tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(String);

impl Version {
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bucket name derived deterministically from a prefix and a version.
///
/// The prefix comes from configuration so independent caches can share
/// one store without clobbering each other's buckets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketName(String);

impl BucketName {
    pub fn derive(prefix: &str, version: &Version) -> Self {
        Self(format!("{}-{}", prefix, version.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `name` was derived from `prefix`, for any version.
    pub fn has_prefix(name: &str, prefix: &str) -> bool {
        name.strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('-'))
    }
}

impl fmt::Display for BucketName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The assets one version must keep cached
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetManifest {
    pub version: Version,
    pub assets: Vec<String>,
}

impl AssetManifest {
    pub fn new(version: Version, assets: Vec<String>) -> Self {
        Self { version, assets }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.assets.iter().any(|a| a == key)
    }
}
