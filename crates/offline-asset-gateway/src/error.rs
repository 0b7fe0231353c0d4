//! Error types for the asset gateway

use std::fmt;

#[derive(Debug)]
pub enum GatewayError {
    Cache(offline_asset_cache::CacheError),
    Store(blob_bucket_store::BlobStoreError),
    Io(Box<std::io::Error>),
    Config(String),
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::Cache(err) => write!(f, "Cache error: {}", err),
            GatewayError::Store(err) => write!(f, "Store error: {}", err),
            GatewayError::Io(err) => write!(f, "IO error: {}", err),
            GatewayError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for GatewayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GatewayError::Cache(err) => Some(err),
            GatewayError::Store(err) => Some(err),
            GatewayError::Io(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<offline_asset_cache::CacheError> for GatewayError {
    fn from(err: offline_asset_cache::CacheError) -> Self {
        GatewayError::Cache(err)
    }
}

impl From<blob_bucket_store::BlobStoreError> for GatewayError {
    fn from(err: blob_bucket_store::BlobStoreError) -> Self {
        GatewayError::Store(err)
    }
}

impl From<std::io::Error> for GatewayError {
    fn from(err: std::io::Error) -> Self {
        GatewayError::Io(Box::new(err))
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Config(format!("Invalid manifest: {}", err))
    }
}

impl From<tracing_subscriber::filter::ParseError> for GatewayError {
    fn from(err: tracing_subscriber::filter::ParseError) -> Self {
        GatewayError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = GatewayError::Config("missing MANIFEST_PATH".to_string());
        assert_eq!(
            format!("{}", err),
            "Configuration error: missing MANIFEST_PATH"
        );
    }

    #[test]
    fn test_cache_error_display() {
        let err = GatewayError::Cache(offline_asset_cache::CacheError::Unavailable {
            key: "./index.html".to_string(),
        });
        assert!(format!("{}", err).contains("./index.html"));
    }

    #[test]
    fn test_error_is_debug() {
        let err = GatewayError::Config("test".to_string());
        assert!(format!("{:?}", err).contains("Config"));
    }
}
