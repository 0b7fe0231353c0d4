//! Error types for the bucket blob store

use std::fmt;

#[derive(Debug)]
pub enum BlobStoreError {
    Io(Box<std::io::Error>),
    Metadata(Box<serde_json::Error>),
    InvalidBucketName(String),
}

impl fmt::Display for BlobStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlobStoreError::Io(err) => write!(f, "IO error: {}", err),
            BlobStoreError::Metadata(err) => write!(f, "Metadata error: {}", err),
            BlobStoreError::InvalidBucketName(name) => {
                write!(f, "Invalid bucket name: {}", name)
            }
        }
    }
}

impl std::error::Error for BlobStoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BlobStoreError::Io(err) => Some(err.as_ref()),
            BlobStoreError::Metadata(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BlobStoreError {
    fn from(err: std::io::Error) -> Self {
        BlobStoreError::Io(Box::new(err))
    }
}

impl From<serde_json::Error> for BlobStoreError {
    fn from(err: serde_json::Error) -> Self {
        BlobStoreError::Metadata(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, BlobStoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_bucket_name_display() {
        let err = BlobStoreError::InvalidBucketName("../escape".to_string());
        assert_eq!(format!("{}", err), "Invalid bucket name: ../escape");
    }

    #[test]
    fn test_io_error_display() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = BlobStoreError::from(io);
        assert!(format!("{}", err).starts_with("IO error:"));
    }

    #[test]
    fn test_error_is_debug() {
        let err = BlobStoreError::InvalidBucketName("x".to_string());
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("InvalidBucketName"));
    }
}
