//! Network asset fetching

use crate::error::{CacheError, Result};
use async_trait::async_trait;
use blob_bucket_store::StoredBlob;
use reqwest::Client;
use tracing::debug;
use url::Url;

/// Network side of the cache: turns a manifest identifier into bytes
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    async fn fetch(&self, key: &str) -> Result<StoredBlob>;
}

/// HTTP fetcher that resolves relative identifiers against a base URL.
///
/// Manifests mix same-origin paths ("./index.html") with absolute CDN
/// URLs; absolute identifiers are fetched as-is.
pub struct HttpAssetFetcher {
    client: Client,
    base_url: Url,
}

impl HttpAssetFetcher {
    pub fn new(base_url: Url) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    fn resolve(&self, key: &str) -> Result<Url> {
        if let Ok(url) = Url::parse(key) {
            return Ok(url);
        }
        self.base_url.join(key).map_err(|e| CacheError::Fetch {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl AssetFetcher for HttpAssetFetcher {
    async fn fetch(&self, key: &str) -> Result<StoredBlob> {
        let url = self.resolve(key)?;
        debug!(key, url = %url, "Fetching asset");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CacheError::Fetch {
                key: key.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(CacheError::Fetch {
                key: key.to_string(),
                reason: format!("status {}", response.status()),
            });
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();

        let data = response
            .bytes()
            .await
            .map_err(|e| CacheError::Fetch {
                key: key.to_string(),
                reason: e.to_string(),
            })?
            .to_vec();

        debug!(key, size = data.len(), content_type = %content_type, "Fetched asset");
        Ok(StoredBlob { data, content_type })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher() -> HttpAssetFetcher {
        HttpAssetFetcher::new(Url::parse("https://app.example.com/pwa/").unwrap())
    }

    #[test]
    fn test_resolve_relative_identifier() {
        let url = fetcher().resolve("./index.html").unwrap();
        assert_eq!(url.as_str(), "https://app.example.com/pwa/index.html");
    }

    #[test]
    fn test_resolve_nested_relative_identifier() {
        let url = fetcher().resolve("icons/icon-192.png").unwrap();
        assert_eq!(url.as_str(), "https://app.example.com/pwa/icons/icon-192.png");
    }

    #[test]
    fn test_resolve_absolute_identifier_passes_through() {
        let url = fetcher()
            .resolve("https://cdn.example.com/ajax/libs/pdf.js/3.4.120/pdf.min.js")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://cdn.example.com/ajax/libs/pdf.js/3.4.120/pdf.min.js"
        );
    }
}
