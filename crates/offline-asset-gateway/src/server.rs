//! HTTP server bridging host events to the cache core
//!
//! Startup plays the install and activate lifecycle; every `/assets` hit
//! is a request event. `/health` reports readiness of the current
//! version's bucket.

use crate::types::HealthResponse;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use offline_asset_cache::{AssetRequest, CacheError, LifecycleAdapter, ServedFrom};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

/// Shared state for the HTTP server
pub struct ServerState {
    pub adapter: LifecycleAdapter,
    pub started_at: DateTime<Utc>,
}

impl ServerState {
    pub fn new(adapter: LifecycleAdapter) -> Self {
        Self {
            adapter,
            started_at: Utc::now(),
        }
    }
}

pub type SharedState = Arc<ServerState>;

/// Error response
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Create the HTTP router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/assets/{*path}", get(get_asset))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(state: SharedState, port: u16) -> std::io::Result<()> {
    let router = create_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await
}

/// Health check endpoint
async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let ready = state.adapter.is_ready().await;
    let cached_assets = state.adapter.cached_assets().await;
    let uptime_secs = (Utc::now() - state.started_at).num_seconds() as u64;

    Json(HealthResponse {
        status: "ok".to_string(),
        version: state.adapter.manifest().version.to_string(),
        ready,
        cached_assets,
        uptime_secs,
    })
}

/// Serve one asset through the interception policy
async fn get_asset(State(state): State<SharedState>, Path(path): Path<String>) -> Response {
    let request = AssetRequest::new(path.clone());

    match state.adapter.on_request(&request).await {
        Ok(response) => {
            let cache_header = match response.served_from {
                ServedFrom::Cache => "HIT",
                ServedFrom::Network => "MISS",
            };

            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, response.blob.content_type)
                .header("X-Cache", cache_header)
                .body(Body::from(response.blob.data))
                .unwrap()
        }
        Err(e @ CacheError::Unavailable { .. }) => {
            warn!(path = %path, error = %e, "Asset unavailable offline");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse {
                    error: "Asset unavailable".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            warn!(path = %path, error = %e, "Failed to serve asset");
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: "Failed to fetch asset".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::http::Request;
    use blob_bucket_store::{MemoryBucketStore, StoredBlob};
    use offline_asset_cache::{AssetFetcher, AssetManifest, Version};
    use tower::ServiceExt;

    /// Canned fetcher: one known asset, everything else unreachable.
    struct StubFetcher {
        key: String,
        blob: Option<StoredBlob>,
    }

    #[async_trait]
    impl AssetFetcher for StubFetcher {
        async fn fetch(&self, key: &str) -> offline_asset_cache::Result<StoredBlob> {
            if key == self.key {
                if let Some(blob) = &self.blob {
                    return Ok(blob.clone());
                }
            }
            Err(CacheError::Fetch {
                key: key.to_string(),
                reason: "connection refused".to_string(),
            })
        }
    }

    fn manifest() -> AssetManifest {
        AssetManifest::new(Version::new("v1"), vec!["index.html".to_string()])
    }

    async fn create_test_state(fetcher: StubFetcher) -> SharedState {
        let store = Arc::new(MemoryBucketStore::new());
        let adapter =
            LifecycleAdapter::new(store, Arc::new(fetcher), manifest(), "static-assets")
                .await
                .unwrap();
        Arc::new(ServerState::new(adapter))
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let state = create_test_state(StubFetcher {
            key: "index.html".to_string(),
            blob: Some(StoredBlob::new(b"<html></html>".to_vec(), "text/html")),
        })
        .await;
        state.adapter.on_install().await.unwrap();
        let router = create_router(state);

        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], "v1");
        assert_eq!(json["ready"], true);
        assert_eq!(json["cached_assets"], 1);
    }

    #[tokio::test]
    async fn test_asset_served_from_cache() {
        let state = create_test_state(StubFetcher {
            key: "index.html".to_string(),
            blob: Some(StoredBlob::new(b"<html></html>".to_vec(), "text/html")),
        })
        .await;
        state.adapter.on_install().await.unwrap();
        let router = create_router(state);

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/assets/index.html")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["X-Cache"], "HIT");
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"<html></html>");
    }

    #[tokio::test]
    async fn test_asset_miss_falls_back_to_network() {
        // No install: the bucket starts empty, so the first hit is a MISS
        let state = create_test_state(StubFetcher {
            key: "index.html".to_string(),
            blob: Some(StoredBlob::new(b"<html></html>".to_vec(), "text/html")),
        })
        .await;
        let router = create_router(state);

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/assets/index.html")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["X-Cache"], "MISS");
    }

    #[tokio::test]
    async fn test_asset_unavailable_offline() {
        let state = create_test_state(StubFetcher {
            key: "index.html".to_string(),
            blob: None,
        })
        .await;
        let router = create_router(state);

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/assets/index.html")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_unmanifested_asset_failure_is_bad_gateway() {
        let state = create_test_state(StubFetcher {
            key: "index.html".to_string(),
            blob: None,
        })
        .await;
        let router = create_router(state);

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/assets/not-in-manifest.js")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
