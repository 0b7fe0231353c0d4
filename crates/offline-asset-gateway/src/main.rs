//! Offline asset gateway - versioned static-asset cache in front of an origin
//!
//! On startup the gateway plays the install lifecycle (populate the current
//! manifest version's bucket) and the activate lifecycle (prune superseded
//! version buckets), then serves assets cache-first with network fallback.

mod error;
mod server;
mod types;

use crate::error::{GatewayError, Result};
use crate::server::{start_server, ServerState, SharedState};
use crate::types::GatewayConfig;
use blob_bucket_store::FileBucketStore;
use offline_asset_cache::{AssetManifest, HttpAssetFetcher, LifecycleAdapter};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};
use url::Url;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let env_filter =
        EnvFilter::from_default_env().add_directive("offline_asset_gateway=info".parse()?);

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    };

    info!("Starting offline asset gateway...");

    // Load configuration from environment
    let config = load_config();
    info!("Port: {}", config.port);
    info!("Cache dir: {:?}", config.cache_dir);
    info!("Manifest: {:?}", config.manifest_path);
    info!("Asset origin: {}", config.asset_base_url);

    // Load the asset manifest supplied by the deploying party
    let manifest_json = tokio::fs::read_to_string(&config.manifest_path).await?;
    let manifest = AssetManifest::from_json(&manifest_json)?;
    info!(
        version = %manifest.version,
        assets = manifest.assets.len(),
        "Loaded asset manifest"
    );

    // Create store and fetcher
    let store = FileBucketStore::new(&config.cache_dir);
    store.init().await?;

    let base_url = Url::parse(&config.asset_base_url)
        .map_err(|e| GatewayError::Config(format!("Invalid ASSET_BASE_URL: {}", e)))?;
    let fetcher = Arc::new(HttpAssetFetcher::new(base_url));

    let adapter =
        LifecycleAdapter::new(Arc::new(store), fetcher, manifest, &config.bucket_prefix).await?;

    // Install: populate must complete before the gateway starts serving
    adapter.on_install().await?;
    info!("Install complete");

    // Activate: prune buckets of superseded versions, best-effort
    let removed = adapter.on_activate().await;
    info!(removed, "Activate complete");

    // Create shared state and start the HTTP server (blocking)
    let state: SharedState = Arc::new(ServerState::new(adapter));
    start_server(state, config.port)
        .await
        .map_err(|e| GatewayError::Config(format!("Server error: {}", e)))?;

    Ok(())
}

fn load_config() -> GatewayConfig {
    let defaults = GatewayConfig::default();

    let port = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(defaults.port);

    let cache_dir = std::env::var("CACHE_DIR")
        .map(PathBuf::from)
        .unwrap_or(defaults.cache_dir);

    let manifest_path = std::env::var("MANIFEST_PATH")
        .map(PathBuf::from)
        .unwrap_or(defaults.manifest_path);

    let asset_base_url = std::env::var("ASSET_BASE_URL").unwrap_or(defaults.asset_base_url);

    let bucket_prefix = std::env::var("BUCKET_PREFIX").unwrap_or(defaults.bucket_prefix);

    GatewayConfig {
        port,
        cache_dir,
        manifest_path,
        asset_base_url,
        bucket_prefix,
    }
}
