//! Gateway configuration and wire types

use serde::Serialize;
use std::path::PathBuf;

/// Configuration for the asset gateway
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub port: u16,
    pub cache_dir: PathBuf,
    pub manifest_path: PathBuf,
    pub asset_base_url: String,
    pub bucket_prefix: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: 3002,
            cache_dir: PathBuf::from("./cache/assets"),
            manifest_path: PathBuf::from("./asset-manifest.json"),
            asset_base_url: "http://localhost:3000/".to_string(),
            bucket_prefix: "static-assets".to_string(),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub ready: bool,
    pub cached_assets: usize,
    pub uptime_secs: u64,
}
