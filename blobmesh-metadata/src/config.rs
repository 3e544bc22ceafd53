//! Metadata service configuration
//!
//! Layered the way the rest of the fleet does it: hardcoded defaults,
//! overridable by environment variable, overridable again by CLI flag
//! (see `main.rs`).

use blobmesh_core::Defaults;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct MetadataConfig {
    /// Address the HTTP server binds to.
    pub listen_addr: String,

    /// Target number of replicas per chunk.
    pub replication_factor: usize,

    /// A node is considered dead once its last heartbeat is older than this.
    pub heartbeat_timeout: Duration,

    /// How often the repair loop runs.
    pub rereplication_interval: Duration,

    /// Timeout applied to outbound calls to data nodes.
    pub io_timeout: Duration,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:5050".to_string(),
            replication_factor: Defaults::REPLICATION_FACTOR,
            heartbeat_timeout: Defaults::HEARTBEAT_TIMEOUT,
            rereplication_interval: Defaults::REREPLICATION_INTERVAL,
            io_timeout: Defaults::IO_TIMEOUT,
        }
    }
}

impl MetadataConfig {
    /// Start from defaults, then apply any environment variable overrides.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("BLOBMESH_METADATA_LISTEN_ADDR") {
            config.listen_addr = addr;
        }
        if let Some(v) = std::env::var("BLOBMESH_REPLICATION_FACTOR")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.replication_factor = v;
        }
        if let Some(v) = std::env::var("BLOBMESH_HEARTBEAT_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.heartbeat_timeout = Duration::from_secs(v);
        }
        if let Some(v) = std::env::var("BLOBMESH_REREPLICATION_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.rereplication_interval = Duration::from_secs(v);
        }
        if let Some(v) = std::env::var("BLOBMESH_IO_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.io_timeout = Duration::from_secs(v);
        }

        config
    }
}
