//! Data node configuration
//!
//! Layered like the rest of the fleet: hardcoded defaults, overridable by
//! environment variable, overridable again by CLI flag in `main.rs`.

use blobmesh_core::Defaults;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Identity this node registers and heartbeats under.
    pub node_id: String,

    /// Host other components use to reach this node.
    pub host: String,

    /// Port the chunk HTTP server binds to.
    pub port: u16,

    /// Directory chunks are persisted under, one file per chunk.
    pub data_dir: PathBuf,

    /// Address of the metadata service.
    pub metadata_addr: String,

    /// How often to send a heartbeat to the metadata service.
    pub heartbeat_interval: Duration,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            node_id: default_node_id(),
            host: "127.0.0.1".to_string(),
            port: 6001,
            data_dir: PathBuf::from("./blobmesh_data"),
            metadata_addr: "http://127.0.0.1:5050".to_string(),
            heartbeat_interval: Defaults::HEARTBEAT_INTERVAL,
        }
    }
}

fn default_node_id() -> String {
    std::env::var("NODE_ID").unwrap_or_else(|_| "node1".to_string())
}

impl NodeConfig {
    /// Start from defaults, then apply any environment variable overrides.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(id) = std::env::var("NODE_ID") {
            config.node_id = id;
        }
        if let Ok(host) = std::env::var("HOST") {
            config.host = host;
        }
        if let Some(port) = std::env::var("PORT").ok().and_then(|v| v.parse().ok()) {
            config.port = port;
        }
        if let Ok(dir) = std::env::var("STORAGE_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(addr) = std::env::var("METADATA_SERVER") {
            config.metadata_addr = addr;
        }
        if let Some(secs) = std::env::var("HEARTBEAT_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.heartbeat_interval = Duration::from_secs(secs);
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NodeConfig::default();
        assert_eq!(config.port, 6001);
        assert_eq!(config.heartbeat_interval, Duration::from_secs(5));
    }
}
