//! In-memory table rows and wire types for the metadata service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A registered data node's host/liveness/reported-chunk state.
///
/// `reported_chunks` is the node's own view, refreshed wholesale by every
/// heartbeat. It is kept separate from placement intent: the two are
/// reconciled only by the repair loop, and only loosely.
#[derive(Debug, Clone)]
pub struct DataNodeRecord {
    pub node_id: String,
    pub host: String,
    pub port: u16,
    pub last_heartbeat: DateTime<Utc>,
    pub reported_chunks: HashSet<String>,
}

impl DataNodeRecord {
    pub fn is_alive(&self, now: DateTime<Utc>, timeout: chrono::Duration) -> bool {
        now - self.last_heartbeat < timeout
    }
}

/// A node reference as returned to clients in placement responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeRef {
    pub node_id: String,
    pub host: String,
    pub port: u16,
}

// ---- /register_datanode ----

#[derive(Debug, Deserialize)]
pub struct RegisterDataNodeRequest {
    pub node_id: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}

// ---- /heartbeat ----

#[derive(Debug, Deserialize)]
pub struct HeartbeatRequest {
    pub node_id: String,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub chunks: Vec<String>,
}

// ---- /upload_request ----

#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    pub filename: String,
    pub num_chunks: usize,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub filename: String,
    pub chunk_ids: Vec<String>,
    pub chunk_mapping: std::collections::HashMap<String, Vec<NodeRef>>,
}

// ---- /download_metadata ----

#[derive(Debug, Deserialize)]
pub struct DownloadMetadataQuery {
    pub filename: String,
}

#[derive(Debug, Serialize)]
pub struct ChunkLocation {
    pub chunk_id: String,
    pub nodes: Vec<NodeRef>,
}

#[derive(Debug, Serialize)]
pub struct DownloadMetadataResponse {
    pub filename: String,
    pub chunks: Vec<ChunkLocation>,
}

// ---- /list_files ----

#[derive(Debug, Serialize)]
pub struct ListFilesResponse {
    pub files: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_liveness() {
        let now = Utc::now();
        let record = DataNodeRecord {
            node_id: "n1".into(),
            host: "127.0.0.1".into(),
            port: 9000,
            last_heartbeat: now - chrono::Duration::seconds(20),
            reported_chunks: HashSet::new(),
        };
        assert!(!record.is_alive(now, chrono::Duration::seconds(15)));

        let fresh = DataNodeRecord {
            last_heartbeat: now - chrono::Duration::seconds(1),
            ..record
        };
        assert!(fresh.is_alive(now, chrono::Duration::seconds(15)));
    }
}
