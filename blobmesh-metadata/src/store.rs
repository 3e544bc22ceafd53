//! The metadata service's in-memory tables
//!
//! Files, ChunkPlacement, and DataNodeRecord all live behind one
//! `parking_lot::Mutex`, per the single critical-section discipline: every
//! read-modify-write sequence on any table runs entirely under the lock.
//! The one exception is the repair loop, which snapshots under the lock,
//! does its network I/O lock-free, and reacquires briefly to commit.

use crate::config::MetadataConfig;
use crate::error::{MetadataError, Result};
use crate::models::{
    ChunkLocation, DataNodeRecord, DownloadMetadataResponse, NodeRef, UploadResponse,
};
use crate::placement::choose_replicas;
use blobmesh_core::ChunkId;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use tracing::info;

#[derive(Default)]
struct Tables {
    /// filename -> ordered chunk id sequence
    files: HashMap<String, Vec<String>>,
    /// chunk id -> intent list of node ids
    placements: HashMap<String, Vec<String>>,
    nodes: HashMap<String, DataNodeRecord>,
}

pub struct MetadataStore {
    tables: Mutex<Tables>,
    config: MetadataConfig,
}

/// A snapshot of one chunk's placement state, taken for the repair loop.
pub struct RepairSnapshot {
    pub chunk_id: String,
    pub intent: Vec<String>,
    pub current_alive: Vec<String>,
    pub candidates: Vec<String>,
}

impl MetadataStore {
    pub fn new(config: MetadataConfig) -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            config,
        }
    }

    pub fn config(&self) -> &MetadataConfig {
        &self.config
    }

    fn heartbeat_timeout(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.config.heartbeat_timeout)
            .unwrap_or_else(|_| chrono::Duration::seconds(15))
    }

    // ---- Namespace & placement handlers ----

    pub fn register_node(&self, node_id: String, host: String, port: u16) {
        let mut tables = self.tables.lock();
        let now = Utc::now();
        tables
            .nodes
            .entry(node_id.clone())
            .and_modify(|rec| {
                rec.host = host.clone();
                rec.port = port;
                rec.last_heartbeat = now;
            })
            .or_insert_with(|| DataNodeRecord {
                node_id,
                host,
                port,
                last_heartbeat: now,
                reported_chunks: HashSet::new(),
            });
    }

    pub fn heartbeat(
        &self,
        node_id: String,
        host: Option<String>,
        port: Option<u16>,
        chunks: Vec<String>,
    ) {
        let mut tables = self.tables.lock();
        let now = Utc::now();
        let chunk_set: HashSet<String> = chunks.into_iter().collect();

        match tables.nodes.get_mut(&node_id) {
            Some(rec) => {
                rec.last_heartbeat = now;
                rec.reported_chunks = chunk_set;
                if let Some(host) = host {
                    rec.host = host;
                }
                if let Some(port) = port {
                    rec.port = port;
                }
            }
            None => {
                tables.nodes.insert(
                    node_id.clone(),
                    DataNodeRecord {
                        node_id,
                        host: host.unwrap_or_else(|| "unknown".to_string()),
                        port: port.unwrap_or(0),
                        last_heartbeat: now,
                        reported_chunks: chunk_set,
                    },
                );
            }
        }
    }

    pub fn upload_request(&self, filename: String, num_chunks: usize) -> Result<UploadResponse> {
        let mut tables = self.tables.lock();

        if tables.files.contains_key(&filename) {
            return Err(MetadataError::AlreadyExists(filename));
        }

        let now = Utc::now();
        let timeout = self.heartbeat_timeout();
        let alive: Vec<String> = tables
            .nodes
            .values()
            .filter(|n| n.is_alive(now, timeout))
            .map(|n| n.node_id.clone())
            .collect();

        if alive.is_empty() {
            return Err(MetadataError::NoCapacity);
        }

        let chunk_ids: Vec<String> = ChunkId::sequence(&filename, num_chunks)
            .into_iter()
            .map(|id| id.as_str().to_string())
            .collect();

        let mut chunk_mapping = HashMap::with_capacity(chunk_ids.len());
        for cid in &chunk_ids {
            let selected = choose_replicas(cid, &alive, self.config.replication_factor);
            let node_refs: Vec<NodeRef> = selected
                .iter()
                .map(|nid| {
                    let rec = &tables.nodes[*nid];
                    NodeRef {
                        node_id: rec.node_id.clone(),
                        host: rec.host.clone(),
                        port: rec.port,
                    }
                })
                .collect();
            let intent: Vec<String> = selected.iter().map(|s| s.to_string()).collect();
            tables.placements.insert(cid.clone(), intent);
            chunk_mapping.insert(cid.clone(), node_refs);
        }

        tables.files.insert(filename.clone(), chunk_ids.clone());

        info!(filename = %filename, chunks = chunk_ids.len(), nodes = alive.len(), "upload committed");

        Ok(UploadResponse {
            filename,
            chunk_ids,
            chunk_mapping,
        })
    }

    pub fn download_metadata(&self, filename: &str) -> Result<DownloadMetadataResponse> {
        let tables = self.tables.lock();
        let chunk_ids = tables
            .files
            .get(filename)
            .ok_or_else(|| MetadataError::NotFound(filename.to_string()))?;

        let now = Utc::now();
        let timeout = self.heartbeat_timeout();

        let chunks = chunk_ids
            .iter()
            .map(|cid| {
                let nodes = tables
                    .placements
                    .get(cid)
                    .map(|intent| {
                        intent
                            .iter()
                            .filter_map(|nid| tables.nodes.get(nid))
                            .filter(|rec| rec.is_alive(now, timeout))
                            .map(|rec| NodeRef {
                                node_id: rec.node_id.clone(),
                                host: rec.host.clone(),
                                port: rec.port,
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                ChunkLocation {
                    chunk_id: cid.clone(),
                    nodes,
                }
            })
            .collect();

        Ok(DownloadMetadataResponse {
            filename: filename.to_string(),
            chunks,
        })
    }

    pub fn list_files(&self) -> Vec<String> {
        self.tables.lock().files.keys().cloned().collect()
    }

    // ---- Re-replication loop support ----

    /// Snapshot `now`, the alive set, and per-chunk repair candidates.
    /// Taken entirely under the lock; the caller does all network I/O
    /// after this returns, lock-free.
    pub fn snapshot_for_repair(&self) -> (DateTime<Utc>, HashMap<String, (String, u16)>, Vec<RepairSnapshot>) {
        let tables = self.tables.lock();
        let now = Utc::now();
        let timeout = self.heartbeat_timeout();

        let alive_set: HashSet<String> = tables
            .nodes
            .values()
            .filter(|n| n.is_alive(now, timeout))
            .map(|n| n.node_id.clone())
            .collect();

        let addrs: HashMap<String, (String, u16)> = tables
            .nodes
            .values()
            .map(|n| (n.node_id.clone(), (n.host.clone(), n.port)))
            .collect();

        let factor = self.config.replication_factor;
        let mut snapshots = Vec::new();
        for (chunk_id, intent) in tables.placements.iter() {
            let current_alive: Vec<String> = intent
                .iter()
                .filter(|nid| alive_set.contains(*nid))
                .cloned()
                .collect();

            if current_alive.is_empty() || current_alive.len() >= factor {
                continue;
            }

            let intent_set: HashSet<&String> = intent.iter().collect();
            let candidates: Vec<String> = alive_set
                .iter()
                .filter(|nid| !intent_set.contains(*nid))
                .cloned()
                .collect();

            if candidates.is_empty() {
                continue;
            }

            snapshots.push(RepairSnapshot {
                chunk_id: chunk_id.clone(),
                intent: intent.clone(),
                current_alive,
                candidates,
            });
        }

        (now, addrs, snapshots)
    }

    /// Commit one successful repair push: append `target` to the chunk's
    /// intent list (if not already present) and fold it into the target
    /// node's reported-chunk set.
    pub fn commit_repair(&self, chunk_id: &str, target: &str) {
        let mut tables = self.tables.lock();
        if let Some(intent) = tables.placements.get_mut(chunk_id) {
            if !intent.iter().any(|n| n == target) {
                intent.push(target.to_string());
            }
        }
        if let Some(rec) = tables.nodes.get_mut(target) {
            rec.reported_chunks.insert(chunk_id.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MetadataStore {
        MetadataStore::new(MetadataConfig::default())
    }

    #[test]
    fn test_register_then_upload() {
        let s = store();
        s.register_node("a".into(), "h1".into(), 9001);
        s.register_node("b".into(), "h2".into(), 9002);
        s.heartbeat("a".into(), None, None, vec![]);
        s.heartbeat("b".into(), None, None, vec![]);

        let resp = s.upload_request("hello.txt".into(), 3).unwrap();
        assert_eq!(resp.chunk_ids, vec!["hello.txt_chunk_0", "hello.txt_chunk_1", "hello.txt_chunk_2"]);
        for nodes in resp.chunk_mapping.values() {
            assert_eq!(nodes.len(), 2);
            assert_ne!(nodes[0].node_id, nodes[1].node_id);
        }
    }

    #[test]
    fn test_duplicate_upload_rejected() {
        let s = store();
        s.register_node("a".into(), "h1".into(), 9001);
        s.heartbeat("a".into(), None, None, vec![]);
        s.upload_request("x".into(), 1).unwrap();

        let err = s.upload_request("x".into(), 1).unwrap_err();
        assert!(matches!(err, MetadataError::AlreadyExists(_)));
        assert_eq!(s.list_files(), vec!["x".to_string()]);
    }

    #[test]
    fn test_upload_with_no_alive_nodes() {
        let s = store();
        let err = s.upload_request("x".into(), 1).unwrap_err();
        assert!(matches!(err, MetadataError::NoCapacity));
    }

    #[test]
    fn test_download_unknown_file() {
        let s = store();
        let err = s.download_metadata("nope").unwrap_err();
        assert!(matches!(err, MetadataError::NotFound(_)));
    }

    #[test]
    fn test_download_excludes_dead_nodes() {
        let s = store();
        s.register_node("a".into(), "h1".into(), 9001);
        s.heartbeat("a".into(), None, None, vec![]);
        s.upload_request("f".into(), 1).unwrap();

        // force "a" to look dead by rewinding its heartbeat
        {
            let mut tables = s.tables.lock();
            tables.nodes.get_mut("a").unwrap().last_heartbeat =
                Utc::now() - chrono::Duration::seconds(100);
        }

        let resp = s.download_metadata("f").unwrap();
        assert_eq!(resp.chunks[0].nodes.len(), 0);
    }

    #[test]
    fn test_commit_repair_is_idempotent() {
        let s = store();
        s.register_node("a".into(), "h1".into(), 9001);
        s.register_node("b".into(), "h2".into(), 9002);
        s.heartbeat("a".into(), None, None, vec![]);

        s.upload_request("one.bin".into(), 1).unwrap();
        s.commit_repair("one.bin_chunk_0", "b");
        s.commit_repair("one.bin_chunk_0", "b");

        let resp = s.download_metadata("one.bin").unwrap();
        let alive_ids: Vec<&str> = resp.chunks[0]
            .nodes
            .iter()
            .map(|n| n.node_id.as_str())
            .collect();
        // "b" never sent a heartbeat so it won't show as alive, but the
        // intent list itself must contain it exactly once.
        let tables = s.tables.lock();
        let intent = &tables.placements["one.bin_chunk_0"];
        assert_eq!(intent.iter().filter(|n| n.as_str() == "b").count(), 1);
        drop(tables);
        let _ = alive_ids;
    }
}
