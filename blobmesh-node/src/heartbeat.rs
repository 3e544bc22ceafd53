//! Registration and heartbeat sender
//!
//! On startup the node registers once with the metadata service. Afterward
//! it sends its full current chunk list on a fixed interval, forever. A
//! failed send is logged and retried on the next tick; the data node never
//! stops running because the metadata service is unreachable.

use blobmesh_storage::ChunkStore;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Serialize)]
struct RegisterDataNodeRequest<'a> {
    node_id: &'a str,
    host: &'a str,
    port: u16,
}

#[derive(Serialize)]
struct HeartbeatRequest<'a> {
    node_id: &'a str,
    host: &'a str,
    port: u16,
    chunks: Vec<String>,
}

pub async fn register(
    client: &reqwest::Client,
    metadata_addr: &str,
    node_id: &str,
    host: &str,
    port: u16,
) {
    let url = format!("{metadata_addr}/register_datanode");
    let req = RegisterDataNodeRequest { node_id, host, port };
    match client.post(&url).json(&req).send().await {
        Ok(resp) if resp.status().is_success() => debug!("registered with metadata service"),
        Ok(resp) => warn!(status = %resp.status(), "registration returned non-success"),
        Err(e) => warn!(error = %e, "registration failed"),
    }
}

pub async fn run(
    client: reqwest::Client,
    metadata_addr: String,
    node_id: String,
    host: String,
    port: u16,
    store: Arc<dyn ChunkStore>,
    interval: Duration,
) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;

        let chunks = match store.list_chunks().await {
            Ok(ids) => ids.into_iter().map(|id| id.as_str().to_string()).collect(),
            Err(e) => {
                warn!(error = %e, "failed to list local chunks for heartbeat");
                Vec::new()
            }
        };

        let url = format!("{metadata_addr}/heartbeat");
        let req = HeartbeatRequest {
            node_id: &node_id,
            host: &host,
            port,
            chunks,
        };
        match client.post(&url).json(&req).send().await {
            Ok(resp) if resp.status().is_success() => {}
            Ok(resp) => warn!(status = %resp.status(), "heartbeat returned non-success"),
            Err(e) => warn!(error = %e, "heartbeat failed"),
        }
    }
}
