//! HTTP client for talking to data nodes
//!
//! Used only by the repair loop (fetch-then-push during re-replication).
//! Wrapped behind a trait so the repair loop can be tested against a fake
//! without a real network.

use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use tracing::warn;

#[async_trait]
pub trait DataNodeClient: Send + Sync {
    async fn get_chunk(&self, host: &str, port: u16, chunk_id: &str) -> Option<Bytes>;
    async fn store_chunk(&self, host: &str, port: u16, chunk_id: &str, data: Bytes) -> bool;
}

/// Real data node client over HTTP.
pub struct HttpDataNodeClient {
    client: reqwest::Client,
}

impl HttpDataNodeClient {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build reqwest client");
        Self { client }
    }
}

#[async_trait]
impl DataNodeClient for HttpDataNodeClient {
    async fn get_chunk(&self, host: &str, port: u16, chunk_id: &str) -> Option<Bytes> {
        let url = format!("http://{host}:{port}/get_chunk");
        match self
            .client
            .get(&url)
            .query(&[("chunk_id", chunk_id)])
            .send()
            .await
        {
            Ok(resp) if resp.status().is_success() => resp.bytes().await.ok(),
            Ok(resp) => {
                warn!(chunk = chunk_id, status = %resp.status(), "get_chunk non-success");
                None
            }
            Err(e) => {
                warn!(chunk = chunk_id, error = %e, "get_chunk failed");
                None
            }
        }
    }

    async fn store_chunk(&self, host: &str, port: u16, chunk_id: &str, data: Bytes) -> bool {
        let url = format!("http://{host}:{port}/store_chunk");
        match self
            .client
            .post(&url)
            .query(&[("chunk_id", chunk_id)])
            .body(data)
            .send()
            .await
        {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                warn!(chunk = chunk_id, status = %resp.status(), "store_chunk non-success");
                false
            }
            Err(e) => {
                warn!(chunk = chunk_id, error = %e, "store_chunk failed");
                false
            }
        }
    }
}
