//! Metadata and data node HTTP client
//!
//! Thin wrapper over the five metadata endpoints and the two data node
//! endpoints. The CLI owns no retry or fallback logic beyond the bare
//! minimum: upload fans a chunk out to every node in its mapping and
//! keeps going on individual failures, download tries a chunk's
//! replicas in order until one answers.

use bytes::Bytes;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("metadata service error ({status}): {message}")]
    Api { status: StatusCode, message: String },

    #[error("no replica of chunk {0} could be reached")]
    ChunkUnreachable(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRef {
    pub node_id: String,
    pub host: String,
    pub port: u16,
}

impl NodeRef {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Serialize)]
struct UploadRequest<'a> {
    filename: &'a str,
    num_chunks: usize,
}

#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    pub filename: String,
    pub chunk_ids: Vec<String>,
    pub chunk_mapping: std::collections::HashMap<String, Vec<NodeRef>>,
}

#[derive(Debug, Deserialize)]
pub struct ChunkLocation {
    pub chunk_id: String,
    pub nodes: Vec<NodeRef>,
}

#[derive(Debug, Deserialize)]
pub struct DownloadMetadataResponse {
    pub filename: String,
    pub chunks: Vec<ChunkLocation>,
}

#[derive(Debug, Deserialize)]
pub struct ListFilesResponse {
    pub files: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for the metadata service and the data nodes it names.
pub struct MetadataClient {
    http: Client,
    metadata_addr: String,
}

impl MetadataClient {
    pub fn new(metadata_addr: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build http client");
        Self {
            http,
            metadata_addr: metadata_addr.into(),
        }
    }

    pub async fn upload_request(&self, filename: &str, num_chunks: usize) -> Result<UploadResponse> {
        let url = format!("{}/upload_request", self.metadata_addr);
        let resp = self
            .http
            .post(&url)
            .json(&UploadRequest { filename, num_chunks })
            .send()
            .await?;
        Self::parse_json(resp).await
    }

    pub async fn download_metadata(&self, filename: &str) -> Result<DownloadMetadataResponse> {
        let url = format!("{}/download_metadata", self.metadata_addr);
        let resp = self
            .http
            .get(&url)
            .query(&[("filename", filename)])
            .send()
            .await?;
        Self::parse_json(resp).await
    }

    pub async fn list_files(&self) -> Result<ListFilesResponse> {
        let url = format!("{}/list_files", self.metadata_addr);
        let resp = self.http.get(&url).send().await?;
        Self::parse_json(resp).await
    }

    /// Push a chunk's bytes to one data node. Returns `Ok(true)` on success,
    /// `Ok(false)` on any non-success response, and only errs on a
    /// transport-level failure.
    pub async fn store_chunk(&self, node: &NodeRef, chunk_id: &str, bytes: Bytes) -> Result<bool> {
        let url = format!("{}/store_chunk", node.base_url());
        let resp = self
            .http
            .post(&url)
            .query(&[("chunk_id", chunk_id)])
            .body(bytes)
            .send()
            .await?;
        Ok(resp.status().is_success())
    }

    /// Fetch a chunk's bytes from one data node. Returns `Ok(None)` if the
    /// node doesn't have it (404) or otherwise responds with an error.
    pub async fn get_chunk(&self, node: &NodeRef, chunk_id: &str) -> Result<Option<Bytes>> {
        let url = format!("{}/get_chunk", node.base_url());
        let resp = self
            .http
            .get(&url)
            .query(&[("chunk_id", chunk_id)])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Ok(None);
        }
        Ok(Some(resp.bytes().await?))
    }

    async fn parse_json<T: for<'de> Deserialize<'de>>(resp: reqwest::Response) -> Result<T> {
        let status = resp.status();
        if status.is_success() {
            Ok(resp.json().await?)
        } else {
            let message = resp
                .json::<ErrorBody>()
                .await
                .map(|b| b.error)
                .unwrap_or_else(|_| status.to_string());
            Err(ClientError::Api { status, message })
        }
    }
}
