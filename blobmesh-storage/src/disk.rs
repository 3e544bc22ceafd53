//! Disk-backed chunk store
//!
//! Every chunk is stored as exactly one file, named after its chunk id,
//! directly under the configured data directory. There is no indexing
//! layer and no write-ahead log: the filesystem namespace is the index.

use crate::backend::ChunkStore;
use async_trait::async_trait;
use blobmesh_core::{ChunkId, Result};
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Chunk store that keeps one file per chunk under `root`.
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    /// Open (creating if necessary) a disk store rooted at `root`.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    fn path_for(&self, id: &ChunkId) -> PathBuf {
        self.root.join(id.as_str())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ChunkStore for DiskStore {
    async fn put(&self, id: &ChunkId, data: Bytes) -> Result<()> {
        let path = self.path_for(id);
        tokio::fs::write(&path, &data).await?;
        debug!(chunk = %id, bytes = data.len(), "wrote chunk to disk");
        Ok(())
    }

    async fn get(&self, id: &ChunkId) -> Result<Option<Bytes>> {
        match tokio::fs::read(self.path_for(id)).await {
            Ok(bytes) => Ok(Some(Bytes::from(bytes))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_chunks(&self) -> Result<Vec<ChunkId>> {
        let mut ids = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                if let Some(name) = entry.file_name().to_str() {
                    ids.push(ChunkId::from(name));
                }
            }
        }
        Ok(ids)
    }
}
