//! In-memory chunk store
//!
//! Used for testing and for data nodes that don't need persistence across
//! restarts. Not durable.

use crate::backend::ChunkStore;
use async_trait::async_trait;
use blobmesh_core::{ChunkId, Result};
use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::HashMap;

/// In-memory chunk store backed by a `HashMap`.
#[derive(Default)]
pub struct MemoryStore {
    chunks: RwLock<HashMap<ChunkId, Bytes>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChunkStore for MemoryStore {
    async fn put(&self, id: &ChunkId, data: Bytes) -> Result<()> {
        self.chunks.write().insert(id.clone(), data);
        Ok(())
    }

    async fn get(&self, id: &ChunkId) -> Result<Option<Bytes>> {
        Ok(self.chunks.read().get(id).cloned())
    }

    async fn list_chunks(&self) -> Result<Vec<ChunkId>> {
        Ok(self.chunks.read().keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get() {
        let store = MemoryStore::new();
        let id = ChunkId::new("a.txt", 0);
        let data = Bytes::from_static(b"hello world");

        store.put(&id, data.clone()).await.unwrap();
        let retrieved = store.get(&id).await.unwrap().unwrap();
        assert_eq!(retrieved, data);
    }

    #[tokio::test]
    async fn test_put_overwrites_existing() {
        let store = MemoryStore::new();
        let id = ChunkId::new("a.txt", 0);

        store.put(&id, Bytes::from_static(b"old")).await.unwrap();
        store.put(&id, Bytes::from_static(b"new")).await.unwrap();
        assert_eq!(
            store.get(&id).await.unwrap(),
            Some(Bytes::from_static(b"new"))
        );
    }

    #[tokio::test]
    async fn test_list_chunks() {
        let store = MemoryStore::new();
        let ids = ChunkId::sequence("big.bin", 3);
        for id in &ids {
            store.put(id, Bytes::from_static(b"0123456789")).await.unwrap();
        }

        let listed = store.list_chunks().await.unwrap();
        assert_eq!(listed.len(), 3);
        for id in &ids {
            assert!(listed.contains(id));
        }
    }

    #[tokio::test]
    async fn test_missing_chunk_returns_none() {
        let store = MemoryStore::new();
        let id = ChunkId::new("missing.txt", 0);
        assert_eq!(store.get(&id).await.unwrap(), None);
    }
}
