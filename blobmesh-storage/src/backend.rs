//! Storage backend trait
//!
//! Defines the interface every chunk store on a data node must follow.

use async_trait::async_trait;
use blobmesh_core::{ChunkId, Result};
use bytes::Bytes;

/// Async storage backend for chunk bytes.
///
/// Implementations must be `Send + Sync` since a data node shares one
/// instance across every request handler.
#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// Store a chunk, overwriting any existing data under the same id.
    async fn put(&self, id: &ChunkId, data: Bytes) -> Result<()>;

    /// Retrieve a chunk's bytes, or `None` if not present on this node.
    async fn get(&self, id: &ChunkId) -> Result<Option<Bytes>>;

    /// List every chunk id currently stored on this node.
    async fn list_chunks(&self) -> Result<Vec<ChunkId>>;
}
