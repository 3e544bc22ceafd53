//! Chunk identifiers
//!
//! A chunk id is not content-addressed in BlobMesh — it is derived purely
//! from the owning file's name and the chunk's position: `<filename>_chunk_<i>`.
//! Because filenames are unique in the File table, this makes chunk ids
//! globally unique without a separate allocator and lets the service
//! reconstruct a file's chunk id sequence from just its name and chunk count.

use crate::error::{BlobMeshError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A chunk identifier of the form `<filename>_chunk_<index>`.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChunkId(String);

impl ChunkId {
    /// Build the chunk id for the `index`-th chunk of `filename`.
    pub fn new(filename: &str, index: usize) -> Self {
        Self(format!("{filename}_chunk_{index}"))
    }

    /// Build the full, ordered sequence of chunk ids for a file with
    /// `num_chunks` chunks.
    pub fn sequence(filename: &str, num_chunks: usize) -> Vec<Self> {
        (0..num_chunks).map(|i| Self::new(filename, i)).collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split a chunk id back into its owning filename and index.
    ///
    /// This is the inverse of [`ChunkId::new`] and relies on the same
    /// `_chunk_<i>` suffix convention.
    pub fn parse(&self) -> Result<(String, usize)> {
        let (filename, idx) = self
            .0
            .rsplit_once("_chunk_")
            .ok_or_else(|| BlobMeshError::InvalidChunkId(self.0.clone()))?;
        let index: usize = idx
            .parse()
            .map_err(|_| BlobMeshError::InvalidChunkId(self.0.clone()))?;
        Ok((filename.to_string(), index))
    }
}

impl From<String> for ChunkId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ChunkId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Debug for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkId({})", self.0)
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
