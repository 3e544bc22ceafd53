//! Error types shared across BlobMesh components
//!
//! This is deliberately narrow: the metadata service, data node, and client
//! each define their own richer error enums for their own domain (see
//! `blobmesh-metadata::error`). This one only covers what `blobmesh-core`
//! itself can fail at — parsing a chunk id.

use thiserror::Error;

/// Result type alias for BlobMesh core operations
pub type Result<T> = std::result::Result<T, BlobMeshError>;

/// Unified error type for BlobMesh core operations
#[derive(Error, Debug)]
pub enum BlobMeshError {
    #[error("invalid chunk id: {0}")]
    InvalidChunkId(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
