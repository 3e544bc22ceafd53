//! BlobMesh Data Node
//!
//! Stateless beyond the filesystem: accepts chunk PUT/GET over HTTP and
//! periodically reports the chunks it holds to the metadata service.

pub mod config;
pub mod heartbeat;
pub mod http;

pub use config::NodeConfig;
