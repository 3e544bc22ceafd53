//! System-wide defaults
//!
//! Every constant here is a *default*: each binary's own config layer
//! (`blobmesh-metadata::config`, `blobmesh-node::config`, ...) can override
//! it from a CLI flag or environment variable. Nothing in this crate reads
//! the environment directly.

use std::time::Duration;

/// Default tuning knobs, mirroring the source system's constants.
pub struct Defaults;

impl Defaults {
    /// Target number of replicas per chunk.
    pub const REPLICATION_FACTOR: usize = 2;

    /// How often a data node sends a heartbeat.
    pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);

    /// A node is considered dead once its last heartbeat is older than this.
    pub const HEARTBEAT_TIMEOUT: Duration = Duration::from_secs(15);

    /// How often the metadata service runs its re-replication loop.
    pub const REREPLICATION_INTERVAL: Duration = Duration::from_secs(10);

    /// Fixed chunk size used by the client when splitting a file.
    pub const CHUNK_SIZE: usize = 1024 * 1024;

    /// Timeout applied to every outbound HTTP call between components.
    pub const IO_TIMEOUT: Duration = Duration::from_secs(5);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_spec() {
        assert_eq!(Defaults::REPLICATION_FACTOR, 2);
        assert_eq!(Defaults::HEARTBEAT_INTERVAL, Duration::from_secs(5));
        assert_eq!(Defaults::HEARTBEAT_TIMEOUT, Duration::from_secs(15));
        assert_eq!(Defaults::REREPLICATION_INTERVAL, Duration::from_secs(10));
        assert_eq!(Defaults::CHUNK_SIZE, 1_048_576);
    }
}
