//! BlobMesh metadata service binary
//!
//! Serves the five namespace/placement endpoints and runs the background
//! re-replication loop as a second long-lived task.

use blobmesh_metadata::config::MetadataConfig;
use blobmesh_metadata::node_client::HttpDataNodeClient;
use blobmesh_metadata::{http, repair, MetadataStore};
use clap::Parser;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "blobmesh-metadata")]
#[command(about = "BlobMesh metadata service: namespace, placement, liveness, repair")]
struct Cli {
    /// HTTP listen address
    #[arg(long, env = "BLOBMESH_METADATA_LISTEN_ADDR")]
    listen_addr: Option<String>,

    /// Target number of replicas per chunk
    #[arg(long, env = "BLOBMESH_REPLICATION_FACTOR")]
    replication_factor: Option<usize>,

    /// Seconds before a silent node is considered dead
    #[arg(long, env = "BLOBMESH_HEARTBEAT_TIMEOUT_SECS")]
    heartbeat_timeout_secs: Option<u64>,

    /// Seconds between re-replication cycles
    #[arg(long, env = "BLOBMESH_REREPLICATION_INTERVAL_SECS")]
    rereplication_interval_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let mut config = MetadataConfig::from_env();

    if let Some(addr) = cli.listen_addr {
        config.listen_addr = addr;
    }
    if let Some(factor) = cli.replication_factor {
        config.replication_factor = factor;
    }
    if let Some(secs) = cli.heartbeat_timeout_secs {
        config.heartbeat_timeout = std::time::Duration::from_secs(secs);
    }
    if let Some(secs) = cli.rereplication_interval_secs {
        config.rereplication_interval = std::time::Duration::from_secs(secs);
    }

    info!(
        listen_addr = %config.listen_addr,
        replication_factor = config.replication_factor,
        heartbeat_timeout = ?config.heartbeat_timeout,
        rereplication_interval = ?config.rereplication_interval,
        "starting blobmesh-metadata"
    );

    let store = Arc::new(MetadataStore::new(config.clone()));
    let node_client = Arc::new(HttpDataNodeClient::new(config.io_timeout));

    let repair_store = store.clone();
    let repair_interval = config.rereplication_interval;
    tokio::spawn(async move {
        repair::run(repair_store, node_client, repair_interval).await;
    });

    let app = http::router(store);
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!(addr = %config.listen_addr, "metadata service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("metadata service stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install sigterm handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
