//! BlobMesh data node daemon
//!
//! Stores chunk bytes as individual files under a configurable directory
//! and reports its chunk list to the metadata service on a fixed interval.

use blobmesh_node::config::NodeConfig;
use blobmesh_node::{heartbeat, http};
use blobmesh_storage::{ChunkStore, DiskStore};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "blobmesh-node")]
#[command(about = "BlobMesh data node: chunk storage and heartbeats")]
struct Cli {
    /// Node identity this node registers and heartbeats under
    #[arg(long, env = "NODE_ID")]
    node_id: Option<String>,

    /// Host other components use to reach this node
    #[arg(long, env = "HOST")]
    host: Option<String>,

    /// Port the chunk HTTP server binds to
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Directory chunks are persisted under
    #[arg(long, env = "STORAGE_DIR")]
    data_dir: Option<PathBuf>,

    /// Address of the metadata service
    #[arg(long, env = "METADATA_SERVER")]
    metadata_addr: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let mut config = NodeConfig::from_env();

    if let Some(id) = cli.node_id {
        config.node_id = id;
    }
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(addr) = cli.metadata_addr {
        config.metadata_addr = addr;
    }

    info!(
        node_id = %config.node_id,
        data_dir = ?config.data_dir,
        metadata_addr = %config.metadata_addr,
        "starting blobmesh-node"
    );

    let store: Arc<dyn ChunkStore> = Arc::new(DiskStore::open(&config.data_dir).await?);
    let http_client = reqwest::Client::new();

    heartbeat::register(
        &http_client,
        &config.metadata_addr,
        &config.node_id,
        &config.host,
        config.port,
    )
    .await;

    tokio::spawn(heartbeat::run(
        http_client,
        config.metadata_addr.clone(),
        config.node_id.clone(),
        config.host.clone(),
        config.port,
        store.clone(),
        config.heartbeat_interval,
    ));

    let app = http::router(store);
    let listen_addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    info!(addr = %listen_addr, "data node listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("data node stopped");
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
