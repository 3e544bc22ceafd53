//! BlobMesh CLI
//!
//! Thin client driver for the distributed blob store.
//!
//! # Commands
//! - `upload` - Split a file into chunks and push them to data nodes
//! - `download` - Reassemble a file from its chunk replicas
//! - `ls` - List files known to the metadata service

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod client;
mod commands;
mod config;
mod symbols;

use client::MetadataClient;
use config::CliConfig;

#[derive(Parser)]
#[command(name = "blobmesh")]
#[command(about = "BlobMesh distributed blob store client")]
#[command(version)]
struct Cli {
    /// Metadata service URL (overrides METADATA_SERVER)
    #[arg(long, global = true)]
    metadata_server: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a file, chunk by chunk
    Upload {
        /// Path to the file to upload
        path: PathBuf,
    },

    /// Download a file to a local path
    Download {
        /// Name the file was uploaded under
        filename: String,
        /// Where to write the reassembled file
        out_path: PathBuf,
    },

    /// List files known to the metadata service
    Ls,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut config = CliConfig::from_env();
    if let Some(addr) = cli.metadata_server {
        config.metadata_addr = addr;
    }

    let client = MetadataClient::new(config.metadata_addr);

    match cli.command {
        Commands::Upload { path } => commands::upload::run(&client, &path).await,
        Commands::Download { filename, out_path } => {
            commands::download::run(&client, &filename, &out_path).await
        }
        Commands::Ls => commands::list::run(&client).await,
    }
}
