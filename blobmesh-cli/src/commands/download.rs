//! Download command
//!
//! Fetches a file's chunk placement and, for each chunk, tries its
//! replicas in order until one returns bytes. Fails only once every
//! replica of some chunk has been tried and none answered.

use crate::client::{ClientError, MetadataClient};
use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::symbols;

pub async fn run(client: &MetadataClient, filename: &str, out_path: &Path) -> Result<()> {
    let metadata = client
        .download_metadata(filename)
        .await
        .context("download_metadata failed")?;

    let pb = ProgressBar::new(metadata.chunks.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks")
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut out = File::create(out_path).await?;

    for chunk in &metadata.chunks {
        let mut fetched = None;
        for node in &chunk.nodes {
            match client.get_chunk(node, &chunk.chunk_id).await {
                Ok(Some(bytes)) => {
                    fetched = Some(bytes);
                    break;
                }
                Ok(None) => continue,
                Err(_) => continue,
            }
        }

        let bytes = fetched.ok_or_else(|| ClientError::ChunkUnreachable(chunk.chunk_id.clone()))?;
        out.write_all(&bytes).await?;
        pb.inc(1);
    }

    out.flush().await?;
    pb.finish_with_message("download complete");

    println!(
        "{} {} -> {}",
        style(symbols::CHECK).green(),
        filename,
        out_path.display()
    );

    Ok(())
}
