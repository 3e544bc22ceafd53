//! Upload command
//!
//! Splits a file into fixed-size chunks, asks the metadata service where
//! each chunk should live, then pushes every chunk to every node in its
//! mapping. A failed push to one node is logged and does not abort the
//! upload — replication for that chunk is simply left under-target and
//! the repair loop fills it back in later.

use crate::client::MetadataClient;
use anyhow::{Context, Result};
use blobmesh_core::Defaults;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

use crate::symbols;

pub async fn run(client: &MetadataClient, path: &Path) -> Result<()> {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .context("path has no file name")?
        .to_string();

    let size = tokio::fs::metadata(path).await?.len();
    let num_chunks = ((size as usize) + Defaults::CHUNK_SIZE - 1) / Defaults::CHUNK_SIZE;
    let num_chunks = num_chunks.max(1);

    let upload = client
        .upload_request(&filename, num_chunks)
        .await
        .context("upload_request failed")?;

    let pb = ProgressBar::new(upload.chunk_ids.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks")
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut file = File::open(path).await?;
    let mut buf = vec![0u8; Defaults::CHUNK_SIZE];
    let mut pushed = 0usize;
    let mut failed = 0usize;

    for chunk_id in &upload.chunk_ids {
        let n = read_chunk(&mut file, &mut buf).await?;
        let bytes = bytes::Bytes::copy_from_slice(&buf[..n]);

        let nodes = upload
            .chunk_mapping
            .get(chunk_id)
            .cloned()
            .unwrap_or_default();

        for node in &nodes {
            match client.store_chunk(node, chunk_id, bytes.clone()).await {
                Ok(true) => pushed += 1,
                Ok(false) => {
                    failed += 1;
                    eprintln!(
                        "{} {} rejected by {}",
                        style(symbols::CROSS).red(),
                        chunk_id,
                        node.node_id
                    );
                }
                Err(e) => {
                    failed += 1;
                    eprintln!(
                        "{} {} -> {}: {}",
                        style(symbols::CROSS).red(),
                        chunk_id,
                        node.node_id,
                        e
                    );
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("upload complete");

    println!(
        "{} {} ({} chunks, {} pushes ok, {} failed)",
        style(symbols::CHECK).green(),
        filename,
        upload.chunk_ids.len(),
        pushed,
        failed
    );

    Ok(())
}

async fn read_chunk(file: &mut File, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = file.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}
