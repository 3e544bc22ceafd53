//! List command
//!
//! Prints the names of every file known to the metadata service, in
//! whatever order it returns them.

use crate::client::MetadataClient;
use anyhow::{Context, Result};

pub async fn run(client: &MetadataClient) -> Result<()> {
    let response = client.list_files().await.context("list_files failed")?;

    if response.files.is_empty() {
        println!("(no files)");
        return Ok(());
    }

    for file in &response.files {
        println!("{file}");
    }

    Ok(())
}
