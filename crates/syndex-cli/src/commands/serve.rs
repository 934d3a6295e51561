//! Serve command handler

use std::path::Path;

use anyhow::{Context, Result};

use syndex_core::DocumentStore;

use crate::output::Output;
use crate::server;

/// Serve the feed at `path` until Ctrl+C
///
/// The feed is loaded and rewritten once before binding, so a missing file
/// is created and a corrupt one stops the server from starting.
pub async fn serve(path: &Path, host: &str, port: u16, output: &Output) -> Result<()> {
    let store = DocumentStore::new(path);
    store
        .normalize()
        .with_context(|| format!("Failed to prepare {}", path.display()))?;
    output.message(&format!("RSS file loaded or created: {}", path.display()));

    let bound = server::bind(store, host, port)?;
    output.message(&format!("Server started on port {}", port));
    output.message(&format!("Serving RSS file: {}", path.display()));
    output.message("Press Ctrl+C to stop the server");

    bound.run().await?;
    output.message("Server stopped");
    Ok(())
}
