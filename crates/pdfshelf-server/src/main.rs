//! pdfshelf-server - upload, organize and merge PDFs from the browser.

use anyhow::Context;
use clap::Parser;
use pdfshelf::Shelf;
use pdfshelf_server::cli::Cli;
use pdfshelf_server::{app, telemetry};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init(cli.verbose);

    let config = cli.to_config().context("invalid configuration")?;
    let bind_addr = config.bind_addr;
    let shelf = Shelf::open(config).context("failed to prepare storage directories")?;
    info!(
        uploads = %shelf.config().upload_root.display(),
        organized = %shelf.config().organized_root.display(),
        max_upload_bytes = shelf.config().max_upload_bytes,
        "storage ready"
    );

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind to {bind_addr}"))?;
    info!(addr = %bind_addr, "listening");

    axum::serve(listener, app(Arc::new(shelf)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
