//! Tabby Binary Entry Point

use anyhow::Context;
use clap::Parser;
use tabby::{logging::init_logging, run, Cli};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let guard = init_logging(&cli.logging_config()).context("failed to initialize logging")?;

    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received, stopping requests...");
            signal_token.cancel();
        }
    });

    let code = run(&cli, cancel).await;

    // Flush the file writer before exiting
    drop(guard);
    std::process::exit(code);
}
