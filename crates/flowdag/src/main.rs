//! flowdag CLI binary.

use anyhow::Result;
use flowdag::cli::Cli;
use tracing_subscriber::EnvFilter;

/// Main entry point for the flowdag CLI.
///
/// Uses tokio's current_thread runtime; every command is a short sequence of
/// file reads and writes.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // RUST_LOG overrides, e.g. RUST_LOG=flowdag=debug,flowdag_jsonl=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("flowdag=info,flowdag_jsonl=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse_args();
    cli.execute().await?;

    tracing::debug!("flowdag completed");
    Ok(())
}
