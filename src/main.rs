//! The main entry point for the looplog binary.
use anyhow::Result;

/// Runs either the log service or the dashboard, depending on the
/// subcommand.
#[tokio::main]
async fn main() -> Result<()> {
    looplog::app::launch().await
}
