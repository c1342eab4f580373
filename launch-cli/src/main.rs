//! Bags Launch Command-Line Interface
//!
//! Entry point for the launch-cli binary.

use launch_cli::run_cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    run_cli().await
}
