//! CLI entry point for Gabor stimulus animations and website image tooling

use clap::Parser;
use gaborgif::io::cli::{Cli, Runner};
use tracing_subscriber::EnvFilter;

fn main() -> gaborgif::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG takes precedence over -v flags
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let runner = Runner::new(cli);
    runner.run().inspect_err(|e| tracing::error!("{e}"))
}
