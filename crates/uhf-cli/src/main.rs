//! uhf - drive the handheld reader session from the command line

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use uhf_reader::ReaderConfig;

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = ReaderConfig {
        poll_interval_ms: cli.poll_interval_ms,
        ..ReaderConfig::default()
    };
    config.validate()?;
    debug!("Reader config: {:?}", config);

    match cli.command {
        Commands::Scan {
            tags,
            duration_ms,
            power,
            region,
        } => {
            commands::scan(
                config,
                &tags,
                Duration::from_millis(duration_ms),
                power,
                region.as_deref(),
            )
            .await
        }
        Commands::Once { tags, timeout_ms } => commands::once(config, &tags, timeout_ms).await,
        Commands::Barcode { data, timeout_ms } => commands::barcode(&data, timeout_ms),
        Commands::Button { key, presses } => commands::button(config, key, presses).await,
    }
}

/// Setup logging on stderr; RUST_LOG overrides the verbosity flag.
fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
