//! Command-line interface definitions and parsing

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Inventory poll interval in milliseconds
    #[arg(long, env = "UHF_POLL_INTERVAL_MS", default_value_t = 30, global = true)]
    pub poll_interval_ms: u64,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run continuous inventory against a simulated tag field
    Scan {
        /// EPCs (hex) present in the simulated field
        #[arg(short, long = "tag", value_name = "EPC")]
        tags: Vec<String>,
        /// How long to keep reading, in milliseconds
        #[arg(short, long, default_value_t = 200)]
        duration_ms: u64,
        /// Read and write power in dBm
        #[arg(short, long)]
        power: Option<i32>,
        /// Region name: USA, EU, CHN or KOREA (unknown names fall back to USA)
        #[arg(short, long)]
        region: Option<String>,
    },
    /// Run one timed inventory round and print the tags seen
    Once {
        /// EPCs (hex) present in the simulated field
        #[arg(short, long = "tag", value_name = "EPC")]
        tags: Vec<String>,
        /// Round timeout in milliseconds
        #[arg(long, default_value_t = 100)]
        timeout_ms: u16,
    },
    /// Trigger a barcode scan and print the decoded result
    Barcode {
        /// Text the simulated decoder returns
        data: String,
        /// Scan timeout in milliseconds (whole seconds, 1000 to 10000)
        #[arg(long)]
        timeout_ms: Option<u32>,
    },
    /// Press the physical trigger and print the resulting button events
    Button {
        /// Key code to press
        #[arg(short, long, default_value_t = 134)]
        key: u16,
        /// Number of press/release cycles
        #[arg(short, long, default_value_t = 2)]
        presses: usize,
    },
}
