//! `trellisctl` — command-line client for Trillian transparency logs.
//!
//! Results are printed to stdout as JSON; diagnostics go to stderr.
//!
//! # Usage
//!
//! ```text
//! trellisctl logs                              # list logs
//! trellisctl create-log audit -d "audit trail" # create a log
//! trellisctl init 6962                         # initialize it
//! trellisctl queue 6962 '{"user":"ada","action":"login"}'
//! trellisctl size 6962                         # current tree size
//! trellisctl leaves 6962 0 100                 # leaves [0, 100)
//! trellisctl recent 6962 -n 5                  # five newest leaves
//! trellisctl proof 6962 10 20                  # consistency proof
//! trellisctl -c trellis.toml --host 10.0.0.7 root 6962
//! ```

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use trellis_types::TreeId;

use config::CliConfig;

// -----------------------------------------------------------------------
// CLI definition
// -----------------------------------------------------------------------

#[derive(Parser)]
#[command(
    name = "trellisctl",
    version,
    about = "Command-line client for Trillian transparency logs"
)]
struct Cli {
    /// Path to TOML config file.
    #[arg(short, long, global = true, env = "TRELLIS_CONFIG")]
    config: Option<PathBuf>,

    /// Override the log service host.
    #[arg(long, global = true)]
    host: Option<String>,

    /// Override the log service port.
    #[arg(long, global = true)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List logs.
    Logs,

    /// Create a log with the standard configuration.
    CreateLog {
        /// Display name.
        name: String,

        /// Free-form description.
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Delete a log.
    DeleteLog { tree_id: TreeId },

    /// Show a log's metadata.
    GetLog { tree_id: TreeId },

    /// Show a log's public key.
    PublicKey { tree_id: TreeId },

    /// Initialize a freshly created log.
    Init { log_id: TreeId },

    /// Show the latest signed log root.
    Root { log_id: TreeId },

    /// Show the current tree size.
    Size { log_id: TreeId },

    /// Fetch leaves with indexes in [start, end), at most 1024.
    Leaves {
        log_id: TreeId,
        start: u64,
        end: u64,
        /// Also print the signed root the leaves were served under.
        #[arg(long)]
        with_root: bool,
    },

    /// Fetch `count` leaves from `start`, at most 1024.
    Range {
        log_id: TreeId,
        start: u64,
        count: u64,
    },

    /// Fetch the most recent leaves.
    Recent {
        log_id: TreeId,

        /// Number of leaves.
        #[arg(short = 'n', long, default_value = "10")]
        count: u64,
    },

    /// Fetch a consistency proof between two tree sizes.
    Proof {
        log_id: TreeId,
        first_tree_size: u64,
        second_tree_size: u64,
    },

    /// Queue a record (a flat JSON object) or, with --raw, a literal string.
    Queue {
        log_id: TreeId,
        record: String,

        /// Queue the argument bytes as-is instead of canonicalizing them.
        #[arg(long)]
        raw: bool,
    },
}

// -----------------------------------------------------------------------
// Entrypoint
// -----------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = CliConfig::load(cli.config.as_deref()).context("failed to load config")?;
    if let Some(host) = cli.host {
        config.service.host = host;
    }
    if let Some(port) = cli.port {
        config.service.port = port;
    }

    setup_tracing(&config.log.level);

    commands::run(cli.command, &config).await
}

fn setup_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
