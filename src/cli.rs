//! Command-line interface: run the webhook server or replay one event.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// hire-sync: provisions HiBob employees from Pinpoint hire events.
#[derive(Debug, Parser)]
#[command(name = "hire-sync", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the configuration file (default: $HIRE_SYNC_CONFIG or ./hire-sync.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the webhook endpoint.
    Serve {
        /// Interface to bind, overriding the config file.
        #[arg(long)]
        host: Option<String>,

        /// Port to bind, overriding the config file.
        #[arg(long)]
        port: Option<u16>,
    },

    /// Run a single webhook payload through the workflow and print the response.
    Replay {
        /// JSON payload file, or `-` for stdin.
        file: PathBuf,

        /// Correlation id to use instead of a generated one.
        #[arg(long)]
        request_id: Option<String>,
    },
}
