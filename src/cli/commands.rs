//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - serve: run the dashboard server (default)
//! - start/stop: control a running server
//! - status: print one snapshot
//! - watch: follow the run log from the status feed

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default dashboard address for the client subcommands
pub const DEFAULT_URL: &str = "http://localhost:3000";

/// txcycle - testnet transaction cycler with a live dashboard
#[derive(Parser, Debug)]
#[command(name = "txcycle")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log to stderr instead of the log file
    #[arg(long, global = true)]
    pub stderr: bool,

    /// Listen port (overrides config and PORT)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the dashboard server
    Serve,

    /// Ask a running server to begin a run
    Start {
        /// Dashboard base URL
        #[arg(short, long, default_value = DEFAULT_URL)]
        url: String,
    },

    /// Ask a running server to cancel its run
    Stop {
        /// Dashboard base URL
        #[arg(short, long, default_value = DEFAULT_URL)]
        url: String,
    },

    /// Print the current snapshot
    Status {
        /// Dashboard base URL
        #[arg(short, long, default_value = DEFAULT_URL)]
        url: String,
    },

    /// Follow the run log until the run ends
    Watch {
        /// Dashboard base URL
        #[arg(short, long, default_value = DEFAULT_URL)]
        url: String,
    },
}
