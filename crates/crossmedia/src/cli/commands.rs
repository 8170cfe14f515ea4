//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Crossmedia - signed, time-limited media access across domains
#[derive(Parser, Debug)]
#[command(name = "crossmedia")]
#[command(
    about = "Signed, time-limited media access across web and media domains",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file layered over the bundled defaults
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the media listed in a catalog
    Serve {
        /// Path to the catalog TOML file
        #[arg(long)]
        catalog: PathBuf,

        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8000")]
        bind: SocketAddr,

        /// Request header carrying the authenticated user name
        #[arg(long, default_value = "x-remote-user")]
        identity_header: String,
    },

    /// Print a token for a URL path
    Sign {
        /// URL path to sign, e.g. /attachment/report.pdf
        path: String,
    },

    /// Check a token against a URL path
    Verify {
        /// URL path the token was issued for
        path: String,

        /// The token
        token: String,

        /// Maximum token age in seconds, defaults to the configured lifetime
        #[arg(long)]
        max_age: Option<u64>,
    },
}
