//! CLI argument definitions using clap
//!
//! Commands:
//! - users-api init --config <path>
//! - users-api serve --config <path> [overrides]
//! - users-api verify --config <path>

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::store::StoreKind;

/// users-api - user CRUD service over an append-only document store
#[derive(Parser, Debug)]
#[command(name = "users-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a default configuration file and create the data directory
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./users-api.json")]
        config: PathBuf,
    },

    /// Run the HTTP server
    Serve {
        /// Path to configuration file (defaults are used if it does not exist)
        #[arg(long, default_value = "./users-api.json")]
        config: PathBuf,

        #[command(flatten)]
        overrides: ServeOverrides,
    },

    /// Verify every record checksum in the document file
    Verify {
        /// Path to configuration file
        #[arg(long, default_value = "./users-api.json")]
        config: PathBuf,
    },
}

/// Command-line values that take precedence over the configuration file.
#[derive(Args, Debug, Default, Clone)]
pub struct ServeOverrides {
    /// Host to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to
    #[arg(long)]
    pub port: Option<u16>,

    /// Storage backend
    #[arg(long, value_enum)]
    pub store: Option<StoreKind>,

    /// Data directory for the document store
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
