//! CLI module
//!
//! - init: write a default config and create the data directory
//! - serve: open the store and run the HTTP server
//! - verify: checksum-scan the document file

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command, ServeOverrides};
pub use commands::{init, run, run_command, serve, verify};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_response, write_response_to};
