//! users-api entry point
//!
//! Parses arguments and hands off to the CLI module. Errors go to stderr
//! with a non-zero exit code.

use users_api::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
