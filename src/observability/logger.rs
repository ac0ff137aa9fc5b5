//! Tracing subscriber setup
//!
//! `RUST_LOG` wins over the configured filter. Output is the compact fmt
//! layout with an uptime timer, one line per event.

use tracing_subscriber::EnvFilter;

/// Resolves the filter: `RUST_LOG` if set and valid, else `fallback`, else `info`.
pub fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber. Later calls are ignored.
pub fn init_tracing(fallback: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(fallback))
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .compact()
        .try_init();
}
