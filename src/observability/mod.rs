//! Logging for the users service.

mod logger;

pub use logger::{env_filter, init_tracing};
