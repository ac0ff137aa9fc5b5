//! # HTTP Server Module
//!
//! Axum server exposing the user resource.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/api/users` - User CRUD
//! - `/api/kotlin/test`, `/api/samples/showcase` - Language-feature samples

pub mod config;
pub mod errors;
pub mod observability_routes;
pub mod sample_routes;
pub mod server;
pub mod user_routes;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult, ErrorResponse};
pub use server::HttpServer;
