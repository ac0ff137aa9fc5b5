//! users-api - a user CRUD service over an append-only document store
//!
//! Layers, leaves first:
//!
//! - [`storage`]: checksummed append-only document file
//! - [`store`]: the `UserStore` trait with memory and document backends
//! - [`users`]: the user record and `UserService`
//! - [`http_server`]: axum routes mapping requests onto the service

pub mod cli;
pub mod http_server;
pub mod observability;
pub mod samples;
pub mod storage;
pub mod store;
pub mod users;
