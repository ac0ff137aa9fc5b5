//! User resource: the record type and the service that manages it.

mod model;
mod service;

pub use model::User;
pub use service::UserService;
