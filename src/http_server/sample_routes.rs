//! Sample Routes
//!
//! Runs the language-feature showcases and returns the sample address.

use axum::{routing::get, Json, Router};
use tracing::info;

use crate::samples::{run_showcase, Address};

pub fn sample_routes() -> Router {
    Router::new()
        .route("/api/kotlin/test", get(showcase_handler))
        .route("/api/samples/showcase", get(showcase_handler))
}

async fn showcase_handler() -> Json<Address> {
    let showcase = run_showcase();
    info!(
        rectangle_area = showcase.rectangle_area,
        random_value = showcase.random_value,
        greeting = %showcase.greeting,
        sum = showcase.sum,
        "ran sample showcase"
    );
    Json(showcase.address)
}
