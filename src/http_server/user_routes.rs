//! User HTTP Routes
//!
//! CRUD over `/api/users`. Each handler is one service call plus a status
//! code; request bodies are only checked by the `Json` extractor.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use super::errors::{ApiError, ApiResult};
use crate::users::{User, UserService};

// ==================
// User Routes
// ==================

pub fn user_routes(service: UserService) -> Router {
    Router::new()
        .route("/api/users", get(list_users_handler).post(create_user_handler))
        .route(
            "/api/users/:id",
            get(get_user_handler)
                .put(update_user_handler)
                .delete(delete_user_handler),
        )
        .with_state(service)
}

// ==================
// Handlers
// ==================

async fn create_user_handler(
    State(service): State<UserService>,
    Json(user): Json<User>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let created = service.create(user)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_user_handler(
    State(service): State<UserService>,
    Path(id): Path<String>,
) -> ApiResult<Json<User>> {
    service.get(&id)?.map(Json).ok_or(ApiError::NotFound)
}

async fn update_user_handler(
    State(service): State<UserService>,
    Path(id): Path<String>,
    Json(user): Json<User>,
) -> ApiResult<Json<User>> {
    service.update(&id, user)?.map(Json).ok_or(ApiError::NotFound)
}

async fn delete_user_handler(
    State(service): State<UserService>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if service.delete(&id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

async fn list_users_handler(State(service): State<UserService>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(service.list()?))
}
