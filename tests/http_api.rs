//! HTTP contract tests for `/api/users`, run against the durable store.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;
use users_api::http_server::{HttpServer, HttpServerConfig};
use users_api::store::{DocumentStore, MemoryStore, StoreError, StoreResult, UserStore};
use users_api::users::{User, UserService};

// =============================================================================
// Test Utilities
// =============================================================================

fn app(temp_dir: &TempDir) -> Router {
    let store: Arc<dyn UserStore> = Arc::new(DocumentStore::open(temp_dir.path()).unwrap());
    HttpServer::new(HttpServerConfig::default(), UserService::new(store)).router()
}

/// Reads go to the inner store; every write fails.
struct ReadOnlyStore {
    inner: MemoryStore,
}

impl UserStore for ReadOnlyStore {
    fn save(&self, _: User) -> StoreResult<User> {
        Err(StoreError::Poisoned)
    }
    fn find_by_id(&self, id: &str) -> StoreResult<Option<User>> {
        self.inner.find_by_id(id)
    }
    fn exists_by_id(&self, id: &str) -> StoreResult<bool> {
        self.inner.exists_by_id(id)
    }
    fn delete_by_id(&self, _: &str) -> StoreResult<()> {
        Err(StoreError::Poisoned)
    }
    fn find_all(&self) -> StoreResult<Vec<User>> {
        self.inner.find_all()
    }
}

fn read_only_app(seed: User) -> Router {
    let inner = MemoryStore::new();
    inner.save(seed).unwrap();
    let store: Arc<dyn UserStore> = Arc::new(ReadOnlyStore { inner });
    HttpServer::new(HttpServerConfig::default(), UserService::new(store)).router()
}

async fn assert_internal_error(response: Response) {
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Internal server error", "code": 500})
    );
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

async fn create(app: &Router, name: &str, email: &str) -> Value {
    let response = send(
        app,
        "POST",
        "/api/users",
        Some(json!({"name": name, "email": email})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

// =============================================================================
// Contract
// =============================================================================

#[tokio::test]
async fn test_create_and_get() {
    let temp_dir = TempDir::new().unwrap();
    let app = app(&temp_dir);

    let created = create(&app, "A", "a@x.com").await;
    let id = created["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());
    assert_eq!(created["name"], "A");

    let response = send(&app, "GET", &format!("/api/users/{}", id), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, created);
}

#[tokio::test]
async fn test_update_existing_ignores_body_id() {
    let temp_dir = TempDir::new().unwrap();
    let app = app(&temp_dir);

    let id = create(&app, "A", "a@x.com").await["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = send(
        &app,
        "PUT",
        &format!("/api/users/{}", id),
        Some(json!({"id": "elsewhere", "name": "B", "email": "b@x.com"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"id": id, "name": "B", "email": "b@x.com"})
    );

    let response = send(&app, "GET", "/api/users/elsewhere", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_missing_is_empty_404() {
    let temp_dir = TempDir::new().unwrap();
    let app = app(&temp_dir);

    let response = send(
        &app,
        "PUT",
        "/api/users/nope",
        Some(json!({"name": "B", "email": "b@x.com"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_bytes(response).await.is_empty());

    let response = send(&app, "GET", "/api/users", None).await;
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn test_delete_then_delete_again() {
    let temp_dir = TempDir::new().unwrap();
    let app = app(&temp_dir);

    let id = create(&app, "A", "a@x.com").await["id"]
        .as_str()
        .unwrap()
        .to_string();
    let uri = format!("/api/users/{}", id);

    let response = send(&app, "DELETE", &uri, None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(response).await.is_empty());

    let response = send(&app, "DELETE", &uri, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_bytes(response).await.is_empty());

    let response = send(&app, "GET", &uri, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_contains_exactly_created() {
    let temp_dir = TempDir::new().unwrap();
    let app = app(&temp_dir);

    let x = create(&app, "X", "x@x.com").await;
    let y = create(&app, "Y", "y@x.com").await;

    let response = send(&app, "GET", "/api/users", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let listed = body_json(response).await;
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.contains(&x));
    assert!(listed.contains(&y));
}

#[tokio::test]
async fn test_malformed_body_rejected_before_service() {
    let temp_dir = TempDir::new().unwrap();
    let app = app(&temp_dir);

    let response = send(&app, "POST", "/api/users", Some(json!({"name": "A"}))).await;
    assert!(response.status().is_client_error());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/users")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(response.status().is_client_error());

    let response = send(&app, "GET", "/api/users", None).await;
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn test_empty_strings_are_accepted() {
    let temp_dir = TempDir::new().unwrap();
    let app = app(&temp_dir);

    let created = create(&app, "", "").await;
    assert_eq!(created["name"], "");
    assert!(created["id"].is_string());
}

#[tokio::test]
async fn test_records_survive_restart() {
    let temp_dir = TempDir::new().unwrap();

    let created = {
        let app = app(&temp_dir);
        create(&app, "A", "a@x.com").await
    };

    let app = app(&temp_dir);
    let uri = format!("/api/users/{}", created["id"].as_str().unwrap());
    let response = send(&app, "GET", &uri, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, created);
}

// =============================================================================
// Persistence Failures
// =============================================================================

#[tokio::test]
async fn test_failed_writes_are_500_and_change_nothing() {
    let original = User::new("A", "a@x.com").with_id("a");
    let app = read_only_app(original.clone());
    let expected = serde_json::to_value(&original).unwrap();

    let response = send(
        &app,
        "POST",
        "/api/users",
        Some(json!({"name": "N", "email": "n@x.com"})),
    )
    .await;
    assert_internal_error(response).await;

    let response = send(
        &app,
        "PUT",
        "/api/users/a",
        Some(json!({"name": "B", "email": "b@x.com"})),
    )
    .await;
    assert_internal_error(response).await;

    let response = send(&app, "DELETE", "/api/users/a", None).await;
    assert_internal_error(response).await;

    let response = send(&app, "GET", "/api/users/a", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, expected);

    let response = send(&app, "GET", "/api/users", None).await;
    assert_eq!(body_json(response).await, json!([expected]));
}

#[tokio::test]
async fn test_missing_id_is_404_even_when_writes_fail() {
    let app = read_only_app(User::new("A", "a@x.com").with_id("a"));

    let response = send(&app, "DELETE", "/api/users/nope", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_bytes(response).await.is_empty());
}
