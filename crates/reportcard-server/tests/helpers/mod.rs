//! Test helpers for report card server integration tests
//!
//! - In-memory and file-backed database setup with migrations applied
//! - Router construction
//! - Request builders and response decoding

#![allow(dead_code)]

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use reportcard_server::{
    api,
    config::Config,
    db::{connect_options, MIGRATOR},
    features::FeatureState,
    render::ReportRenderer,
};
use serde_json::Value;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tower::ServiceExt; // for `oneshot`

/// Fresh in-memory database.
///
/// One connection that never expires: every new connection to
/// `sqlite::memory:` would open a different, empty database.
pub async fn setup_test_db() -> SqlitePool {
    let options = connect_options("sqlite::memory:").expect("valid in-memory URL");
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("Failed to open in-memory database");

    MIGRATOR.run(&pool).await.expect("Failed to run migrations");
    pool
}

/// File-backed database shared by several pooled connections.
///
/// Keep the returned directory alive for as long as the pool is used.
pub async fn setup_file_db(max_connections: u32) -> (tempfile::TempDir, SqlitePool) {
    let dir = tempfile::tempdir().expect("temporary directory");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("reportcards.db").display());
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(connect_options(&url).expect("valid file URL"))
        .await
        .expect("Failed to open file database");

    MIGRATOR.run(&pool).await.expect("Failed to run migrations");
    (dir, pool)
}

/// Full application router, middleware included
pub async fn setup_test_app(pool: SqlitePool) -> Router {
    let state = FeatureState {
        db: pool,
        renderer: ReportRenderer::new().expect("built-in template"),
    };
    api::create_router(state, &Config::default())
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is JSON")
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    TestResponse {
        status,
        headers,
        body,
    }
}

pub fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn pdf_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    let mut request = json_request(method, uri, body);
    request
        .headers_mut()
        .insert(header::ACCEPT, "application/pdf".parse().unwrap());
    request
}

pub fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Create a student through the API and return its id
pub async fn create_student(app: &Router, name: &str, roll_number: &str) -> String {
    let body = serde_json::json!({
        "name": name,
        "roll_number": roll_number,
        "class": "5",
        "section": "A"
    });
    let response = send(app, json_request(Method::POST, "/api/v1/students", &body)).await;
    assert_eq!(response.status, StatusCode::CREATED);

    response.json()["student_id"]
        .as_str()
        .expect("student_id is a string")
        .to_string()
}

pub async fn count_rows(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .unwrap()
}

pub fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
