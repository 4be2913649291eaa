#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use catalog_api::{config::AppConfig, db, AppState};
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use tower::ServiceExt;

/// Fresh in-memory SQLite database with the migrator applied.
///
/// The pool is pinned to one connection so every query sees the same
/// in-memory database.
pub async fn test_db() -> Arc<DatabaseConnection> {
    let cfg = test_config();
    let pool = db::establish_connection_from_app_config(&cfg)
        .await
        .expect("failed to create test database");
    db::run_migrations(&pool)
        .await
        .expect("failed to run migrations in tests");
    Arc::new(pool)
}

fn test_config() -> AppConfig {
    let mut cfg = AppConfig::new(
        "sqlite::memory:".to_string(),
        "127.0.0.1".to_string(),
        18_080,
        "development".to_string(),
    );
    cfg.auto_migrate = true;
    cfg.db_max_connections = 1;
    cfg.db_min_connections = 1;
    cfg
}

/// Response pieces the API tests assert on
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Helper harness serving the full router over an in-memory database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let state = AppState::new(test_db().await, test_config());
        let router = catalog_api::build_router(state.clone());
        Self { router, state }
    }

    /// Send a request against the router, decoding any JSON body.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None).await
    }

    /// Create a product through the API and return its JSON representation.
    pub async fn seed_product(
        &self,
        name: &str,
        price: &str,
        in_stock: bool,
        category: Option<&str>,
    ) -> Value {
        let response = self
            .request(
                Method::POST,
                "/api/v1/products",
                Some(json!({
                    "name": name,
                    "description": format!("{} for tests", name),
                    "price": price,
                    "inStock": in_stock,
                    "category": category,
                })),
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "seeding {} failed: {}",
            name,
            response.body
        );
        response.body
    }
}
