//! Catalog API Library
//!
//! Product catalog backend: CRUD over products, a price-ceiling query, an
//! in-stock-by-category query and update-time discount directives, served
//! over HTTP/JSON.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod middleware_helpers;
pub mod migrator;
pub mod openapi;
pub mod repositories;
pub mod services;
pub mod tracing;

use axum::{http::HeaderValue, routing::get, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
};

use crate::repositories::ProductRepository;
use crate::services::ProductService;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub products: Arc<ProductService>,
}

impl AppState {
    /// Wires the sea-orm product store and service over `db`
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        let store = Arc::new(ProductRepository::new(db.clone()));
        Self {
            db,
            config,
            products: Arc::new(ProductService::new(store)),
        }
    }
}

// API v1 routes, nested under /api/v1
pub fn api_v1_routes() -> Router<AppState> {
    handlers::products::product_routes()
}

/// CORS layer from the configured origins, permissive when none are set
pub fn cors_layer(cfg: &config::AppConfig) -> CorsLayer {
    let configured_origins: Option<Vec<HeaderValue>> = cfg
        .cors_allowed_origins
        .as_ref()
        .map(|raw| {
            raw.split(',')
                .filter_map(|origin| {
                    let trimmed = origin.trim();
                    if trimmed.is_empty() {
                        None
                    } else {
                        HeaderValue::from_str(trimmed).ok()
                    }
                })
                .collect::<Vec<_>>()
        })
        .filter(|origins| !origins.is_empty());

    match configured_origins {
        Some(origins) => CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any),
        None => {
            ::tracing::info!(
                "Using permissive CORS because explicit origins were not configured ({})",
                if cfg.is_development() {
                    "development environment"
                } else {
                    "explicit override enabled"
                }
            );
            CorsLayer::permissive()
        }
    }
}

/// Full application router: health probes, the v1 API and Swagger UI
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    let max_body_size = state.config.max_body_size;

    Router::<AppState>::new()
        .route("/", get(|| async { "catalog-api up" }))
        .merge(handlers::health::health_routes())
        .nest("/api/v1", api_v1_routes())
        .merge(openapi::swagger_ui())
        // HTTP tracing layer for consistent request/response telemetry
        .layer(tracing::configure_http_tracing())
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_size))
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        ))
        .with_state(state)
}
