use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    entities::product::{Category, Model as ProductModel},
    errors::ServiceError,
    handlers::common::{created_response, map_rejection, no_content_response, success_response},
    services::{CreateProductInput, UpdateProductInput},
    AppState,
};

/// Product as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Desk Lamp")]
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = String, example = "49.99")]
    pub price: Decimal,
    pub in_stock: bool,
    pub created_date: DateTime<Utc>,
    pub category: Option<Category>,
    /// Update-time directive channel; always null in responses
    pub transient_field: Option<String>,
}

impl From<ProductModel> for ProductResponse {
    fn from(model: ProductModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            price: model.price,
            in_stock: model.in_stock,
            created_date: model.created_date,
            category: model.category,
            transient_field: None,
        }
    }
}

/// Price ceiling filter
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PriceQuery {
    /// Inclusive maximum price
    #[param(value_type = String, example = "50.00")]
    pub max: Decimal,
}

fn to_responses(products: Vec<ProductModel>) -> Vec<ProductResponse> {
    products.into_iter().map(ProductResponse::from).collect()
}

/// Product routes, relative to the API version prefix
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/price", get(products_by_max_price))
        .route(
            "/products/category/:category",
            get(in_stock_products_by_category),
        )
        .route(
            "/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

/// List every product
#[utoipa::path(
    get,
    path = "/api/v1/products",
    summary = "List products",
    description = "Get all products ordered by id",
    responses(
        (status = 200, description = "Products retrieved successfully", body = Vec<ProductResponse>,
            headers(("X-Request-Id" = String, description = "Unique request id"))
        ),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let products = state.products.get_all_products().await?;
    Ok(success_response(to_responses(products)))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    summary = "Get product",
    params(("id" = i64, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product retrieved successfully", body = ProductResponse),
        (status = 400, description = "Malformed id", body = crate::errors::ErrorResponse),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let Path(id) = id.map_err(map_rejection)?;
    let product = state.products.get_product_by_id(id).await?;
    Ok(success_response(ProductResponse::from(product)))
}

/// Create a product
#[utoipa::path(
    post,
    path = "/api/v1/products",
    summary = "Create product",
    request_body = CreateProductInput,
    responses(
        (status = 201, description = "Product created successfully", body = ProductResponse,
            headers(("X-Request-Id" = String, description = "Unique request id"))
        ),
        (status = 400, description = "Invalid request data", body = crate::errors::ErrorResponse),
        (status = 409, description = "Product name already exists", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<CreateProductInput>, JsonRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let Json(payload) = payload.map_err(map_rejection)?;
    let product = state.products.create_product(payload).await?;
    Ok(created_response(ProductResponse::from(product)))
}

/// Update a product
#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    summary = "Update product",
    description = "Merge the given fields into the product. `inStock` is always written. \
                   A `transientField` of the form `DISCOUNT:<fraction>` discounts the price.",
    params(("id" = i64, Path, description = "Product ID")),
    request_body = UpdateProductInput,
    responses(
        (status = 200, description = "Product updated successfully", body = ProductResponse),
        (status = 400, description = "Invalid data or discount out of range", body = crate::errors::ErrorResponse),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Product name already exists", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateProductInput>, JsonRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let Path(id) = id.map_err(map_rejection)?;
    let Json(payload) = payload.map_err(map_rejection)?;
    let product = state.products.update_product(id, payload).await?;
    Ok(success_response(ProductResponse::from(product)))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    summary = "Delete product",
    params(("id" = i64, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let Path(id) = id.map_err(map_rejection)?;
    state.products.delete_product(id).await?;
    Ok(no_content_response())
}

/// Products priced at or below a ceiling
#[utoipa::path(
    get,
    path = "/api/v1/products/price",
    summary = "Filter by maximum price",
    params(PriceQuery),
    responses(
        (status = 200, description = "Matching products", body = Vec<ProductResponse>),
        (status = 400, description = "Missing, malformed or negative ceiling", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn products_by_max_price(
    State(state): State<AppState>,
    query: Result<Query<PriceQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let Query(query) = query.map_err(map_rejection)?;
    let products = state.products.get_products_by_max_price(query.max).await?;
    Ok(success_response(to_responses(products)))
}

/// In-stock products of one category
#[utoipa::path(
    get,
    path = "/api/v1/products/category/{category}",
    summary = "Filter in-stock products by category",
    params(("category" = String, Path, description = "Category name, case-insensitive")),
    responses(
        (status = 200, description = "Matching products", body = Vec<ProductResponse>),
        (status = 400, description = "Unknown category", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn in_stock_products_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let products = state
        .products
        .get_in_stock_products_by_category(&category)
        .await?;
    Ok(success_response(to_responses(products)))
}
