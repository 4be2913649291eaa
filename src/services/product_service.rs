use std::sync::Arc;

use crate::{
    entities::product::{
        validate_non_negative_price, validate_not_blank, Category, Model as ProductModel,
        NewProduct,
    },
    errors::ServiceError,
    repositories::ProductStore,
    services::discount,
};
use metrics::counter;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Input for creating a product
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductInput {
    #[validate(
        length(
            min = 1,
            max = 100,
            message = "Product name must be between 1 and 100 characters"
        ),
        custom = "validate_not_blank"
    )]
    #[schema(example = "Desk Lamp")]
    pub name: String,
    pub description: Option<String>,
    #[validate(custom = "validate_non_negative_price")]
    #[schema(value_type = String, example = "49.99")]
    pub price: Decimal,
    #[serde(default)]
    pub in_stock: bool,
    /// Category name, matched ignoring case
    #[schema(example = "HOME")]
    pub category: Option<String>,
}

/// Partial update of a product.
///
/// Absent or null `name`, `description` and `price` keep their stored values.
/// `inStock` is always written; leaving it out stores `false`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<String>, example = "39.99")]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub in_stock: bool,
    /// Optional `DISCOUNT:<fraction>` directive, never stored
    #[schema(example = "DISCOUNT:0.10")]
    pub transient_field: Option<String>,
}

/// Service for managing catalog products
#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn ProductStore>,
}

impl ProductService {
    /// Creates a new product service instance
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    /// Create a new product
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_product(
        &self,
        input: CreateProductInput,
    ) -> Result<ProductModel, ServiceError> {
        input.validate()?;

        let category = input
            .category
            .as_deref()
            .map(Category::from_name)
            .transpose()?;

        if self
            .store
            .find_by_name_ignore_case(&input.name)
            .await?
            .is_some()
        {
            error!(name = %input.name, "Product creation failed, name already exists");
            return Err(ServiceError::DuplicateName(format!(
                "Product with name '{}' already exists",
                input.name
            )));
        }

        let product = self
            .store
            .insert(NewProduct {
                name: input.name,
                description: input.description,
                price: input.price,
                in_stock: input.in_stock,
                category,
            })
            .await?;

        counter!("catalog.products.created", 1);
        info!(product_id = product.id, "Product created successfully");
        Ok(product)
    }

    /// Get every product, ordered by id
    #[instrument(skip(self))]
    pub async fn get_all_products(&self) -> Result<Vec<ProductModel>, ServiceError> {
        let products = self.store.find_all().await?;
        debug!(count = products.len(), "Retrieved products");
        Ok(products)
    }

    /// Get a product by ID
    #[instrument(skip(self))]
    pub async fn get_product_by_id(&self, id: i64) -> Result<ProductModel, ServiceError> {
        self.store.find_by_id(id).await?.ok_or_else(|| {
            error!(product_id = id, "Product not found");
            ServiceError::NotFound(format!("Product with ID {} not found", id))
        })
    }

    /// Get products priced at or below `max_price`
    #[instrument(skip(self))]
    pub async fn get_products_by_max_price(
        &self,
        max_price: Decimal,
    ) -> Result<Vec<ProductModel>, ServiceError> {
        if max_price.is_sign_negative() && !max_price.is_zero() {
            return Err(ServiceError::InvalidArgument(format!(
                "Maximum price must not be negative, got {}",
                max_price
            )));
        }
        self.store.find_by_price_less_than_equal(max_price).await
    }

    /// Get in-stock products of the named category
    #[instrument(skip(self))]
    pub async fn get_in_stock_products_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<ProductModel>, ServiceError> {
        let category = Category::from_name(category)?;
        self.store.find_by_category_and_in_stock(category).await
    }

    /// Merge `input` into the stored product, apply any discount directive and save
    #[instrument(skip(self, input))]
    pub async fn update_product(
        &self,
        id: i64,
        input: UpdateProductInput,
    ) -> Result<ProductModel, ServiceError> {
        let mut product = self.get_product_by_id(id).await?;
        let previous_name = product.name.clone();

        if let Some(name) = input.name {
            product.name = name;
        }
        if let Some(description) = input.description {
            product.description = Some(description);
        }
        if let Some(price) = input.price {
            product.price = price;
        }
        product.in_stock = input.in_stock;

        if let Some(fraction) = input
            .transient_field
            .as_deref()
            .and_then(discount::parse_directive)
        {
            product.apply_discount(fraction).map_err(|e| {
                warn!(product_id = id, %fraction, "Rejected discount directive");
                e
            })?;
            debug!(product_id = id, %fraction, price = %product.price, "Discount applied");
        }

        product.validate()?;

        if !product.name.eq_ignore_ascii_case(&previous_name) {
            if let Some(other) = self.store.find_by_name_ignore_case(&product.name).await? {
                if other.id != id {
                    error!(product_id = id, name = %product.name, "Rename collides with another product");
                    return Err(ServiceError::DuplicateName(format!(
                        "Product with name '{}' already exists",
                        product.name
                    )));
                }
            }
        }

        let saved = self.store.save(product).await?;
        counter!("catalog.products.updated", 1);
        info!(product_id = id, "Product updated successfully");
        Ok(saved)
    }

    /// Delete a product by ID
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: i64) -> Result<(), ServiceError> {
        if !self.store.exists_by_id(id).await? {
            error!(product_id = id, "Cannot delete, product not found");
            return Err(ServiceError::NotFound(format!(
                "Product with ID {} not found",
                id
            )));
        }

        if !self.store.delete_by_id(id).await? {
            return Err(ServiceError::NotFound(format!(
                "Product with ID {} not found",
                id
            )));
        }

        counter!("catalog.products.deleted", 1);
        info!(product_id = id, "Product deleted successfully");
        Ok(())
    }
}
