use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::entities::product::{Category, Model as ProductModel, NewProduct};
use crate::errors::ServiceError;

pub mod product_repository;

pub use product_repository::ProductRepository;

/// Repository trait for common database operations
pub trait Repository {
    fn get_db(&self) -> &DatabaseConnection;
}

#[derive(Debug, Clone)]
pub struct BaseRepository {
    db: Arc<DatabaseConnection>,
}

impl BaseRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl Repository for BaseRepository {
    fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Persistence contract for catalog products.
///
/// Every listing returns products ordered by ascending id.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Stores a new product, assigning its id and creation time.
    async fn insert(&self, product: NewProduct) -> Result<ProductModel, ServiceError>;

    /// Overwrites the mutable fields of an existing product. `created_date`
    /// is never rewritten.
    async fn save(&self, product: ProductModel) -> Result<ProductModel, ServiceError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<ProductModel>, ServiceError>;

    async fn find_all(&self) -> Result<Vec<ProductModel>, ServiceError>;

    async fn exists_by_id(&self, id: i64) -> Result<bool, ServiceError>;

    /// Returns true when a row was removed.
    async fn delete_by_id(&self, id: i64) -> Result<bool, ServiceError>;

    async fn find_by_name_ignore_case(
        &self,
        name: &str,
    ) -> Result<Option<ProductModel>, ServiceError>;

    async fn find_by_price_less_than_equal(
        &self,
        max: Decimal,
    ) -> Result<Vec<ProductModel>, ServiceError>;

    async fn find_by_category_and_in_stock(
        &self,
        category: Category,
    ) -> Result<Vec<ProductModel>, ServiceError>;
}
