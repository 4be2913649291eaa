use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::{Expr, Func},
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, SqlErr,
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::entities::product::{
    ActiveModel as ProductActiveModel, Category, Column, Entity as Product,
    Model as ProductModel, NewProduct,
};
use crate::errors::ServiceError;
use crate::repositories::{ProductStore, Repository};

use super::BaseRepository;

/// sea-orm backed product store
#[derive(Debug, Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

/// Maps a write failure, turning unique index violations on the name into
/// [`ServiceError::DuplicateName`].
fn map_write_error(err: DbErr, name: &str) -> ServiceError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            warn!(name = %name, detail = %detail, "Product name already taken");
            ServiceError::DuplicateName(format!("Product with name '{}' already exists", name))
        }
        _ => ServiceError::DatabaseError(err),
    }
}

#[async_trait]
impl ProductStore for ProductRepository {
    async fn insert(&self, product: NewProduct) -> Result<ProductModel, ServiceError> {
        let name = product.name.clone();
        let active = ProductActiveModel {
            id: ActiveValue::NotSet,
            name: Set(product.name),
            description: Set(product.description),
            price: Set(product.price),
            in_stock: Set(product.in_stock),
            created_date: ActiveValue::NotSet,
            category: Set(product.category),
        };

        let saved = active
            .insert(self.base.get_db())
            .await
            .map_err(|e| map_write_error(e, &name))?;
        debug!(product_id = saved.id, "Inserted product row");
        Ok(saved)
    }

    async fn save(&self, product: ProductModel) -> Result<ProductModel, ServiceError> {
        let id = product.id;
        let name = product.name.clone();
        let active = ProductActiveModel {
            id: ActiveValue::Unchanged(product.id),
            name: Set(product.name),
            description: Set(product.description),
            price: Set(product.price),
            in_stock: Set(product.in_stock),
            created_date: ActiveValue::NotSet,
            category: Set(product.category),
        };

        active
            .update(self.base.get_db())
            .await
            .map_err(|e| match e {
                DbErr::RecordNotUpdated => {
                    ServiceError::NotFound(format!("Product with ID {} not found", id))
                }
                other => map_write_error(other, &name),
            })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ProductModel>, ServiceError> {
        Product::find_by_id(id)
            .one(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    async fn find_all(&self) -> Result<Vec<ProductModel>, ServiceError> {
        Product::find()
            .order_by_asc(Column::Id)
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, ServiceError> {
        let count = Product::find_by_id(id)
            .count(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)?;
        Ok(count > 0)
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, ServiceError> {
        let result = Product::delete_by_id(id)
            .exec(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)?;
        Ok(result.rows_affected > 0)
    }

    /// Folds ASCII letters only, the same folding SQLite's `lower()` applies
    /// to the unique name index.
    async fn find_by_name_ignore_case(
        &self,
        name: &str,
    ) -> Result<Option<ProductModel>, ServiceError> {
        Product::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(Column::Name))).eq(name.to_ascii_lowercase()),
            )
            .one(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    async fn find_by_price_less_than_equal(
        &self,
        max: Decimal,
    ) -> Result<Vec<ProductModel>, ServiceError> {
        Product::find()
            .filter(Column::Price.lte(max))
            .order_by_asc(Column::Id)
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    async fn find_by_category_and_in_stock(
        &self,
        category: Category,
    ) -> Result<Vec<ProductModel>, ServiceError> {
        Product::find()
            .filter(Column::Category.eq(category))
            .filter(Column::InStock.eq(true))
            .order_by_asc(Column::Id)
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }
}
