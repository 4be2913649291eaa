use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelBehavior, ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::errors::ServiceError;
use crate::services::discount;

/// Maximum length of a product name, in characters
pub const MAX_NAME_LENGTH: u32 = 100;

/// Fixed set of catalog categories.
///
/// Stored and serialized by the uppercase name. Incoming strings are resolved
/// through [`Category::from_name`], the one lookup shared by product creation
/// and the in-stock category filter.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
    strum::AsRefStr,
    strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Category {
    #[sea_orm(string_value = "ELECTRONICS")]
    Electronics,
    #[sea_orm(string_value = "CLOTHING")]
    Clothing,
    #[sea_orm(string_value = "BOOKS")]
    Books,
    #[sea_orm(string_value = "HOME")]
    Home,
    #[sea_orm(string_value = "TOYS")]
    Toys,
    #[sea_orm(string_value = "SPORTS")]
    Sports,
    #[sea_orm(string_value = "GROCERY")]
    Grocery,
    #[sea_orm(string_value = "BEAUTY")]
    Beauty,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Electronics,
        Category::Clothing,
        Category::Books,
        Category::Home,
        Category::Toys,
        Category::Sports,
        Category::Grocery,
        Category::Beauty,
    ];

    /// Resolves a category name, ignoring ASCII case and surrounding whitespace.
    pub fn from_name(name: &str) -> Result<Self, ServiceError> {
        name.trim().parse::<Category>().map_err(|_| {
            let known: Vec<&str> = Self::ALL.iter().map(|c| c.as_ref()).collect();
            ServiceError::InvalidArgument(format!(
                "Unknown product category '{}'; expected one of: {}",
                name,
                known.join(", ")
            ))
        })
    }
}

/// Product entity
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Store-assigned identifier
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Product name, unique ignoring case
    #[validate(
        length(
            min = 1,
            max = 100,
            message = "Product name must be between 1 and 100 characters"
        ),
        custom = "validate_not_blank"
    )]
    pub name: String,

    /// Product description
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// Unit price
    #[validate(custom = "validate_non_negative_price")]
    pub price: Decimal,

    pub in_stock: bool,

    /// Set once by the store when the row is inserted
    pub created_date: DateTime<Utc>,

    pub category: Option<Category>,
}

impl Model {
    /// Replaces the current price with its discounted value and returns it.
    ///
    /// Each call discounts the price as it stands, so repeated calls compound.
    /// On error the price is left untouched.
    pub fn apply_discount(&mut self, fraction: Decimal) -> Result<Decimal, ServiceError> {
        self.price = discount::discounted_price(self.price, fraction)?;
        Ok(self.price)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;

        if insert {
            active_model.created_date = Set(Utc::now());
        }

        Ok(active_model)
    }
}

/// A product that has not been stored yet; the store assigns `id` and
/// `created_date` on insert.
#[derive(Clone, Debug, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub in_stock: bool,
    pub category: Option<Category>,
}

pub(crate) fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

pub(crate) fn validate_non_negative_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        let mut err = ValidationError::new("price");
        err.message = Some("price must not be negative".into());
        return Err(err);
    }
    Ok(())
}
