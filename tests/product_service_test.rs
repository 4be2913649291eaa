use std::sync::Arc;

use assert_matches::assert_matches;
use async_trait::async_trait;
use catalog_api::{
    entities::product::{Category, Model as ProductModel, NewProduct},
    errors::ServiceError,
    repositories::ProductStore,
    services::{CreateProductInput, ProductService, UpdateProductInput},
};
use chrono::Utc;
use mockall::{mock, predicate::eq};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

mock! {
    pub Store {}

    #[async_trait]
    impl ProductStore for Store {
        async fn insert(&self, product: NewProduct) -> Result<ProductModel, ServiceError>;
        async fn save(&self, product: ProductModel) -> Result<ProductModel, ServiceError>;
        async fn find_by_id(&self, id: i64) -> Result<Option<ProductModel>, ServiceError>;
        async fn find_all(&self) -> Result<Vec<ProductModel>, ServiceError>;
        async fn exists_by_id(&self, id: i64) -> Result<bool, ServiceError>;
        async fn delete_by_id(&self, id: i64) -> Result<bool, ServiceError>;
        async fn find_by_name_ignore_case(&self, name: &str) -> Result<Option<ProductModel>, ServiceError>;
        async fn find_by_price_less_than_equal(&self, max: Decimal) -> Result<Vec<ProductModel>, ServiceError>;
        async fn find_by_category_and_in_stock(&self, category: Category) -> Result<Vec<ProductModel>, ServiceError>;
    }
}

fn product(id: i64, name: &str, price: Decimal, in_stock: bool) -> ProductModel {
    ProductModel {
        id,
        name: name.to_string(),
        description: Some("stored description".to_string()),
        price,
        in_stock,
        created_date: Utc::now(),
        category: Some(Category::Electronics),
    }
}

fn service(store: MockStore) -> ProductService {
    ProductService::new(Arc::new(store))
}

fn create_input(name: &str, category: Option<&str>) -> CreateProductInput {
    CreateProductInput {
        name: name.to_string(),
        description: None,
        price: dec!(25.50),
        in_stock: true,
        category: category.map(str::to_string),
    }
}

/// Store that knows a single product and echoes back whatever is saved
fn store_with(existing: ProductModel) -> MockStore {
    let mut store = MockStore::new();
    let id = existing.id;
    store
        .expect_find_by_id()
        .with(eq(id))
        .returning(move |_| Ok(Some(existing.clone())));
    store
}

#[tokio::test]
async fn create_inserts_with_resolved_category() {
    let mut store = MockStore::new();
    store
        .expect_find_by_name_ignore_case()
        .withf(|name: &str| name == "Kindle")
        .times(1)
        .returning(|_| Ok(None));
    store
        .expect_insert()
        .withf(|p: &NewProduct| p.category == Some(Category::Books) && p.in_stock)
        .times(1)
        .returning(|p| {
            Ok(ProductModel {
                id: 1,
                name: p.name,
                description: p.description,
                price: p.price,
                in_stock: p.in_stock,
                created_date: Utc::now(),
                category: p.category,
            })
        });

    let created = service(store)
        .create_product(create_input("Kindle", Some("books")))
        .await
        .unwrap();

    assert_eq!(created.id, 1);
    assert_eq!(created.price, dec!(25.50));
    assert_eq!(created.category, Some(Category::Books));
}

#[tokio::test]
async fn create_rejects_duplicate_name_without_writing() {
    let mut store = MockStore::new();
    store
        .expect_find_by_name_ignore_case()
        .returning(|_| Ok(Some(product(9, "KINDLE", dec!(10), true))));
    store.expect_insert().never();

    let result = service(store)
        .create_product(create_input("kindle", None))
        .await;

    assert_matches!(result, Err(ServiceError::DuplicateName(_)));
}

#[tokio::test]
async fn create_rejects_unknown_category() {
    let mut store = MockStore::new();
    store.expect_find_by_name_ignore_case().never();
    store.expect_insert().never();

    let result = service(store)
        .create_product(create_input("Lamp", Some("furniture")))
        .await;

    assert_matches!(result, Err(ServiceError::InvalidArgument(_)));
}

#[tokio::test]
async fn create_rejects_blank_name_and_negative_price() {
    let svc = service(MockStore::new());

    let blank = svc.create_product(create_input("   ", None)).await;
    assert_matches!(blank, Err(ServiceError::InvalidArgument(_)));

    let mut negative = create_input("Lamp", None);
    negative.price = dec!(-1.00);
    assert_matches!(
        svc.create_product(negative).await,
        Err(ServiceError::InvalidArgument(_))
    );
}

#[tokio::test]
async fn get_by_id_reports_missing_product() {
    let mut store = MockStore::new();
    store.expect_find_by_id().with(eq(42)).returning(|_| Ok(None));

    let result = service(store).get_product_by_id(42).await;
    assert_matches!(result, Err(ServiceError::NotFound(msg)) if msg.contains("42"));
}

#[tokio::test]
async fn update_missing_product_never_saves() {
    let mut store = MockStore::new();
    store.expect_find_by_id().returning(|_| Ok(None));
    store.expect_save().never();

    let result = service(store)
        .update_product(5, UpdateProductInput::default())
        .await;

    assert_matches!(result, Err(ServiceError::NotFound(_)));
}

#[tokio::test]
async fn update_merges_present_fields_and_overwrites_stock() {
    let mut store = store_with(product(3, "Headphones", dec!(100.00), true));
    store
        .expect_save()
        .withf(|p: &ProductModel| {
            p.name == "Headphones"
                && p.description.as_deref() == Some("stored description")
                && p.price == dec!(80.00)
                && !p.in_stock
        })
        .times(1)
        .returning(Ok);

    let input = UpdateProductInput {
        price: Some(dec!(80.00)),
        ..Default::default()
    };
    let updated = service(store).update_product(3, input).await.unwrap();

    assert_eq!(updated.price, dec!(80.00));
    assert!(!updated.in_stock);
}

#[tokio::test]
async fn update_applies_discount_directive_once() {
    let mut store = store_with(product(3, "Headphones", dec!(100.00), true));
    store
        .expect_save()
        .withf(|p: &ProductModel| p.price == dec!(90.00) && p.in_stock)
        .times(1)
        .returning(Ok);

    let input = UpdateProductInput {
        in_stock: true,
        transient_field: Some("DISCOUNT:0.10".to_string()),
        ..Default::default()
    };
    let updated = service(store).update_product(3, input).await.unwrap();

    assert_eq!(updated.price, dec!(90.00));
}

#[tokio::test]
async fn update_discounts_the_merged_price() {
    let mut store = store_with(product(3, "Headphones", dec!(100.00), true));
    store.expect_save().returning(Ok);

    let input = UpdateProductInput {
        price: Some(dec!(50.00)),
        transient_field: Some("discount:0.5".to_string()),
        ..Default::default()
    };
    let updated = service(store).update_product(3, input).await.unwrap();

    assert_eq!(updated.price, dec!(25.00));
}

#[tokio::test]
async fn update_rejects_out_of_range_discount() {
    let mut store = store_with(product(3, "Headphones", dec!(100.00), true));
    store.expect_save().never();

    let input = UpdateProductInput {
        transient_field: Some("DISCOUNT:1.5".to_string()),
        ..Default::default()
    };
    let result = service(store).update_product(3, input).await;

    assert_matches!(result, Err(ServiceError::InvalidArgument(_)));
}

#[tokio::test]
async fn update_ignores_malformed_directives() {
    for directive in ["DISCOUNT", "DISCOUNT:abc", "PROMO:0.1"] {
        let mut store = store_with(product(3, "Headphones", dec!(100.00), true));
        store
            .expect_save()
            .withf(|p: &ProductModel| p.price == dec!(100.00))
            .times(1)
            .returning(Ok);

        let input = UpdateProductInput {
            in_stock: true,
            transient_field: Some(directive.to_string()),
            ..Default::default()
        };
        let updated = service(store).update_product(3, input).await.unwrap();
        assert_eq!(updated.price, dec!(100.00), "directive {directive}");
    }
}

#[tokio::test]
async fn update_rejects_rename_onto_another_product() {
    let mut store = store_with(product(3, "Headphones", dec!(100.00), true));
    store
        .expect_find_by_name_ignore_case()
        .withf(|name: &str| name == "Speaker")
        .returning(|_| Ok(Some(product(4, "speaker", dec!(60), true))));
    store.expect_save().never();

    let input = UpdateProductInput {
        name: Some("Speaker".to_string()),
        ..Default::default()
    };
    let result = service(store).update_product(3, input).await;

    assert_matches!(result, Err(ServiceError::DuplicateName(_)));
}

#[tokio::test]
async fn update_allows_case_only_rename() {
    let mut store = store_with(product(3, "Headphones", dec!(100.00), true));
    store.expect_find_by_name_ignore_case().never();
    store
        .expect_save()
        .withf(|p: &ProductModel| p.name == "HEADPHONES")
        .returning(Ok);

    let input = UpdateProductInput {
        name: Some("HEADPHONES".to_string()),
        ..Default::default()
    };
    assert!(service(store).update_product(3, input).await.is_ok());
}

#[tokio::test]
async fn update_rejects_invalid_merged_record() {
    let mut store = store_with(product(3, "Headphones", dec!(100.00), true));
    store.expect_save().never();

    let input = UpdateProductInput {
        name: Some(String::new()),
        ..Default::default()
    };
    let result = service(store).update_product(3, input).await;

    assert_matches!(result, Err(ServiceError::InvalidArgument(_)));
}

#[tokio::test]
async fn delete_checks_existence_first() {
    let mut store = MockStore::new();
    store.expect_exists_by_id().with(eq(8)).returning(|_| Ok(false));
    store.expect_delete_by_id().never();

    let result = service(store).delete_product(8).await;
    assert_matches!(result, Err(ServiceError::NotFound(_)));
}

#[tokio::test]
async fn delete_removes_existing_product() {
    let mut store = MockStore::new();
    store.expect_exists_by_id().with(eq(8)).returning(|_| Ok(true));
    store
        .expect_delete_by_id()
        .with(eq(8))
        .times(1)
        .returning(|_| Ok(true));

    assert!(service(store).delete_product(8).await.is_ok());
}

#[tokio::test]
async fn max_price_filter_rejects_negative_ceiling() {
    let mut store = MockStore::new();
    store.expect_find_by_price_less_than_equal().never();

    let result = service(store).get_products_by_max_price(dec!(-5)).await;
    assert_matches!(result, Err(ServiceError::InvalidArgument(_)));
}

#[tokio::test]
async fn max_price_filter_passes_ceiling_to_store() {
    let mut store = MockStore::new();
    store
        .expect_find_by_price_less_than_equal()
        .with(eq(dec!(50)))
        .returning(|_| Ok(vec![product(1, "Cable", dec!(9.99), true)]));

    let products = service(store)
        .get_products_by_max_price(dec!(50))
        .await
        .unwrap();
    assert_eq!(products.len(), 1);
}

#[tokio::test]
async fn category_filter_resolves_name_ignoring_case() {
    let mut store = MockStore::new();
    store
        .expect_find_by_category_and_in_stock()
        .with(eq(Category::Electronics))
        .times(1)
        .returning(|_| Ok(vec![]));

    let products = service(store)
        .get_in_stock_products_by_category("eLeCtRoNiCs")
        .await
        .unwrap();
    assert!(products.is_empty());
}

#[tokio::test]
async fn category_filter_rejects_unknown_name() {
    let mut store = MockStore::new();
    store.expect_find_by_category_and_in_stock().never();

    let result = service(store)
        .get_in_stock_products_by_category("bogus")
        .await;
    assert_matches!(result, Err(ServiceError::InvalidArgument(_)));
}
