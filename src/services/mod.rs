// Catalog services
pub mod product_service;

// Pricing rules applied during product updates
pub mod discount;

pub use product_service::{CreateProductInput, ProductService, UpdateProductInput};
