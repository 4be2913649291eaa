use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = r#"
# Catalog API

Product catalog backend.

## Features

- **Products**: Create, read, update and delete catalog products
- **Price ceiling**: List products at or below a maximum price
- **Category stock**: List in-stock products of one category
- **Discounts**: Send `transientField: "DISCOUNT:<fraction>"` on update to discount the price

## Error Handling

Every failure returns the same body with an appropriate HTTP status code:

```json
{
  "error": "Not Found",
  "message": "Not found: Product with ID 42 not found",
  "request_id": "6f1c...",
  "timestamp": "2024-01-01T00:00:00Z"
}
```
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "products", description = "Product catalog endpoints")
    ),
    paths(
        crate::handlers::products::list_products,
        crate::handlers::products::get_product,
        crate::handlers::products::create_product,
        crate::handlers::products::update_product,
        crate::handlers::products::delete_product,
        crate::handlers::products::products_by_max_price,
        crate::handlers::products::in_stock_products_by_category,
    ),
    components(
        schemas(
            crate::handlers::products::ProductResponse,
            crate::services::CreateProductInput,
            crate::services::UpdateProductInput,
            crate::entities::product::Category,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
