//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for Catalog API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "Student and product catalog API backed by MongoDB",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    nest(
        (path = "/products", api = domain_products::ApiDoc),
        (path = "/students", api = domain_students::ApiDoc)
    ),
    tags(
        (name = "Products", description = "Product and variant management endpoints"),
        (name = "Students", description = "Student management endpoints")
    )
)]
pub struct ApiDoc;
