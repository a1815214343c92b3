//! HTTP handlers for the Products API

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestObjectIdResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
    ObjectIdPath, ValidatedJson,
};
use mongodb::bson::oid::ObjectId;
use serde::Serialize;
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, CreateVariant, Product, ProductVariantsView, UpdateProduct, Variant, VariantView};
use crate::repository::ProductRepository;
use crate::service::ProductService;

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        variant_projection,
        products_by_category,
        get_product,
        update_product,
        delete_product,
        add_variant,
        delete_variant,
    ),
    components(
        schemas(
            Product, Variant, CreateProduct, CreateVariant, UpdateProduct,
            ProductVariantsView, VariantView, ProductEnvelope, ProductList,
            CategoryProductList, VariantProjectionList, CategoryNotFound
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestObjectIdResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Product and variant management endpoints")
    )
)]
pub struct ApiDoc;

/// Mutation response carrying the affected product
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductEnvelope {
    pub message: String,
    pub product: Product,
}

/// Counted product listing
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductList {
    pub count: usize,
    pub products: Vec<Product>,
}

/// Counted product listing scoped to a category search
#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryProductList {
    pub count: usize,
    pub category: String,
    pub products: Vec<Product>,
}

/// Counted projection listing with stock-less variants
#[derive(Debug, Serialize, ToSchema)]
pub struct VariantProjectionList {
    pub count: usize,
    pub message: String,
    pub products: Vec<ProductVariantsView>,
}

/// Body of the 404 returned when a category search matches nothing
#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryNotFound {
    pub message: String,
    pub products: Vec<Product>,
}

/// Create the products router with all HTTP endpoints
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/projection/variants", get(variant_projection))
        .route("/category/{category}", get(products_by_category))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/{id}/variants", post(add_variant))
        .route("/{id}/variants/{variant_id}", delete(delete_variant))
        .with_state(shared_service)
}

/// List all products, newest first
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    responses(
        (status = 200, description = "Counted product listing", body = ProductList),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
) -> ProductResult<Json<ProductList>> {
    let products = service.list_products().await?;
    Ok(Json(ProductList {
        count: products.len(),
        products,
    }))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created successfully", body = ProductEnvelope),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> ProductResult<impl IntoResponse> {
    let product = service.create_product(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ProductEnvelope {
            message: "Product created successfully".to_string(),
            product,
        }),
    ))
}

/// List products with variants reduced to color and size
#[utoipa::path(
    get,
    path = "/projection/variants",
    tag = "Products",
    responses(
        (status = 200, description = "Projection listing", body = VariantProjectionList),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn variant_projection<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
) -> ProductResult<Json<VariantProjectionList>> {
    let products = service.variant_projection().await?;
    Ok(Json(VariantProjectionList {
        count: products.len(),
        message: "Products with variant details (color and size only)".to_string(),
        products,
    }))
}

/// Find products by case-insensitive category substring
#[utoipa::path(
    get,
    path = "/category/{category}",
    tag = "Products",
    params(
        ("category" = String, Path, description = "Category search text")
    ),
    responses(
        (status = 200, description = "Matching products", body = CategoryProductList),
        (status = 404, description = "No products in category", body = CategoryNotFound),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn products_by_category<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(category): Path<String>,
) -> ProductResult<Response> {
    let products = service.products_by_category(&category).await?;

    if products.is_empty() {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(CategoryNotFound {
                message: format!("No products found in category: {}", category),
                products: vec![],
            }),
        )
            .into_response());
    }

    Ok(Json(CategoryProductList {
        count: products.len(),
        category,
        products,
    })
    .into_response())
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product ID (24-character hex)")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
) -> ProductResult<Json<Product>> {
    let product = service.get_product(id).await?;
    Ok(Json(product))
}

/// Partially update a product
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product ID (24-character hex)")
    ),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated successfully", body = ProductEnvelope),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
    ValidatedJson(input): ValidatedJson<UpdateProduct>,
) -> ProductResult<Json<ProductEnvelope>> {
    let product = service.update_product(id, input).await?;
    Ok(Json(ProductEnvelope {
        message: "Product updated successfully".to_string(),
        product,
    }))
}

/// Delete a product, returning the deleted document
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product ID (24-character hex)")
    ),
    responses(
        (status = 200, description = "Product deleted successfully", body = ProductEnvelope),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
) -> ProductResult<Json<ProductEnvelope>> {
    let product = service.delete_product(id).await?;
    Ok(Json(ProductEnvelope {
        message: "Product deleted successfully".to_string(),
        product,
    }))
}

/// Append a variant to a product
#[utoipa::path(
    post,
    path = "/{id}/variants",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product ID (24-character hex)")
    ),
    request_body = CreateVariant,
    responses(
        (status = 200, description = "Variant added successfully", body = ProductEnvelope),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn add_variant<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
    ValidatedJson(input): ValidatedJson<CreateVariant>,
) -> ProductResult<Json<ProductEnvelope>> {
    let product = service.add_variant(id, input).await?;
    Ok(Json(ProductEnvelope {
        message: "Variant added successfully".to_string(),
        product,
    }))
}

/// Remove a variant from a product
#[utoipa::path(
    delete,
    path = "/{id}/variants/{variant_id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product ID (24-character hex)"),
        ("variant_id" = String, Path, description = "Variant ID (24-character hex)")
    ),
    responses(
        (status = 200, description = "Variant deleted successfully", body = ProductEnvelope),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_variant<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path((id, variant_id)): Path<(String, String)>,
) -> ProductResult<Json<ProductEnvelope>> {
    let id = ObjectId::parse_str(&id).map_err(|_| ProductError::InvalidId(id.clone()))?;
    let variant_id = ObjectId::parse_str(&variant_id)
        .map_err(|_| ProductError::InvalidId(variant_id.clone()))?;

    let product = service.remove_variant(id, variant_id).await?;
    Ok(Json(ProductEnvelope {
        message: "Variant deleted successfully".to_string(),
        product,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockProductRepository;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use mockall::predicate::eq;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn json_body(response: Response) -> Value {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        serde_json::from_slice(&bytes).expect("valid json")
    }

    fn sample_product() -> Product {
        Product::new(CreateProduct {
            name: "Trail Jacket".to_string(),
            price: 89.99,
            category: "outdoor".to_string(),
            variants: vec![CreateVariant {
                color: "green".to_string(),
                size: "M".to_string(),
                stock: 5,
            }],
        })
    }

    fn app(repo: MockProductRepository) -> Router {
        router(ProductService::new(repo))
    }

    #[tokio::test]
    async fn test_create_product_returns_201_with_envelope() {
        let mut repo = MockProductRepository::new();
        repo.expect_create()
            .times(1)
            .returning(|input| Ok(Product::new(input)));

        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({
                    "name": "Trail Jacket",
                    "price": 89.99,
                    "category": "outdoor",
                    "variants": [{"color": "green", "size": "M", "stock": 5}]
                })
                .to_string(),
            ))
            .expect("request");

        let response = app(repo).oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = json_body(response).await;
        assert_eq!(body["message"], "Product created successfully");
        assert_eq!(body["product"]["name"], "Trail Jacket");
        assert_eq!(body["product"]["variants"][0]["stock"], 5);
    }

    #[tokio::test]
    async fn test_create_product_with_short_name_returns_400() {
        let mut repo = MockProductRepository::new();
        repo.expect_create().never();

        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({"name": "ab", "price": 1.0, "category": "outdoor"}).to_string(),
            ))
            .expect("request");

        let response = app(repo).oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_product_with_variant_missing_stock_returns_400() {
        let mut repo = MockProductRepository::new();
        repo.expect_create().never();

        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({
                    "name": "Trail Jacket",
                    "price": 89.99,
                    "category": "outdoor",
                    "variants": [{"color": "green", "size": "M"}]
                })
                .to_string(),
            ))
            .expect("request");

        let response = app(repo).oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_product_missing_name_returns_400() {
        let mut repo = MockProductRepository::new();
        repo.expect_create().never();

        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({"price": 10.0, "category": "outdoor"}).to_string(),
            ))
            .expect("request");

        let response = app(repo).oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_products_returns_counted_listing() {
        let mut repo = MockProductRepository::new();
        repo.expect_list_all()
            .times(1)
            .returning(|| Ok(vec![sample_product(), sample_product()]));

        let request = Request::builder()
            .uri("/")
            .body(Body::empty())
            .expect("request");

        let response = app(repo).oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["count"], 2);
        assert_eq!(body["products"].as_array().map(|a| a.len()), Some(2));
    }

    #[tokio::test]
    async fn test_variant_projection_omits_stock() {
        let mut repo = MockProductRepository::new();
        repo.expect_list_variant_projection().times(1).returning(|| {
            Ok(vec![ProductVariantsView {
                id: ObjectId::new().to_hex(),
                name: "Trail Jacket".to_string(),
                category: "outdoor".to_string(),
                variants: vec![VariantView {
                    id: ObjectId::new().to_hex(),
                    color: "green".to_string(),
                    size: "M".to_string(),
                }],
            }])
        });

        let request = Request::builder()
            .uri("/projection/variants")
            .body(Body::empty())
            .expect("request");

        let response = app(repo).oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["count"], 1);
        assert_eq!(
            body["message"],
            "Products with variant details (color and size only)"
        );
        assert!(body["products"][0]["variants"][0].get("stock").is_none());
    }

    #[tokio::test]
    async fn test_category_with_matches_returns_counted_listing() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_category()
            .with(eq("OUT"))
            .times(1)
            .returning(|_| Ok(vec![sample_product()]));

        let request = Request::builder()
            .uri("/category/OUT")
            .body(Body::empty())
            .expect("request");

        let response = app(repo).oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["category"], "OUT");
    }

    #[tokio::test]
    async fn test_category_without_matches_returns_404_with_empty_list() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_category()
            .times(1)
            .returning(|_| Ok(vec![]));

        let request = Request::builder()
            .uri("/category/nonexistent")
            .body(Body::empty())
            .expect("request");

        let response = app(repo).oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = json_body(response).await;
        assert_eq!(
            body["message"],
            "No products found in category: nonexistent"
        );
        assert_eq!(body["products"], json!([]));
    }

    #[tokio::test]
    async fn test_get_product_with_malformed_id_returns_400() {
        let mut repo = MockProductRepository::new();
        repo.expect_get_by_id().never();

        let request = Request::builder()
            .uri("/not-a-hex-id")
            .body(Body::empty())
            .expect("request");

        let response = app(repo).oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_product_unknown_id_returns_404() {
        let id = ObjectId::new();
        let mut repo = MockProductRepository::new();
        repo.expect_get_by_id()
            .with(eq(id))
            .times(1)
            .returning(|_| Ok(None));

        let request = Request::builder()
            .uri(format!("/{}", id.to_hex()))
            .body(Body::empty())
            .expect("request");

        let response = app(repo).oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_product_returns_raw_document() {
        let product = sample_product();
        let id = ObjectId::parse_str(&product.id).expect("hex id");
        let mut repo = MockProductRepository::new();
        let returned = product.clone();
        repo.expect_get_by_id()
            .with(eq(id))
            .times(1)
            .returning(move |_| Ok(Some(returned.clone())));

        let request = Request::builder()
            .uri(format!("/{}", product.id))
            .body(Body::empty())
            .expect("request");

        let response = app(repo).oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        // raw document, no envelope
        assert!(body.get("message").is_none());
        assert_eq!(body["_id"], product.id);
    }

    #[tokio::test]
    async fn test_update_product_returns_envelope() {
        let id = ObjectId::new();
        let mut repo = MockProductRepository::new();
        repo.expect_update()
            .times(1)
            .returning(|_, input| {
                let mut product = sample_product();
                product.apply_update(input);
                Ok(product)
            });

        let request = Request::builder()
            .method("PUT")
            .uri(format!("/{}", id.to_hex()))
            .header("content-type", "application/json")
            .body(Body::from(json!({"price": 120.0}).to_string()))
            .expect("request");

        let response = app(repo).oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["message"], "Product updated successfully");
        assert_eq!(body["product"]["price"], 120.0);
    }

    #[tokio::test]
    async fn test_delete_product_returns_deleted_document() {
        let product = sample_product();
        let id = ObjectId::parse_str(&product.id).expect("hex id");
        let mut repo = MockProductRepository::new();
        let returned = product.clone();
        repo.expect_delete()
            .with(eq(id))
            .times(1)
            .returning(move |_| Ok(returned.clone()));

        let request = Request::builder()
            .method("DELETE")
            .uri(format!("/{}", product.id))
            .body(Body::empty())
            .expect("request");

        let response = app(repo).oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["message"], "Product deleted successfully");
        assert_eq!(body["product"]["_id"], product.id);
    }

    #[tokio::test]
    async fn test_add_variant_returns_envelope() {
        let id = ObjectId::new();
        let mut repo = MockProductRepository::new();
        repo.expect_add_variant()
            .times(1)
            .returning(|_, input| {
                let mut product = sample_product();
                product.push_variant(input);
                Ok(product)
            });

        let request = Request::builder()
            .method("POST")
            .uri(format!("/{}/variants", id.to_hex()))
            .header("content-type", "application/json")
            .body(Body::from(
                json!({"color": "black", "size": "XL", "stock": 3}).to_string(),
            ))
            .expect("request");

        let response = app(repo).oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["message"], "Variant added successfully");
        assert_eq!(body["product"]["variants"][1]["color"], "black");
    }

    #[tokio::test]
    async fn test_delete_variant_with_malformed_variant_id_returns_400() {
        let mut repo = MockProductRepository::new();
        repo.expect_remove_variant().never();

        let request = Request::builder()
            .method("DELETE")
            .uri(format!("/{}/variants/short", ObjectId::new().to_hex()))
            .body(Body::empty())
            .expect("request");

        let response = app(repo).oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_variant_with_unknown_variant_id_still_succeeds() {
        let id = ObjectId::new();
        let variant_id = ObjectId::new();
        let mut repo = MockProductRepository::new();
        repo.expect_remove_variant()
            .with(eq(id), eq(variant_id))
            .times(1)
            .returning(|_, _| Ok(sample_product()));

        let request = Request::builder()
            .method("DELETE")
            .uri(format!("/{}/variants/{}", id.to_hex(), variant_id.to_hex()))
            .body(Body::empty())
            .expect("request");

        let response = app(repo).oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["message"], "Variant deleted successfully");
    }
}
