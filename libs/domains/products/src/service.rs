//! Product Service - Business logic layer

use std::sync::Arc;

use mongodb::bson::oid::ObjectId;
use tracing::instrument;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, CreateVariant, Product, ProductVariantsView, UpdateProduct};
use crate::repository::ProductRepository;

/// Product service providing business logic operations
///
/// The service layer handles validation, business rules, and orchestrates
/// repository operations.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    /// Create a new ProductService with the given repository
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new product
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<Product> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        self.repository.create(input).await
    }

    /// List all products, newest first
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> ProductResult<Vec<Product>> {
        self.repository.list_all().await
    }

    /// Find products by case-insensitive category substring
    #[instrument(skip(self))]
    pub async fn products_by_category(&self, category: &str) -> ProductResult<Vec<Product>> {
        self.repository.find_by_category(category).await
    }

    /// List products projected to name, category and stock-less variants
    #[instrument(skip(self))]
    pub async fn variant_projection(&self) -> ProductResult<Vec<ProductVariantsView>> {
        self.repository.list_variant_projection().await
    }

    /// Get a product by ID
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: ObjectId) -> ProductResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound)
    }

    /// Update an existing product
    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: ObjectId, input: UpdateProduct) -> ProductResult<Product> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        self.repository.update(id, input).await
    }

    /// Delete a product, returning the deleted document
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ObjectId) -> ProductResult<Product> {
        self.repository.delete(id).await
    }

    /// Append a variant to a product
    #[instrument(skip(self, input))]
    pub async fn add_variant(&self, id: ObjectId, input: CreateVariant) -> ProductResult<Product> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        self.repository.add_variant(id, input).await
    }

    /// Remove a variant from a product. Unknown variant ids leave the
    /// product unchanged and still succeed.
    #[instrument(skip(self))]
    pub async fn remove_variant(
        &self,
        id: ObjectId,
        variant_id: ObjectId,
    ) -> ProductResult<Product> {
        self.repository.remove_variant(id, variant_id).await
    }
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockProductRepository;
    use mockall::predicate::eq;

    fn sample_create() -> CreateProduct {
        CreateProduct {
            name: "Trail Jacket".to_string(),
            price: 89.99,
            category: "outdoor".to_string(),
            variants: vec![],
        }
    }

    #[tokio::test]
    async fn test_create_product_delegates_to_repository() {
        let mut repo = MockProductRepository::new();
        repo.expect_create()
            .times(1)
            .returning(|input| Ok(Product::new(input)));

        let service = ProductService::new(repo);
        let product = service.create_product(sample_create()).await.expect("create");
        assert_eq!(product.name, "Trail Jacket");
    }

    #[tokio::test]
    async fn test_create_product_rejects_invalid_input_before_repository() {
        let mut repo = MockProductRepository::new();
        repo.expect_create().never();

        let service = ProductService::new(repo);
        let mut input = sample_create();
        input.name = "ab".to_string();

        let err = service.create_product(input).await.expect_err("invalid");
        assert!(matches!(err, ProductError::Validation(_)));
    }

    #[tokio::test]
    async fn test_get_product_maps_missing_to_not_found() {
        let id = ObjectId::new();
        let mut repo = MockProductRepository::new();
        repo.expect_get_by_id()
            .with(eq(id))
            .times(1)
            .returning(|_| Ok(None));

        let service = ProductService::new(repo);
        let err = service.get_product(id).await.expect_err("missing");
        assert!(matches!(err, ProductError::NotFound));
    }

    #[tokio::test]
    async fn test_update_product_rejects_invalid_partial_input() {
        let mut repo = MockProductRepository::new();
        repo.expect_update().never();

        let service = ProductService::new(repo);
        let input = UpdateProduct {
            price: Some(-5.0),
            ..Default::default()
        };

        let err = service
            .update_product(ObjectId::new(), input)
            .await
            .expect_err("invalid");
        assert!(matches!(err, ProductError::Validation(_)));
    }

    #[tokio::test]
    async fn test_add_variant_validates_before_repository() {
        let mut repo = MockProductRepository::new();
        repo.expect_add_variant().never();

        let service = ProductService::new(repo);
        let err = service
            .add_variant(
                ObjectId::new(),
                CreateVariant {
                    color: "x".to_string(),
                    size: "M".to_string(),
                    stock: 1,
                },
            )
            .await
            .expect_err("invalid");
        assert!(matches!(err, ProductError::Validation(_)));
    }

    #[tokio::test]
    async fn test_remove_variant_returns_updated_product() {
        let id = ObjectId::new();
        let variant_id = ObjectId::new();
        let mut repo = MockProductRepository::new();
        repo.expect_remove_variant()
            .with(eq(id), eq(variant_id))
            .times(1)
            .returning(|_, _| Ok(Product::new(sample_create())));

        let service = ProductService::new(repo);
        let product = service.remove_variant(id, variant_id).await.expect("ok");
        assert!(product.variants.is_empty());
    }
}
