use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::error::ProductResult;
use crate::models::{CreateProduct, CreateVariant, Product, ProductVariantsView, UpdateProduct};

/// Repository trait for Product persistence
///
/// This trait defines the data access interface for products.
/// Implementations can use different storage backends (MongoDB, PostgreSQL, etc.)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Create a new product
    async fn create(&self, input: CreateProduct) -> ProductResult<Product>;

    /// Get a product by ID
    async fn get_by_id(&self, id: ObjectId) -> ProductResult<Option<Product>>;

    /// List all products, newest first
    async fn list_all(&self) -> ProductResult<Vec<Product>>;

    /// Find products whose category contains the given text, case-insensitive
    async fn find_by_category(&self, category: &str) -> ProductResult<Vec<Product>>;

    /// List all products projected to name, category and stock-less variants
    async fn list_variant_projection(&self) -> ProductResult<Vec<ProductVariantsView>>;

    /// Apply a partial update to an existing product
    async fn update(&self, id: ObjectId, input: UpdateProduct) -> ProductResult<Product>;

    /// Delete a product by ID, returning the deleted document
    async fn delete(&self, id: ObjectId) -> ProductResult<Product>;

    /// Append a variant to a product
    async fn add_variant(&self, id: ObjectId, input: CreateVariant) -> ProductResult<Product>;

    /// Remove a variant from a product. Unknown variant ids are ignored.
    async fn remove_variant(&self, id: ObjectId, variant_id: ObjectId) -> ProductResult<Product>;
}
