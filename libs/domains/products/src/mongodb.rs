//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::IndexOptions,
    Collection, Database, IndexModel,
};
use tracing::instrument;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, CreateVariant, Product, ProductVariantsView, UpdateProduct};
use crate::repository::ProductRepository;

/// MongoDB implementation of the ProductRepository
pub struct MongoProductRepository {
    collection: Collection<Product>,
}

impl MongoProductRepository {
    /// Create a new MongoProductRepository
    pub fn new(db: &Database) -> Self {
        let collection = db.collection::<Product>("products");
        Self { collection }
    }

    /// Create a new MongoProductRepository with a custom collection name
    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        let collection = db.collection::<Product>(collection_name);
        Self { collection }
    }

    /// Initialize indexes for optimal query performance
    pub async fn init_indexes(&self) -> ProductResult<()> {
        let indexes = vec![
            // Newest-first listing
            IndexModel::builder()
                .keys(doc! { "createdAt": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_created_at".to_string())
                        .build(),
                )
                .build(),
            // Category lookups
            IndexModel::builder()
                .keys(doc! { "category": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_category".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Product indexes created successfully");
        Ok(())
    }

    /// Get the underlying collection for advanced operations
    pub fn collection(&self) -> &Collection<Product> {
        &self.collection
    }

    async fn fetch_required(&self, id: ObjectId) -> ProductResult<Product> {
        self.collection
            .find_one(doc! { "_id": id.to_hex() })
            .await?
            .ok_or(ProductError::NotFound)
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let product = Product::new(input);

        self.collection.insert_one(&product).await?;

        tracing::info!(product_id = %product.id, "Product created successfully");
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: ObjectId) -> ProductResult<Option<Product>> {
        let product = self
            .collection
            .find_one(doc! { "_id": id.to_hex() })
            .await?;
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> ProductResult<Vec<Product>> {
        use futures_util::TryStreamExt;

        let options = mongodb::options::FindOptions::builder()
            .sort(doc! { "createdAt": -1 })
            .build();

        let cursor = self.collection.find(doc! {}).with_options(options).await?;
        let products: Vec<Product> = cursor.try_collect().await?;

        Ok(products)
    }

    #[instrument(skip(self))]
    async fn find_by_category(&self, category: &str) -> ProductResult<Vec<Product>> {
        use futures_util::TryStreamExt;

        let escaped = regex_escape(category);
        let filter = doc! {
            "category": { "$regex": escaped, "$options": "i" }
        };

        let options = mongodb::options::FindOptions::builder()
            .sort(doc! { "createdAt": -1 })
            .build();

        let cursor = self.collection.find(filter).with_options(options).await?;
        let products: Vec<Product> = cursor.try_collect().await?;

        Ok(products)
    }

    #[instrument(skip(self))]
    async fn list_variant_projection(&self) -> ProductResult<Vec<ProductVariantsView>> {
        use futures_util::TryStreamExt;

        let options = mongodb::options::FindOptions::builder()
            .projection(doc! {
                "name": 1,
                "category": 1,
                "variants._id": 1,
                "variants.color": 1,
                "variants.size": 1,
            })
            .sort(doc! { "createdAt": -1 })
            .build();

        let cursor = self
            .collection
            .clone_with_type::<ProductVariantsView>()
            .find(doc! {})
            .with_options(options)
            .await?;
        let views: Vec<ProductVariantsView> = cursor.try_collect().await?;

        Ok(views)
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: ObjectId, input: UpdateProduct) -> ProductResult<Product> {
        let mut updated = self.fetch_required(id).await?;
        updated.apply_update(input);

        self.collection
            .replace_one(doc! { "_id": id.to_hex() }, &updated)
            .await?;

        tracing::info!(product_id = %id, "Product updated successfully");
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ObjectId) -> ProductResult<Product> {
        let deleted = self
            .collection
            .find_one_and_delete(doc! { "_id": id.to_hex() })
            .await?
            .ok_or(ProductError::NotFound)?;

        tracing::info!(product_id = %id, "Product deleted successfully");
        Ok(deleted)
    }

    #[instrument(skip(self, input))]
    async fn add_variant(&self, id: ObjectId, input: CreateVariant) -> ProductResult<Product> {
        let mut updated = self.fetch_required(id).await?;
        updated.push_variant(input);

        self.collection
            .replace_one(doc! { "_id": id.to_hex() }, &updated)
            .await?;

        tracing::info!(product_id = %id, "Variant added successfully");
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn remove_variant(&self, id: ObjectId, variant_id: ObjectId) -> ProductResult<Product> {
        let mut updated = self.fetch_required(id).await?;
        updated.remove_variant(&variant_id.to_hex());

        self.collection
            .replace_one(doc! { "_id": id.to_hex() }, &updated)
            .await?;

        tracing::info!(product_id = %id, variant_id = %variant_id, "Variant removed");
        Ok(updated)
    }
}

/// Escape regex metacharacters so category search is a literal substring match
fn regex_escape(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(
            c,
            '.' | '^' | '$' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '\\'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regex_escape_plain_text() {
        assert_eq!(regex_escape("outdoor"), "outdoor");
    }

    #[test]
    fn test_regex_escape_metacharacters() {
        assert_eq!(regex_escape("a.b*c"), "a\\.b\\*c");
        assert_eq!(regex_escape("(x)"), "\\(x\\)");
    }

    // Integration tests below require a running MongoDB instance.
    // Run with: cargo test -- --ignored

    #[tokio::test]
    #[ignore]
    async fn test_create_and_fetch_roundtrip() {
        use crate::models::{CreateProduct, CreateVariant};

        let client = mongodb::Client::with_uri_str("mongodb://localhost:27017")
            .await
            .expect("connect");
        let db = client.database("catalog_test");
        let repo = MongoProductRepository::with_collection(&db, "products_test");

        let created = repo
            .create(CreateProduct {
                name: "Integration Jacket".to_string(),
                price: 49.99,
                category: "outdoor".to_string(),
                variants: vec![CreateVariant {
                    color: "green".to_string(),
                    size: "M".to_string(),
                    stock: 2,
                }],
            })
            .await
            .expect("create");

        let id = ObjectId::parse_str(&created.id).expect("hex id");
        let fetched = repo.get_by_id(id).await.expect("fetch").expect("present");
        assert_eq!(fetched.name, "Integration Jacket");
        assert_eq!(fetched.variants.len(), 1);

        let deleted = repo.delete(id).await.expect("delete");
        assert_eq!(deleted.id, created.id);
    }
}
