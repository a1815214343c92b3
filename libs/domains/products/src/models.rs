use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Product variant - a color/size/stock combination embedded in a product
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Variant {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Variant color
    pub color: String,
    /// Variant size
    pub size: String,
    /// Stock quantity for this variant
    pub stock: i32,
}

/// Product entity - represents a product stored in MongoDB
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Product name
    pub name: String,
    /// Product price
    pub price: f64,
    /// Product category
    pub category: String,
    /// Embedded variants, in insertion order
    #[serde(default)]
    pub variants: Vec<Variant>,
    /// Creation timestamp
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a variant (standalone or inline within a product)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateVariant {
    #[validate(length(min = 2, max = 50))]
    pub color: String,
    #[validate(length(min = 1, max = 20))]
    pub size: String,
    /// Stock quantity, must be present and non-negative
    #[validate(range(min = 0))]
    pub stock: i32,
}

/// DTO for creating a new product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(min = 3, max = 100))]
    pub name: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(length(min = 2, max = 50))]
    pub category: String,
    #[serde(default)]
    #[validate(nested)]
    pub variants: Vec<CreateVariant>,
}

/// DTO for partially updating a product
///
/// Absent fields are left untouched. A present `variants` array replaces
/// the embedded collection wholesale, minting fresh variant ids.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(length(min = 3, max = 100))]
    pub name: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[validate(length(min = 2, max = 50))]
    pub category: Option<String>,
    #[validate(nested)]
    pub variants: Option<Vec<CreateVariant>>,
}

/// Variant view for the projection listing, stock omitted
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VariantView {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub color: String,
    pub size: String,
}

/// Product view for the projection listing: name, category and reduced variants
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductVariantsView {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub variants: Vec<VariantView>,
}

impl Variant {
    /// Create a new variant from a CreateVariant DTO, minting a fresh id
    pub fn new(input: CreateVariant) -> Self {
        Self {
            id: ObjectId::new().to_hex(),
            color: input.color.trim().to_string(),
            size: input.size.trim().to_string(),
            stock: input.stock,
        }
    }
}

impl Product {
    /// Create a new product from a CreateProduct DTO
    pub fn new(input: CreateProduct) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new().to_hex(),
            name: input.name.trim().to_string(),
            price: input.price,
            category: input.category.trim().to_string(),
            variants: input.variants.into_iter().map(Variant::new).collect(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update, replacing the variants array wholesale when present
    pub fn apply_update(&mut self, update: UpdateProduct) {
        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(category) = update.category {
            self.category = category.trim().to_string();
        }
        if let Some(variants) = update.variants {
            self.variants = variants.into_iter().map(Variant::new).collect();
        }
        self.updated_at = Utc::now();
    }

    /// Append a variant with a freshly minted id
    pub fn push_variant(&mut self, input: CreateVariant) {
        self.variants.push(Variant::new(input));
        self.updated_at = Utc::now();
    }

    /// Remove a variant by id. Removing an id that is not present is a no-op.
    pub fn remove_variant(&mut self, variant_id: &str) {
        self.variants.retain(|v| v.id != variant_id);
        self.updated_at = Utc::now();
    }
}
