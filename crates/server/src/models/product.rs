//! Product domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use retail_radar_core::{ProductId, StoreId};

/// A product listed by a store (domain type).
#[derive(Debug, Clone)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Product display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Unit price. Serialized as a decimal string on the wire.
    pub price: Decimal,
    /// Category label used for filtering (stored as given, matched case-insensitively).
    pub category: String,
    /// Units currently in stock.
    pub stock: i32,
    /// Optional image URL.
    pub image_url: Option<String>,
    /// ID of the store that lists this product.
    pub store_id: StoreId,
    /// Whether the product is visible in public listings.
    pub is_available: bool,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Abbreviated store object embedded in product responses.
///
/// List endpoints carry only the fields needed to render a product card;
/// the detail endpoint fills in the store's contact details too.
#[derive(Debug, Clone, Serialize)]
pub struct ProductStoreSummary {
    pub id: StoreId,
    pub name: String,
    pub locality: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl ProductStoreSummary {
    /// Drops the contact fields for list-style responses.
    #[must_use]
    pub fn without_contact(self) -> Self {
        Self {
            phone: None,
            email: None,
            ..self
        }
    }
}

/// Wire format for a product with its store expanded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    pub stock: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub store: ProductStoreSummary,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductResponse {
    /// Combines a product with its store summary for the wire.
    #[must_use]
    pub fn from_parts(product: Product, store: ProductStoreSummary) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            category: product.category,
            stock: product.stock,
            image_url: product.image_url,
            store,
            is_available: product.is_available,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}
