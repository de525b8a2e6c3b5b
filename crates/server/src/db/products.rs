//! Product repository for database operations.
//!
//! Queries join the owning store so responses can embed a store summary, and
//! carry the store's `owner_id` so handlers can run ownership checks without
//! an extra lookup.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, instrument};

use retail_radar_core::{ProductId, StoreId, UserId};

use super::RepositoryError;
use crate::models::product::{Product, ProductStoreSummary};

/// Raw `product` row joined with its store's display and contact fields.
#[derive(Debug, Clone, sqlx::FromRow)]
struct ProductWithStoreRow {
    id: i32,
    name: String,
    description: String,
    price: Decimal,
    category: String,
    stock: i32,
    image_url: Option<String>,
    store_id: i32,
    is_available: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    store_name: String,
    store_locality: String,
    store_address: String,
    store_phone: String,
    store_email: String,
    store_owner_id: i32,
}

/// A product paired with its store summary and the store's owner.
#[derive(Debug, Clone)]
pub struct ProductWithStore {
    pub product: Product,
    pub store: ProductStoreSummary,
    /// Owner of the store this product belongs to, for ownership checks.
    pub store_owner_id: UserId,
}

impl From<ProductWithStoreRow> for ProductWithStore {
    fn from(row: ProductWithStoreRow) -> Self {
        Self {
            product: Product {
                id: ProductId::new(row.id),
                name: row.name,
                description: row.description,
                price: row.price,
                category: row.category,
                stock: row.stock,
                image_url: row.image_url,
                store_id: StoreId::new(row.store_id),
                is_available: row.is_available,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            store: ProductStoreSummary {
                id: StoreId::new(row.store_id),
                name: row.store_name,
                locality: row.store_locality,
                address: row.store_address,
                phone: Some(row.store_phone),
                email: Some(row.store_email),
            },
            store_owner_id: UserId::new(row.store_owner_id),
        }
    }
}

/// Filters accepted by the public product listing.
#[derive(Debug, Default)]
pub struct ProductListFilter {
    /// Restrict to a single store.
    pub store: Option<StoreId>,
    /// Case-insensitive substring match on category.
    pub category: Option<String>,
    /// Case-insensitive substring match on name, description, or category.
    pub search: Option<String>,
}

/// Field set accepted by both create and update.
///
/// Updates replace every field; the owning store is fixed at creation and
/// cannot be changed afterwards.
#[derive(Debug)]
pub struct ProductFields {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
    pub stock: i32,
    pub image_url: Option<String>,
}

const PRODUCT_WITH_STORE_COLUMNS: &str = r"
    p.id, p.name, p.description, p.price, p.category, p.stock, p.image_url,
    p.store_id, p.is_available, p.created_at, p.updated_at,
    s.name AS store_name, s.locality AS store_locality, s.address AS store_address,
    s.phone AS store_phone, s.email AS store_email, s.owner_id AS store_owner_id
";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List available products, newest first, with the total match count.
    ///
    /// `limit` and `offset` implement the page/limit contract of the public
    /// listing; the count ignores them so callers can compute page totals.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either query fails.
    #[instrument(skip(self, filter), fields(store = ?filter.store, category = ?filter.category, search = ?filter.search))]
    pub async fn list_available(
        &self,
        filter: &ProductListFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ProductWithStore>, i64), RepositoryError> {
        const FILTER_CLAUSE: &str = r"
            WHERE p.is_available = TRUE
              AND ($1::int4 IS NULL OR p.store_id = $1)
              AND ($2::text IS NULL OR p.category ILIKE '%' || $2 || '%')
              AND ($3::text IS NULL
                   OR p.name ILIKE '%' || $3 || '%'
                   OR p.description ILIKE '%' || $3 || '%'
                   OR p.category ILIKE '%' || $3 || '%')
        ";

        let rows = sqlx::query_as::<_, ProductWithStoreRow>(&format!(
            r"
            SELECT {PRODUCT_WITH_STORE_COLUMNS}
            FROM product p
            JOIN store s ON s.id = p.store_id
            {FILTER_CLAUSE}
            ORDER BY p.created_at DESC, p.id DESC
            LIMIT $4 OFFSET $5
            ",
        ))
        .bind(filter.store)
        .bind(filter.category.as_deref())
        .bind(filter.search.as_deref())
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        let (total,): (i64,) = sqlx::query_as(&format!(
            r"
            SELECT COUNT(*)
            FROM product p
            {FILTER_CLAUSE}
            ",
        ))
        .bind(filter.store)
        .bind(filter.category.as_deref())
        .bind(filter.search.as_deref())
        .fetch_one(self.pool)
        .await?;

        debug!(count = rows.len(), total, "Listed available products");
        Ok((rows.into_iter().map(ProductWithStore::from).collect(), total))
    }

    /// List every product across all stores of one owner, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_owner(
        &self,
        owner_id: UserId,
    ) -> Result<Vec<ProductWithStore>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductWithStoreRow>(&format!(
            r"
            SELECT {PRODUCT_WITH_STORE_COLUMNS}
            FROM product p
            JOIN store s ON s.id = p.store_id
            WHERE s.owner_id = $1
            ORDER BY p.created_at DESC, p.id DESC
            ",
        ))
        .bind(owner_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(ProductWithStore::from).collect())
    }

    /// Get a product by ID with its store expanded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_store(
        &self,
        id: ProductId,
    ) -> Result<Option<ProductWithStore>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductWithStoreRow>(&format!(
            r"
            SELECT {PRODUCT_WITH_STORE_COLUMNS}
            FROM product p
            JOIN store s ON s.id = p.store_id
            WHERE p.id = $1
            ",
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(ProductWithStore::from))
    }

    /// Create a product under the given store.
    ///
    /// The caller must have verified that the store belongs to the requester.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self, store_id, fields), fields(store_id = store_id.as_i32(), name = %fields.name))]
    pub async fn create(
        &self,
        store_id: StoreId,
        fields: ProductFields,
    ) -> Result<ProductWithStore, RepositoryError> {
        let row = sqlx::query_as::<_, ProductWithStoreRow>(&format!(
            r"
            WITH p AS (
                INSERT INTO product (name, description, category, price, stock, image_url, store_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING *
            )
            SELECT {PRODUCT_WITH_STORE_COLUMNS}
            FROM p
            JOIN store s ON s.id = p.store_id
            ",
        ))
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(&fields.category)
        .bind(fields.price)
        .bind(fields.stock)
        .bind(fields.image_url.as_deref())
        .bind(store_id.as_i32())
        .fetch_one(self.pool)
        .await?;

        let created = ProductWithStore::from(row);
        debug!(product_id = created.product.id.as_i32(), "Created product");
        Ok(created)
    }

    /// Replace every editable field of a product.
    ///
    /// Ownership must be checked by the caller beforehand.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        fields: ProductFields,
    ) -> Result<ProductWithStore, RepositoryError> {
        let row = sqlx::query_as::<_, ProductWithStoreRow>(&format!(
            r"
            WITH p AS (
                UPDATE product
                SET name = $2, description = $3, category = $4, price = $5,
                    stock = $6, image_url = $7, updated_at = now()
                WHERE id = $1
                RETURNING *
            )
            SELECT {PRODUCT_WITH_STORE_COLUMNS}
            FROM p
            JOIN store s ON s.id = p.store_id
            ",
        ))
        .bind(id.as_i32())
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(&fields.category)
        .bind(fields.price)
        .bind(fields.stock)
        .bind(fields.image_url.as_deref())
        .fetch_optional(self.pool)
        .await?;

        row.map_or(Err(RepositoryError::NotFound), |r| {
            Ok(ProductWithStore::from(r))
        })
    }

    /// Delete a product.
    ///
    /// Order lines that reference it keep their captured name-free snapshot;
    /// the foreign key clears their product reference.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM product WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
