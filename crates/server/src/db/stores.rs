//! Store repository for database operations.
//!
//! List and detail queries join the owning user so responses can expand the
//! owner without a second round trip.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, instrument};

use retail_radar_core::{Email, StoreId, UserId};

use super::RepositoryError;
use crate::models::store::Store;
use crate::models::user::UserSummary;

/// Raw `store` row joined with its owner's name and email.
#[derive(Debug, Clone, sqlx::FromRow)]
struct StoreWithOwnerRow {
    id: i32,
    name: String,
    description: String,
    address: String,
    locality: String,
    phone: String,
    email: String,
    owner_id: i32,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    owner_name: String,
    owner_email: String,
}

/// A store paired with its owner summary.
#[derive(Debug, Clone)]
pub struct StoreWithOwner {
    pub store: Store,
    pub owner: UserSummary,
}

impl TryFrom<StoreWithOwnerRow> for StoreWithOwner {
    type Error = RepositoryError;

    fn try_from(row: StoreWithOwnerRow) -> Result<Self, Self::Error> {
        let owner_email = Email::parse(&row.owner_email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid owner email in database: {e}"))
        })?;

        Ok(Self {
            store: Store {
                id: StoreId::new(row.id),
                name: row.name,
                description: row.description,
                address: row.address,
                locality: row.locality,
                phone: row.phone,
                email: row.email,
                owner_id: UserId::new(row.owner_id),
                is_active: row.is_active,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            owner: UserSummary {
                id: UserId::new(row.owner_id),
                name: row.owner_name,
                email: owner_email,
            },
        })
    }
}

/// Field set accepted by both create and update.
///
/// Updates replace every field, matching the full-body PUT contract.
#[derive(Debug)]
pub struct StoreFields {
    pub name: String,
    pub description: String,
    pub address: String,
    pub locality: String,
    pub phone: String,
    pub email: String,
}

const STORE_WITH_OWNER_COLUMNS: &str = r"
    s.id, s.name, s.description, s.address, s.locality, s.phone, s.email,
    s.owner_id, s.is_active, s.created_at, s.updated_at,
    u.name AS owner_name, u.email AS owner_email
";

/// Repository for store database operations.
pub struct StoreRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StoreRepository<'a> {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List active stores, newest first.
    ///
    /// `locality` and `search` are case-insensitive substring filters;
    /// `search` matches against name and description.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self, locality, search), fields(locality = ?locality, search = ?search))]
    pub async fn list_active(
        &self,
        locality: Option<&str>,
        search: Option<&str>,
    ) -> Result<Vec<StoreWithOwner>, RepositoryError> {
        let rows = sqlx::query_as::<_, StoreWithOwnerRow>(&format!(
            r"
            SELECT {STORE_WITH_OWNER_COLUMNS}
            FROM store s
            JOIN app_user u ON u.id = s.owner_id
            WHERE s.is_active = TRUE
              AND ($1::text IS NULL OR s.locality ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL
                   OR s.name ILIKE '%' || $2 || '%'
                   OR s.description ILIKE '%' || $2 || '%')
            ORDER BY s.created_at DESC, s.id DESC
            ",
        ))
        .bind(locality)
        .bind(search)
        .fetch_all(self.pool)
        .await?;

        debug!(count = rows.len(), "Listed active stores");
        rows.into_iter().map(StoreWithOwner::try_from).collect()
    }

    /// List every store belonging to one owner, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_owner(
        &self,
        owner_id: UserId,
    ) -> Result<Vec<StoreWithOwner>, RepositoryError> {
        let rows = sqlx::query_as::<_, StoreWithOwnerRow>(&format!(
            r"
            SELECT {STORE_WITH_OWNER_COLUMNS}
            FROM store s
            JOIN app_user u ON u.id = s.owner_id
            WHERE s.owner_id = $1
            ORDER BY s.created_at DESC, s.id DESC
            ",
        ))
        .bind(owner_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(StoreWithOwner::try_from).collect()
    }

    /// Get a store by ID with its owner expanded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_owner(
        &self,
        id: StoreId,
    ) -> Result<Option<StoreWithOwner>, RepositoryError> {
        let row = sqlx::query_as::<_, StoreWithOwnerRow>(&format!(
            r"
            SELECT {STORE_WITH_OWNER_COLUMNS}
            FROM store s
            JOIN app_user u ON u.id = s.owner_id
            WHERE s.id = $1
            ",
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(StoreWithOwner::try_from).transpose()
    }

    /// Get a store only if the given user owns it.
    ///
    /// Used by product creation, where a store ID supplied by the client must
    /// resolve to one of the caller's own stores.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_owned(
        &self,
        id: StoreId,
        owner_id: UserId,
    ) -> Result<Option<StoreWithOwner>, RepositoryError> {
        let row = sqlx::query_as::<_, StoreWithOwnerRow>(&format!(
            r"
            SELECT {STORE_WITH_OWNER_COLUMNS}
            FROM store s
            JOIN app_user u ON u.id = s.owner_id
            WHERE s.id = $1 AND s.owner_id = $2
            ",
        ))
        .bind(id.as_i32())
        .bind(owner_id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(StoreWithOwner::try_from).transpose()
    }

    /// Create a store for the given owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self, owner_id, fields), fields(owner_id = owner_id.as_i32(), name = %fields.name))]
    pub async fn create(
        &self,
        owner_id: UserId,
        fields: StoreFields,
    ) -> Result<StoreWithOwner, RepositoryError> {
        let row = sqlx::query_as::<_, StoreWithOwnerRow>(&format!(
            r"
            WITH s AS (
                INSERT INTO store (name, description, address, locality, phone, email, owner_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING *
            )
            SELECT {STORE_WITH_OWNER_COLUMNS}
            FROM s
            JOIN app_user u ON u.id = s.owner_id
            ",
        ))
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(&fields.address)
        .bind(&fields.locality)
        .bind(&fields.phone)
        .bind(&fields.email)
        .bind(owner_id.as_i32())
        .fetch_one(self.pool)
        .await?;

        let created = StoreWithOwner::try_from(row)?;
        debug!(store_id = created.store.id.as_i32(), "Created store");
        Ok(created)
    }

    /// Replace every editable field of a store.
    ///
    /// Ownership must be checked by the caller beforehand.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: StoreId,
        fields: StoreFields,
    ) -> Result<StoreWithOwner, RepositoryError> {
        let row = sqlx::query_as::<_, StoreWithOwnerRow>(&format!(
            r"
            WITH s AS (
                UPDATE store
                SET name = $2, description = $3, address = $4, locality = $5,
                    phone = $6, email = $7, updated_at = now()
                WHERE id = $1
                RETURNING *
            )
            SELECT {STORE_WITH_OWNER_COLUMNS}
            FROM s
            JOIN app_user u ON u.id = s.owner_id
            ",
        ))
        .bind(id.as_i32())
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(&fields.address)
        .bind(&fields.locality)
        .bind(&fields.phone)
        .bind(&fields.email)
        .fetch_optional(self.pool)
        .await?;

        row.map_or(Err(RepositoryError::NotFound), |r| {
            StoreWithOwner::try_from(r)
        })
    }

    /// Delete a store and all of its products in one transaction.
    ///
    /// Order lines referencing the deleted products keep their snapshot data;
    /// their product reference is cleared by the foreign key.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either delete fails.
    #[instrument(skip(self, id), fields(store_id = id.as_i32()))]
    pub async fn delete_with_products(&self, id: StoreId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let products = sqlx::query("DELETE FROM product WHERE store_id = $1")
            .bind(id.as_i32())
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM store WHERE id = $1")
            .bind(id.as_i32())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(
            products_deleted = products.rows_affected(),
            "Deleted store and its products"
        );
        Ok(())
    }
}
