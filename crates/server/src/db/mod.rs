//! Repositories over the `retail_radar` `PostgreSQL` database.
//!
//! One repository per aggregate: [`UserRepository`], [`StoreRepository`],
//! [`ProductRepository`], and [`OrderRepository`]. Each borrows the shared
//! pool and exposes typed methods; SQL stays inside this module.
//!
//! Tables: `app_user`, `store`, `product`, `customer_order`, `order_item`.
//! Schema changes live in `crates/server/migrations/` and are applied with
//! `cargo run -p retail-radar-cli -- migrate`, never at server startup.

pub mod orders;
pub mod products;
pub mod stores;
pub mod users;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use stores::StoreRepository;
pub use users::UserRepository;

/// Errors surfaced by repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The requested row does not exist.
    #[error("not found")]
    NotFound,

    /// An insert or update hit a constraint, such as the unique email.
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// A stored value no longer parses into its domain type.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Anything else sqlx reports.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Open the shared connection pool.
///
/// Sized for a single-node deployment: at most 10 connections, 2 kept warm,
/// and a 10 second acquire timeout so a saturated pool fails requests
/// instead of queueing them forever.
///
/// # Errors
///
/// Returns `sqlx::Error` when the initial connection cannot be established.
pub async fn create_pool(database_url: &SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
