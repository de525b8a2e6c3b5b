//! Order wipe command.
//!
//! # Usage
//!
//! ```bash
//! rr-cli clear-orders
//! ```

use tracing::info;

use crate::commands::database_url;

/// Delete every order and its line items.
///
/// Users, stores, and products are untouched. Stock consumed by the
/// deleted orders is NOT restored.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails,
/// or the statement fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let database_url = database_url()?;
    let pool = retail_radar_server::db::create_pool(&database_url).await?;

    info!("Clearing orders...");
    sqlx::query("TRUNCATE customer_order, order_item RESTART IDENTITY")
        .execute(&pool)
        .await?;

    info!("Orders cleared");
    Ok(())
}
