//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! rr-cli migrate
//! ```
//!
//! Migration files live in `crates/server/migrations/` and are embedded at
//! compile time, so the binary runs without the source tree present.

use tracing::info;

use crate::commands::database_url;

/// Run all pending database migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails,
/// or a migration fails to apply.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let database_url = database_url()?;

    info!("Connecting to database...");
    let pool = retail_radar_server::db::create_pool(&database_url).await?;

    info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    info!("Migrations complete!");
    Ok(())
}
