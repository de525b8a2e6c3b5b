//! CLI command implementations.

pub mod clear_orders;
pub mod migrate;
pub mod seed;

use secrecy::SecretString;

/// Resolve the database URL from the environment.
///
/// Prefers `RETAILRADAR_DATABASE_URL`, falling back to the generic
/// `DATABASE_URL` (used by managed postgres attach).
pub(crate) fn database_url() -> Result<SecretString, Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    std::env::var("RETAILRADAR_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| "RETAILRADAR_DATABASE_URL not set".into())
}
