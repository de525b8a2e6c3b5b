//! Shared application state.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::services::auth::TokenSigner;

/// State handed to every handler by axum.
///
/// Clones are cheap: the configuration, pool handle, and token signer all
/// live behind one `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    config: ServerConfig,
    pool: PgPool,
    token_signer: TokenSigner,
}

impl AppState {
    /// Assemble the state, deriving the token signer from the configured
    /// JWT secret.
    #[must_use]
    pub fn new(config: ServerConfig, pool: PgPool) -> Self {
        let token_signer = TokenSigner::new(&config.jwt_secret);

        Self {
            inner: Arc::new(Inner {
                config,
                pool,
                token_signer,
            }),
        }
    }

    /// Server configuration as loaded at startup.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Handle to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Signer used to mint and verify auth tokens.
    #[must_use]
    pub fn token_signer(&self) -> &TokenSigner {
        &self.inner.token_signer
    }
}
