//! Auth service errors.

use thiserror::Error;

use crate::db::RepositoryError;

/// Failures from registration, login, and token handling.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The submitted email failed to parse.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] retail_radar_core::EmailError),

    /// Unknown email or wrong password. One variant covers both so the API
    /// cannot be used to probe which addresses have accounts.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Registration hit an email that is already taken.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Token missing a valid signature, malformed, or expired.
    #[error("invalid token")]
    InvalidToken,

    /// Token could not be signed.
    #[error("token creation failed")]
    TokenCreation,

    /// Underlying repository failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Password hashing failed.
    #[error("password hashing error")]
    PasswordHash,
}
