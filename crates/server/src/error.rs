//! Unified error handling with Sentry integration.
//!
//! Route handlers return [`Result<T>`]; every failure renders as JSON of the
//! shape `{"error": "..."}`, with a `details` array appended for field
//! validation failures. Server-side failures are captured to Sentry and
//! collapse to a generic message so internals never reach the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use retail_radar_core::{Email, UserId};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

use crate::db::RepositoryError;
use crate::policy::Denied;
use crate::services::auth::AuthError;
use crate::services::orders::OrderError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Order placement failed.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Request body failed field validation.
    #[error("Validation failed")]
    Validation(#[from] ValidationErrors),

    /// Caller is authenticated but not allowed to do this.
    #[error("{0}")]
    Forbidden(#[from] Denied),

    /// Resource not found. Holds the exact user-facing message.
    #[error("{0}")]
    NotFound(&'static str),

    /// No credentials were presented.
    #[error("Authentication required")]
    Unauthenticated,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status this error renders as.
    fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated
            | Self::Auth(AuthError::InvalidCredentials | AuthError::InvalidToken) => {
                StatusCode::UNAUTHORIZED
            }
            Self::Validation(_)
            | Self::Auth(AuthError::UserAlreadyExists | AuthError::InvalidEmail(_)) => {
                StatusCode::BAD_REQUEST
            }
            Self::Order(OrderError::Repository(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Order(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Auth(_) | Self::Database(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message placed in the response body. Wording is part of the API
    /// contract; server-side failures all collapse to one generic string.
    fn public_message(&self) -> String {
        match self {
            Self::Auth(AuthError::InvalidCredentials) => "Invalid credentials".to_string(),
            Self::Auth(AuthError::InvalidToken) => "Invalid token".to_string(),
            Self::Auth(AuthError::UserAlreadyExists) => "User already exists".to_string(),
            Self::Auth(AuthError::InvalidEmail(_)) => "Invalid email address".to_string(),
            Self::Order(err) if !matches!(err, OrderError::Repository(_)) => err.to_string(),
            Self::Validation(_) | Self::Forbidden(_) | Self::NotFound(_) | Self::Unauthenticated => {
                self.to_string()
            }
            Self::Auth(_) | Self::Database(_) | Self::Internal(_) | Self::Order(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = match &self {
            Self::Validation(errors) => json!({
                "error": self.public_message(),
                "details": validation_details(errors),
            }),
            _ => json!({ "error": self.public_message() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Flatten validator output into `{field, message}` entries for the
/// `details` array.
fn validation_details(errors: &ValidationErrors) -> Vec<serde_json::Value> {
    errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(move |err| {
                let message = err
                    .message
                    .as_ref()
                    .map_or_else(|| err.code.to_string(), ToString::to_string);
                json!({ "field": field, "message": message })
            })
        })
        .collect()
}

/// Attach the authenticated user to the Sentry scope so captured errors
/// carry who hit them. Called by the auth middleware once per request.
pub fn set_sentry_user(id: UserId, email: &Email) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(id.to_string()),
            email: Some(email.as_str().to_owned()),
            ..Default::default()
        }));
    });
}

/// Drop the user from the Sentry scope on logout.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("Store not found");
        assert_eq!(err.to_string(), "Store not found");

        let err = AppError::Unauthenticated;
        assert_eq!(err.to_string(), "Authentication required");
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::NotFound("Product not found"), StatusCode::NOT_FOUND),
            (AppError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (
                AppError::Auth(AuthError::InvalidCredentials),
                StatusCode::UNAUTHORIZED,
            ),
            (
                AppError::Auth(AuthError::UserAlreadyExists),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::Order(OrderError::ItemsRequired),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::Internal("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::Database(RepositoryError::NotFound),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.status(), expected, "wrong status for {err}");
        }
    }

    #[test]
    fn test_server_errors_do_not_leak_details() {
        let err = AppError::Internal("connection pool exhausted".to_string());
        assert_eq!(err.public_message(), "Internal server error");

        let err = AppError::Database(RepositoryError::NotFound);
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[test]
    fn test_order_errors_pass_their_message_through() {
        let err = AppError::Order(OrderError::InsufficientStock("Cup Noodles".to_string()));
        assert_eq!(err.public_message(), "Insufficient stock for Cup Noodles");
    }

    #[test]
    fn test_validation_details_use_custom_messages() {
        let mut errors = ValidationErrors::new();
        let mut err = ValidationError::new("length");
        err.message = Some("Name must be at least 2 characters".into());
        errors.add("name", err);

        let details = validation_details(&errors);
        assert_eq!(details.len(), 1);
        let entry = details.first().unwrap();
        assert_eq!(entry["field"], "name");
        assert_eq!(entry["message"], "Name must be at least 2 characters");
    }
}
