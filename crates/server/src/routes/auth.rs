//! Authentication route handlers.
//!
//! JSON endpoints for account registration, login, and logout. Login hands
//! the JWT back both in the response body and as the `auth-token` cookie, so
//! browser and API clients share one endpoint.

use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use validator::Validate;

use retail_radar_core::Role;

use crate::error::{Result, clear_sentry_user};
use crate::middleware::{auth_cookie, clear_auth_cookie};
use crate::models::UserResponse;
use crate::services::auth::AuthService;
use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

/// Registration request body.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    /// Defaults to `customer` when omitted.
    pub role: Option<Role>,
}

/// Login request body.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response for a successful registration.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub user: UserResponse,
}

/// Response for a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub user: UserResponse,
    pub token: String,
}

/// Response for logout.
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub message: &'static str,
}

// ============================================================================
// Handlers
// ============================================================================

/// Register a new account.
///
/// POST /api/auth/register
///
/// # Errors
///
/// 400 with `details` when validation fails; 400 "User already exists" for
/// a duplicate email.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    req.validate()?;

    let auth = AuthService::new(state.pool());
    let user = auth
        .register(
            &req.name,
            &req.email,
            &req.password,
            req.role.unwrap_or_default(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User created successfully",
            user: user.into(),
        }),
    ))
}

/// Log in with email and password.
///
/// POST /api/auth/login
///
/// Sets the `auth-token` cookie and returns the token in the body.
///
/// # Errors
///
/// 400 with `details` when validation fails; 401 "Invalid credentials" for
/// an unknown email or wrong password.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>)> {
    req.validate()?;

    let auth = AuthService::new(state.pool());
    let user = auth.login(&req.email, &req.password).await?;
    let token = state.token_signer().issue(&user)?;

    let jar = jar.add(auth_cookie(token.clone()));

    Ok((
        jar,
        Json(LoginResponse {
            message: "Login successful",
            user: user.into(),
            token,
        }),
    ))
}

/// Log out by expiring the auth cookie.
///
/// POST /api/auth/logout
///
/// The token itself stays valid until expiry (stateless JWT); this clears
/// the browser cookie and the Sentry user association.
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<LogoutResponse>) {
    clear_sentry_user();

    (
        jar.add(clear_auth_cookie()),
        Json(LogoutResponse {
            message: "Logged out successfully",
        }),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn messages(err: &validator::ValidationErrors) -> Vec<String> {
        err.field_errors()
            .values()
            .flat_map(|errors| errors.iter())
            .filter_map(|e| e.message.as_ref().map(ToString::to_string))
            .collect()
    }

    #[test]
    fn test_register_request_validation() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"name": "A", "email": "not-an-email", "password": "short"}"#,
        )
        .unwrap();
        let err = req.validate().unwrap_err();
        let messages = messages(&err);
        assert!(messages.contains(&"Name must be at least 2 characters".to_string()));
        assert!(messages.contains(&"Invalid email address".to_string()));
        assert!(messages.contains(&"Password must be at least 6 characters".to_string()));
    }

    #[test]
    fn test_register_role_defaults_to_customer() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"name": "Asha", "email": "asha@example.com", "password": "secret1"}"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.role.unwrap_or_default(), Role::Customer);

        let req: RegisterRequest = serde_json::from_str(
            r#"{"name": "Asha", "email": "asha@example.com", "password": "secret1", "role": "store_owner"}"#,
        )
        .unwrap();
        assert_eq!(req.role, Some(Role::StoreOwner));
    }

    #[test]
    fn test_login_request_validation() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"email": "asha@example.com", "password": ""}"#).unwrap();
        let err = req.validate().unwrap_err();
        assert!(messages(&err).contains(&"Password is required".to_string()));

        let req: LoginRequest =
            serde_json::from_str(r#"{"email": "asha@example.com", "password": "x"}"#).unwrap();
        assert!(req.validate().is_ok());
    }
}
