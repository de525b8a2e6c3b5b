//! Authentication extractor and auth-token cookie helpers.
//!
//! Browsers carry the JWT in the `auth-token` cookie set at login; API
//! clients send it as a `Bearer` token instead. The cookie wins when both
//! are present.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::error::{AppError, set_sentry_user};
use crate::models::CurrentUser;
use crate::services::auth::TOKEN_TTL_DAYS;
use crate::state::AppState;

/// Cookie that carries the auth token for browser clients.
pub const AUTH_COOKIE_NAME: &str = "auth-token";

/// Cookie lifetime, matching the token's expiry.
const AUTH_COOKIE_MAX_AGE_SECS: i64 = TOKEN_TTL_DAYS * 24 * 60 * 60;

/// Extractor that requires an authenticated user.
///
/// Rejects with 401 `Authentication required` when no token is presented,
/// and 401 `Invalid token` when the token fails verification.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let token = extract_token(parts).ok_or(AppError::Unauthenticated)?;
        let user = state.token_signer().verify(&token)?;

        // Associate any errors from this request with the user
        set_sentry_user(user.id, &user.email);

        Ok(Self(user))
    }
}

/// Pull the token from the auth cookie, falling back to the
/// `Authorization: Bearer` header.
fn extract_token(parts: &Parts) -> Option<String> {
    let jar = CookieJar::from_headers(&parts.headers);
    if let Some(cookie) = jar.get(AUTH_COOKIE_NAME) {
        return Some(cookie.value().to_string());
    }

    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(String::from)
}

/// Build the login cookie holding `token`.
#[must_use]
pub fn auth_cookie(token: String) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(AUTH_COOKIE_MAX_AGE_SECS))
        .build()
}

/// Build an expired cookie that removes the auth token (logout).
#[must_use]
pub fn clear_auth_cookie() -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::ZERO)
        .build()
}
