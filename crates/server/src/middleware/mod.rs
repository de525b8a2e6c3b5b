//! HTTP middleware for the API server.
//!
//! Requests pass through Sentry, `TraceLayer`, request-ID tagging, and CORS
//! before reaching a route. Authentication is not a layer: handlers that
//! need a logged-in user take the [`RequireAuth`] extractor instead, so
//! public catalog routes skip token work entirely.

pub mod auth;
pub mod request_id;

pub use auth::{AUTH_COOKIE_NAME, RequireAuth, auth_cookie, clear_auth_cookie};
pub use request_id::request_id_middleware;
