//! Request correlation IDs.
//!
//! Every request carries an ID that shows up in the tracing span, on the
//! Sentry scope, and in the response headers, so a log line, an error
//! event, and a client bug report can all be matched to one request.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

/// Header checked for an upstream-assigned ID and used to echo it back.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Tags every request with a correlation ID.
///
/// Honors an `x-request-id` set by an upstream proxy so the ID stays stable
/// across hops; otherwise mints a UUID v4.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = correlation_id(request.headers());

    Span::current().record("request_id", &request_id);
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    // Echo the ID so clients can quote it in bug reports
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// The upstream ID when present and readable, else a fresh UUID.
fn correlation_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), str::to_owned)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_id_is_reused() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("req-777"));
        assert_eq!(correlation_id(&headers), "req-777");
    }

    #[test]
    fn test_fresh_id_is_a_uuid() {
        let id = correlation_id(&HeaderMap::new());
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn test_unreadable_upstream_id_is_replaced() {
        let mut headers = HeaderMap::new();
        let opaque = HeaderValue::from_bytes(&[0xff, 0xfe]).unwrap();
        headers.insert(REQUEST_ID_HEADER, opaque);
        assert!(Uuid::parse_str(&correlation_id(&headers)).is_ok());
    }
}
