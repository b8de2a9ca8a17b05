//! Request ID middleware.
//!
//! Reuses a well-formed incoming `x-request-id` or mints a UUID v4, stores it
//! in request extensions and echoes it on the response.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_REQUEST_ID_LEN: usize = 128;

/// Request ID stored in request extensions for downstream access.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestId(pub String);

/// Picks the caller's ID when it is short printable ASCII, otherwise a new one.
pub fn resolve_request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|id| {
            !id.is_empty()
                && id.len() <= MAX_REQUEST_ID_LEN
                && id.bytes().all(|b| b.is_ascii_graphic())
        })
        .map(String::from)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = resolve_request_id(request.headers());

    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, middleware, routing::get};
    use tower::ServiceExt;

    fn headers_with(id: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_str(id).unwrap());
        headers
    }

    #[test]
    fn test_incoming_id_is_kept() {
        assert_eq!(resolve_request_id(&headers_with("abc-123")), "abc-123");
    }

    #[test]
    fn test_bad_incoming_id_is_replaced() {
        let long = "x".repeat(MAX_REQUEST_ID_LEN + 1);
        for bad in ["", "has space", long.as_str()] {
            let id = resolve_request_id(&headers_with(bad));
            assert!(Uuid::parse_str(&id).is_ok(), "{bad:?} was kept");
        }
        assert!(Uuid::parse_str(&resolve_request_id(&HeaderMap::new())).is_ok());
    }

    #[tokio::test]
    async fn test_id_is_echoed_and_visible_to_handlers() {
        let app = Router::new()
            .route(
                "/",
                get(|axum::Extension(id): axum::Extension<RequestId>| async move { id.0 }),
            )
            .layer(middleware::from_fn(request_id_middleware));

        let request = Request::builder()
            .uri("/")
            .header(REQUEST_ID_HEADER, "trace-7")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.headers()[REQUEST_ID_HEADER], "trace-7");
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"trace-7");
    }
}
