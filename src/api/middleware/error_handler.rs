//! Turns [`AppError`] into JSON error responses.
//!
//! Client errors carry their own message. Server errors are logged with the
//! full cause chain and answered with a fixed message.

use std::error::Error as _;

use axum::{
    Json,
    extract::Request,
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::RequestId;
use crate::api::dto::ErrorResponse;
use crate::error::AppError;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            tracing::error!(error = %self, cause = %cause_chain(&self), "Request failed");
        }

        let status = error_to_status_code(&self);
        let mut body = ErrorResponse::new(error_to_code(&self), public_message(&self));
        if let Some(details) = error_details(&self) {
            body = body.with_details(details);
        }

        (status, Json(body)).into_response()
    }
}

pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::Duplicate { .. } => StatusCode::CONFLICT,
        AppError::Validation { .. } | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        AppError::ValidationErrors { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
        AppError::Upstream { .. } => StatusCode::BAD_GATEWAY,
        AppError::Database { .. }
        | AppError::ConnectionPool { .. }
        | AppError::Configuration { .. }
        | AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn error_to_code(error: &AppError) -> &'static str {
    match error {
        AppError::NotFound { .. } => "NOT_FOUND",
        AppError::Duplicate { .. } => "DUPLICATE_ENTRY",
        AppError::Validation { .. } | AppError::ValidationErrors { .. } => "VALIDATION_ERROR",
        AppError::BadRequest { .. } => "BAD_REQUEST",
        AppError::Unauthorized { .. } => "UNAUTHORIZED",
        AppError::Forbidden { .. } => "FORBIDDEN",
        AppError::Upstream { .. } => "UPSTREAM_ERROR",
        AppError::Database { .. } => "DATABASE_ERROR",
        AppError::ConnectionPool { .. } => "SERVICE_UNAVAILABLE",
        AppError::Configuration { .. } => "CONFIGURATION_ERROR",
        AppError::Internal { .. } => "INTERNAL_ERROR",
    }
}

fn public_message(error: &AppError) -> String {
    match error {
        AppError::Unauthorized { message }
        | AppError::Forbidden { message }
        | AppError::BadRequest { message } => message.clone(),
        AppError::Upstream { service, .. } => format!("Upstream service '{service}' failed"),
        AppError::Database { .. } | AppError::ConnectionPool { .. } => {
            "A storage error occurred".to_string()
        }
        AppError::Configuration { .. } | AppError::Internal { .. } => {
            "An internal error occurred".to_string()
        }
        other => other.to_string(),
    }
}

fn error_details(error: &AppError) -> Option<serde_json::Value> {
    match error {
        AppError::NotFound { entity, field, value }
        | AppError::Duplicate { entity, field, value } => Some(json!({
            "entity": entity,
            "field": field,
            "value": value,
        })),
        AppError::Validation { field, reason } => Some(json!([{
            "field": field,
            "message": reason,
        }])),
        AppError::ValidationErrors { errors } => serde_json::to_value(errors).ok(),
        _ => None,
    }
}

/// `error: outer: inner: root`, for logs only.
fn cause_chain(error: &AppError) -> String {
    let mut chain = Vec::new();
    let mut source = error.source();
    while let Some(cause) = source {
        chain.push(cause.to_string());
        source = cause.source();
    }
    chain.join(": ")
}

/// Rewrites error responses that did not come from [`AppError`] (unknown
/// routes, wrong methods, extractor rejections outside our wrappers) into
/// the same JSON shape, and stamps the request ID into every error body.
pub async fn global_error_handler(request: Request, next: Next) -> Response {
    let request_id = request.extensions().get::<RequestId>().map(|r| r.0.clone());
    let response = next.run(request).await;
    let status = response.status();

    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();

    let is_json = parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"));

    let mut error_response = match serde_json::from_slice::<serde_json::Value>(&bytes) {
        Ok(value) if is_json => match ErrorResponse::from_json(value) {
            Some(parsed) => parsed,
            None => return Response::from_parts(parts, axum::body::Body::from(bytes)),
        },
        _ => fallback_error(status, String::from_utf8_lossy(&bytes).trim()),
    };

    if let Some(id) = request_id {
        error_response = error_response.with_request_id(id);
    }

    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.remove(header::CONTENT_TYPE);
    (parts, Json(error_response)).into_response()
}

fn fallback_error(status: StatusCode, original: &str) -> ErrorResponse {
    let (code, default_message) = match status {
        StatusCode::BAD_REQUEST => ("BAD_REQUEST", "Bad request"),
        StatusCode::NOT_FOUND => ("NOT_FOUND", "The requested resource was not found"),
        StatusCode::METHOD_NOT_ALLOWED => {
            ("METHOD_NOT_ALLOWED", "HTTP method not allowed for this endpoint")
        }
        StatusCode::UNSUPPORTED_MEDIA_TYPE => ("UNSUPPORTED_MEDIA_TYPE", "Unsupported media type"),
        StatusCode::PAYLOAD_TOO_LARGE => ("PAYLOAD_TOO_LARGE", "Request payload too large"),
        StatusCode::REQUEST_TIMEOUT => ("REQUEST_TIMEOUT", "Request timeout"),
        s if s.is_server_error() => ("INTERNAL_ERROR", "An internal error occurred"),
        _ => ("ERROR", "Request failed"),
    };

    let message = if original.is_empty() || status.is_server_error() {
        default_message.to_string()
    } else {
        original.to_string()
    };
    ErrorResponse::new(code, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationFieldError;
    use axum::{Router, body::Body, middleware, routing::get};
    use tower::ServiceExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::not_found("client", "id", "7"), StatusCode::NOT_FOUND),
            (
                AppError::Duplicate {
                    entity: "accounts".into(),
                    field: "phone_number".into(),
                    value: "+1000".into(),
                },
                StatusCode::CONFLICT,
            ),
            (
                AppError::Validation {
                    field: "page".into(),
                    reason: "bad".into(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::ValidationErrors { errors: vec![] },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (AppError::auth_failed("no"), StatusCode::UNAUTHORIZED),
            (
                AppError::Forbidden {
                    message: "no".into(),
                },
                StatusCode::FORBIDDEN,
            ),
            (
                AppError::Upstream {
                    service: "eskiz".into(),
                    source: anyhow::anyhow!("timeout"),
                },
                StatusCode::BAD_GATEWAY,
            ),
            (
                AppError::ConnectionPool {
                    source: anyhow::anyhow!("exhausted"),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::Internal {
                    source: anyhow::anyhow!("boom"),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error_to_status_code(&error), expected, "{error:?}");
        }
    }

    #[tokio::test]
    async fn test_server_error_hides_cause() {
        let error = AppError::Database {
            operation: "find account".into(),
            source: anyhow::anyhow!("relation \"accounts\" does not exist"),
        };
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["code"], "DATABASE_ERROR");
        assert!(!json["message"].as_str().unwrap().contains("accounts"));
        assert!(json.get("details").is_none());
    }

    #[tokio::test]
    async fn test_validation_errors_listed_in_details() {
        let error = AppError::ValidationErrors {
            errors: vec![ValidationFieldError {
                field: "phone_number".into(),
                message: "Phone number is required".into(),
            }],
        };
        let json = body_json(error.into_response()).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["details"][0]["field"], "phone_number");
    }

    #[tokio::test]
    async fn test_unauthorized_keeps_message() {
        let json = body_json(AppError::auth_failed("Invalid phone number or password").into_response()).await;
        assert_eq!(json["message"], "Invalid phone number or password");
    }

    #[test]
    fn test_cause_chain() {
        let error = AppError::Internal {
            source: anyhow::anyhow!("root").context("outer"),
        };
        assert_eq!(cause_chain(&error), "outer: root");
    }

    #[tokio::test]
    async fn test_unknown_route_becomes_json() {
        let app = Router::new()
            .route("/known", get(|| async { "ok" }))
            .layer(middleware::from_fn(global_error_handler));

        let response = app
            .oneshot(Request::builder().uri("/missing").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_request_id_added_to_app_errors() {
        let app = Router::new()
            .route(
                "/denied",
                get(|| async { AppError::auth_failed("Missing authorization header") }),
            )
            .layer(middleware::from_fn(global_error_handler))
            .layer(middleware::from_fn(super::super::request_id_middleware));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/denied")
                    .header("x-request-id", "req-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["request_id"], "req-1");
        assert_eq!(json["code"], "UNAUTHORIZED");
    }
}
