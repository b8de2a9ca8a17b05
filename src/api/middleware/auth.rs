//! Bearer-token authentication middleware.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt::Claims;

/// The authenticated caller, inserted into request extensions by
/// [`auth_middleware`] and read in handlers with `Extension<AuthUser>`.
///
/// `tenant_id` scopes every store operation the handler performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub account_id: Uuid,
    pub tenant_id: Uuid,
    pub role: String,
    pub first_name: String,
    pub phone_number: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            account_id: claims.sub,
            tenant_id: claims.tenant_id,
            role: claims.role,
            first_name: claims.first_name,
            phone_number: claims.phone_number,
        }
    }
}

/// Pulls the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::auth_failed("Missing authorization header"))?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            AppError::auth_failed("Invalid authorization header format. Expected: Bearer <token>")
        })
}

/// Rejects the request with 401 unless it carries a valid access token.
///
/// # Example
/// ```ignore
/// Router::new()
///     .route("/protected", get(handler))
///     .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
/// ```
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = {
        let token = bearer_token(request.headers())?;
        state.services.auth.authenticate(token)?
    };

    request.extensions_mut().insert(AuthUser::from(claims));
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::jwt::{SessionIdentity, TokenType};
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_auth_user_from_claims() {
        let identity = SessionIdentity {
            account_id: Uuid::from_u128(1),
            first_name: "Jo".to_string(),
            phone_number: "+1000".to_string(),
            role: "admin".to_string(),
            tenant_id: Uuid::from_u128(2),
        };
        let claims = Claims::new(&identity, TokenType::Access, 0, 3600);

        let user = AuthUser::from(claims);
        assert_eq!(user.account_id, identity.account_id);
        assert_eq!(user.tenant_id, identity.tenant_id);
        assert_eq!(user.role, "admin");
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(&headers_with("Bearer abc.def")).unwrap(), "abc.def");
    }

    #[test]
    fn test_bearer_token_rejections() {
        assert!(matches!(
            bearer_token(&HeaderMap::new()),
            Err(AppError::Unauthorized { .. })
        ));
        for bad in ["Basic dXNlcjpwdw==", "Bearer ", "abc.def"] {
            assert!(matches!(
                bearer_token(&headers_with(bad)),
                Err(AppError::Unauthorized { .. })
            ));
        }
    }
}
