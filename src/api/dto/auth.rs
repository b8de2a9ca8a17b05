//! Authentication DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{AccountResponse, CompanyResponse};
use crate::services::{ADMIN_ROLE, TenantBootstrap};
use crate::utils::jwt::TokenPair;

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 32, message = "Phone number is required"))]
    #[schema(example = "+1000")]
    pub phone_number: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "pw", format = "password")]
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token cannot be empty"))]
    #[schema(example = "eyJ0eXAiOiJKV1QiLCJhbGc...")]
    pub refresh_token: String,
}

/// Creates a company together with its admin account.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 255, message = "Company name is required"))]
    #[schema(example = "Acme")]
    pub company_name: String,
    #[validate(url(message = "Website must be a URL"))]
    pub website: Option<String>,
    #[validate(length(max = 512))]
    pub logo: Option<String>,
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    #[schema(example = "Jo")]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    #[schema(example = "Doe")]
    pub last_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 32, message = "Phone number is required"))]
    #[schema(example = "+1000")]
    pub phone_number: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "pw", format = "password")]
    pub password: String,
}

impl RegisterRequest {
    pub fn into_bootstrap(self) -> TenantBootstrap {
        TenantBootstrap {
            company_name: self.company_name,
            website: self.website,
            logo: self.logo,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone_number: self.phone_number,
            password: self.password,
            role: ADMIN_ROLE.to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    #[schema(example = "eyJ0eXAiOiJKV1QiLCJhbGc...")]
    pub access_token: String,
    #[schema(example = "eyJ0eXAiOiJKV1QiLCJhbGc...")]
    pub refresh_token: String,
    /// Unix seconds at which the access token expires
    #[schema(example = 1736935200)]
    pub expires_at_seconds: i64,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            expires_at_seconds: pair.expires_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub company: CompanyResponse,
    pub account: AccountResponse,
    #[serde(flatten)]
    pub tokens: TokenResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_wire_shape() {
        let response = TokenResponse::from(TokenPair {
            access_token: "a.b.c".to_string(),
            refresh_token: "d.e.f".to_string(),
            expires_at: 1_736_935_200,
        });
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["access_token"], "a.b.c");
        assert_eq!(json["refresh_token"], "d.e.f");
        assert_eq!(json["expires_at_seconds"], 1_736_935_200);
        assert!(json.get("expires_at").is_none());
    }

    #[test]
    fn test_registration_always_creates_tenant_admin() {
        let request: RegisterRequest = serde_json::from_value(serde_json::json!({
            "company_name": "Acme",
            "first_name": "Jo",
            "last_name": "Doe",
            "phone_number": "+1000",
            "password": "pw",
            "role": "superadmin"
        }))
        .unwrap();

        let bootstrap = request.into_bootstrap();
        assert_eq!(bootstrap.role, ADMIN_ROLE);
        assert_eq!(bootstrap.company_name, "Acme");
    }
}
