use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::error::AppError;

const SECONDS_PER_HOUR: i64 = 3600;

/// Token type enumeration
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Short-lived token presented on every API call
    Access,
    /// Long-lived token exchanged for a new pair
    Refresh,
}

/// The account facts carried inside a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub account_id: Uuid,
    pub first_name: String,
    pub phone_number: String,
    pub role: String,
    pub tenant_id: Uuid,
}

/// JWT claims. Access and refresh tokens share this shape and differ only in
/// `token_type`, signing secret and lifetime.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Account id
    pub sub: Uuid,
    pub first_name: String,
    pub phone_number: String,
    pub role: String,
    pub tenant_id: Uuid,
    pub token_type: TokenType,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiration time (unix seconds)
    pub exp: i64,
}

impl Claims {
    pub fn new(identity: &SessionIdentity, token_type: TokenType, now: i64, ttl_secs: i64) -> Self {
        Self {
            sub: identity.account_id,
            first_name: identity.first_name.clone(),
            phone_number: identity.phone_number.clone(),
            role: identity.role.clone(),
            tenant_id: identity.tenant_id,
            token_type,
            iat: now,
            exp: now.saturating_add(ttl_secs),
        }
    }

    pub fn identity(&self) -> SessionIdentity {
        SessionIdentity {
            account_id: self.sub,
            first_name: self.first_name.clone(),
            phone_number: self.phone_number.clone(),
            role: self.role.clone(),
            tenant_id: self.tenant_id,
        }
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token is malformed")]
    Malformed,

    #[error("expected {expected:?} token, got {actual:?}")]
    WrongKind {
        expected: TokenType,
        actual: TokenType,
    },

    #[error("failed to sign token")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

impl From<TokenError> for AppError {
    fn from(error: TokenError) -> Self {
        match error {
            TokenError::Signing(source) => AppError::Internal {
                source: anyhow::Error::from(source),
            },
            TokenError::Expired => AppError::auth_failed("Token has expired"),
            _ => AppError::auth_failed("Invalid token"),
        }
    }
}

/// Signs `claims` with HS256.
pub fn sign_claims(claims: &Claims, secret: &str) -> Result<String, TokenError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(TokenError::Signing)
}

/// Checks the signature, then requires `now < exp` with no leeway.
pub fn verify_claims(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Malformed,
    })?;

    // jsonwebtoken accepts exp == now; sessions end at exp.
    if claims.exp <= jiff::Timestamp::now().as_second() {
        return Err(TokenError::Expired);
    }
    Ok(claims)
}

/// Access and refresh tokens for one login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix seconds at which the access token expires
    pub expires_at: i64,
}

/// Mints and verifies session tokens. Built once from [`JwtConfig`].
#[derive(Clone)]
pub struct SessionIssuer {
    access_secret: String,
    refresh_secret: String,
    access_ttl: i64,
    refresh_ttl: i64,
}

impl std::fmt::Debug for SessionIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionIssuer")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl SessionIssuer {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            access_secret: config.access_secret.clone(),
            refresh_secret: config.refresh_secret.clone(),
            access_ttl: config.access_token_expiration.saturating_mul(SECONDS_PER_HOUR),
            refresh_ttl: config.refresh_token_expiration.saturating_mul(SECONDS_PER_HOUR),
        }
    }

    pub fn issue_access_token(&self, identity: &SessionIdentity) -> Result<String, TokenError> {
        self.issue_at(identity, TokenType::Access, now()).map(|(token, _)| token)
    }

    pub fn issue_refresh_token(&self, identity: &SessionIdentity) -> Result<String, TokenError> {
        self.issue_at(identity, TokenType::Refresh, now()).map(|(token, _)| token)
    }

    /// Issues both tokens with the same `iat`.
    pub fn issue_pair(&self, identity: &SessionIdentity) -> Result<TokenPair, TokenError> {
        let now = now();
        let (access_token, expires_at) = self.issue_at(identity, TokenType::Access, now)?;
        let (refresh_token, _) = self.issue_at(identity, TokenType::Refresh, now)?;
        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_at,
        })
    }

    pub fn verify_access_token(&self, token: &str) -> Result<Claims, TokenError> {
        Self::verify_kind(token, &self.access_secret, TokenType::Access)
    }

    pub fn verify_refresh_token(&self, token: &str) -> Result<Claims, TokenError> {
        Self::verify_kind(token, &self.refresh_secret, TokenType::Refresh)
    }

    fn issue_at(
        &self,
        identity: &SessionIdentity,
        token_type: TokenType,
        now: i64,
    ) -> Result<(String, i64), TokenError> {
        let (secret, ttl) = match token_type {
            TokenType::Access => (&self.access_secret, self.access_ttl),
            TokenType::Refresh => (&self.refresh_secret, self.refresh_ttl),
        };
        let claims = Claims::new(identity, token_type, now, ttl);
        Ok((sign_claims(&claims, secret)?, claims.exp))
    }

    fn verify_kind(token: &str, secret: &str, expected: TokenType) -> Result<Claims, TokenError> {
        let claims = verify_claims(token, secret)?;
        if claims.token_type != expected {
            return Err(TokenError::WrongKind {
                expected,
                actual: claims.token_type,
            });
        }
        Ok(claims)
    }
}

fn now() -> i64 {
    jiff::Timestamp::now().as_second()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCESS_SECRET: &str = "access-secret-for-jwt-testing-0123456789";
    const REFRESH_SECRET: &str = "refresh-secret-for-jwt-testing-0123456789";

    fn issuer() -> SessionIssuer {
        SessionIssuer::new(&JwtConfig {
            access_secret: ACCESS_SECRET.to_string(),
            refresh_secret: REFRESH_SECRET.to_string(),
            access_token_expiration: 1,
            refresh_token_expiration: 168,
        })
    }

    fn acme_admin() -> SessionIdentity {
        SessionIdentity {
            account_id: Uuid::from_u128(0xA1),
            first_name: "Jo".to_string(),
            phone_number: "+1000".to_string(),
            role: "admin".to_string(),
            tenant_id: Uuid::from_u128(0xAC),
        }
    }

    #[test]
    fn test_access_token_round_trip() {
        let issuer = issuer();
        let token = issuer.issue_access_token(&acme_admin()).unwrap();

        let claims = issuer.verify_access_token(&token).unwrap();
        assert_eq!(claims.identity(), acme_admin());
        assert_eq!(claims.token_type, TokenType::Access);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_pair_uses_independent_lifetimes() {
        let issuer = issuer();
        let pair = issuer.issue_pair(&acme_admin()).unwrap();

        let access = issuer.verify_access_token(&pair.access_token).unwrap();
        let refresh = issuer.verify_refresh_token(&pair.refresh_token).unwrap();
        assert_eq!(pair.expires_at, access.exp);
        assert_eq!(refresh.exp - refresh.iat, 168 * 3600);
        assert_eq!(refresh.identity(), acme_admin());
    }

    #[test]
    fn test_expired_token() {
        let now = jiff::Timestamp::now().as_second();
        let claims = Claims::new(&acme_admin(), TokenType::Access, now - 7200, 3600);
        let token = sign_claims(&claims, ACCESS_SECRET).unwrap();

        assert!(matches!(
            verify_claims(&token, ACCESS_SECRET),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn test_token_expiring_now_is_rejected() {
        let now = jiff::Timestamp::now().as_second();
        let claims = Claims::new(&acme_admin(), TokenType::Access, now - 60, 60);
        let token = sign_claims(&claims, ACCESS_SECRET).unwrap();

        assert!(matches!(
            verify_claims(&token, ACCESS_SECRET),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn test_wrong_secret() {
        let token = issuer().issue_access_token(&acme_admin()).unwrap();
        assert!(matches!(
            verify_claims(&token, "some-other-secret-entirely-0123456789"),
            Err(TokenError::InvalidSignature)
        ));
    }

    #[test]
    fn test_garbage_is_malformed() {
        for garbage in ["", "not-a-token", "invalid.token.format"] {
            assert!(matches!(
                verify_claims(garbage, ACCESS_SECRET),
                Err(TokenError::Malformed)
            ));
        }
    }

    #[test]
    fn test_refresh_token_rejected_as_access() {
        let issuer = issuer();
        let refresh = issuer.issue_refresh_token(&acme_admin()).unwrap();

        // Different secret, so the signature check fails first.
        assert!(matches!(
            issuer.verify_access_token(&refresh),
            Err(TokenError::InvalidSignature)
        ));
    }

    #[test]
    fn test_wrong_kind_under_same_secret() {
        let now = jiff::Timestamp::now().as_second();
        let claims = Claims::new(&acme_admin(), TokenType::Refresh, now, 3600);
        let token = sign_claims(&claims, ACCESS_SECRET).unwrap();

        assert!(matches!(
            issuer().verify_access_token(&token),
            Err(TokenError::WrongKind {
                expected: TokenType::Access,
                actual: TokenType::Refresh,
            })
        ));
    }

    #[test]
    fn test_claims_serialization() {
        let claims = Claims::new(&acme_admin(), TokenType::Refresh, 1_700_000_000, 60);
        let json = serde_json::to_value(&claims).unwrap();

        assert_eq!(json["token_type"], "refresh");
        assert_eq!(json["first_name"], "Jo");
        assert_eq!(json["phone_number"], "+1000");
        assert_eq!(json["role"], "admin");
        assert_eq!(json["exp"], 1_700_000_060);
    }

    #[test]
    fn test_token_errors_map_to_unauthorized() {
        assert!(matches!(
            AppError::from(TokenError::Expired),
            AppError::Unauthorized { .. }
        ));
        assert!(matches!(
            AppError::from(TokenError::Malformed),
            AppError::Unauthorized { .. }
        ));
    }
}
