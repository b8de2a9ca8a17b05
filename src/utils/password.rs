use std::sync::LazyLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, PasswordVerifier, phc::PasswordHash},
};

use crate::error::{AppError, AppResult};

/// Hash verified when a login names an unknown phone number, so that branch
/// costs the same as a wrong password.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("crm-auth-timing-equalizer").ok());

/// Hash a password using Argon2id with a random salt.
///
/// # Returns
/// The PHC string, e.g. `$argon2id$v=19$...`
pub fn hash_password(password: &str) -> AppResult<String> {
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes())
        .map_err(|e| AppError::Internal {
            source: anyhow::anyhow!("Failed to hash password: {e}"),
        })?
        .to_string();

    Ok(password_hash)
}

/// Verify a password against a PHC hash.
///
/// A mismatch is `Ok(false)`; an unparseable hash is an error.
pub fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash).map_err(|e| AppError::Internal {
        source: anyhow::anyhow!("Stored password hash is invalid: {e}"),
    })?;
    let argon2 = Argon2::default();

    Ok(argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Burns one verification against a fixed hash. The result is discarded.
pub fn verify_dummy(password: &str) {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password() {
        let hash = hash_password("pw").expect("Failed to hash password");
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_verify_password_success_and_failure() {
        let hash = hash_password("pw").expect("Failed to hash password");

        assert!(verify_password("pw", &hash).unwrap());
        assert!(!verify_password("PW", &hash).unwrap());
    }

    #[test]
    fn test_different_hashes_for_same_password() {
        let hash1 = hash_password("test_password_123").unwrap();
        let hash2 = hash_password("test_password_123").unwrap();

        assert_ne!(hash1, hash2);
        assert!(verify_password("test_password_123", &hash1).unwrap());
        assert!(verify_password("test_password_123", &hash2).unwrap());
    }

    #[test]
    fn test_invalid_hash_is_an_error() {
        assert!(matches!(
            verify_password("pw", "not-a-phc-string"),
            Err(AppError::Internal { .. })
        ));
    }

    #[test]
    fn test_dummy_hash_is_usable() {
        let hash = DUMMY_HASH.as_deref().expect("dummy hash");
        assert!(!verify_password("anything", hash).unwrap());
        verify_dummy("anything");
    }
}
