//! Login, token refresh and tenant bootstrap.

use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{Account, Company, NewAccount, NewCompany};
use crate::repositories::{AccountRepository, RepoError};
use crate::services::{hash_password_blocking, run_blocking};
use crate::utils::jwt::{Claims, SessionIdentity, SessionIssuer, TokenPair};
use crate::utils::password::{verify_dummy, verify_password};

/// The one message every credential failure carries.
pub const LOGIN_FAILED_MESSAGE: &str = "Invalid phone number or password";

/// Role given to the first account of a bootstrapped tenant.
pub const ADMIN_ROLE: &str = "admin";

/// Input for creating a tenant with its first (admin) account.
#[derive(Debug, Clone)]
pub struct TenantBootstrap {
    pub company_name: String,
    pub website: Option<String>,
    pub logo: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone_number: String,
    pub password: String,
    /// Role of the first account; [`ADMIN_ROLE`] for self-service sign-up
    pub role: String,
}

/// Outcome of a self-service registration.
#[derive(Debug, Clone)]
pub struct RegisteredTenant {
    pub company: Company,
    pub account: Account,
    pub tokens: TokenPair,
}

pub fn login_failed() -> AppError {
    AppError::auth_failed(LOGIN_FAILED_MESSAGE)
}

/// Decides a login attempt given the looked-up account, if any.
///
/// An unknown phone number still pays for one argon2 verification, and both
/// failure branches return the same error.
pub fn check_credentials(candidate: Option<Account>, password: &str) -> AppResult<Account> {
    let Some(account) = candidate else {
        verify_dummy(password);
        return Err(login_failed());
    };

    if verify_password(password, &account.password_hash)? {
        Ok(account)
    } else {
        Err(login_failed())
    }
}

pub fn identity_of(account: &Account) -> SessionIdentity {
    SessionIdentity {
        account_id: account.id,
        first_name: account.first_name.clone(),
        phone_number: account.phone_number.clone(),
        role: account.role.clone(),
        tenant_id: account.company_id,
    }
}

#[derive(Clone)]
pub struct AuthService {
    accounts: AccountRepository,
    issuer: SessionIssuer,
}

impl AuthService {
    pub fn new(accounts: AccountRepository, issuer: SessionIssuer) -> Self {
        Self { accounts, issuer }
    }

    /// Verifies a phone/password pair and issues a token pair.
    pub async fn login(&self, phone_number: &str, password: String) -> AppResult<TokenPair> {
        let candidate = self.accounts.find_for_login(phone_number).await?;

        let account = run_blocking(move || check_credentials(candidate, &password))
            .await
            .inspect_err(|e| {
                if matches!(e, AppError::Unauthorized { .. }) {
                    warn!("Login rejected");
                }
            })?;

        let tokens = self.issuer.issue_pair(&identity_of(&account))?;
        info!(account_id = %account.id, tenant_id = %account.company_id, "Login succeeded");
        Ok(tokens)
    }

    /// Exchanges a refresh token for a new pair.
    ///
    /// The account is read again, so a deleted account or tenant can no
    /// longer refresh and role changes take effect.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<TokenPair> {
        let claims = self.issuer.verify_refresh_token(refresh_token)?;

        let account = match self.accounts.find(claims.tenant_id, claims.sub).await {
            Ok(account) => account,
            Err(RepoError::NotFound { .. }) => {
                return Err(AppError::auth_failed("Account no longer exists"));
            }
            Err(e) => return Err(e.into()),
        };

        Ok(self.issuer.issue_pair(&identity_of(&account))?)
    }

    /// Checks an access token for the auth middleware.
    pub fn authenticate(&self, access_token: &str) -> AppResult<Claims> {
        Ok(self.issuer.verify_access_token(access_token)?)
    }

    /// Creates a company and its admin account in one transaction.
    pub async fn bootstrap_tenant(&self, input: TenantBootstrap) -> AppResult<(Company, Account)> {
        let password_hash = hash_password_blocking(input.password).await?;

        let new_company = NewCompany {
            name: input.company_name,
            website: input.website,
            logo: input.logo,
        };
        let first_name = input.first_name;
        let last_name = input.last_name;
        let email = input.email;
        let phone_number = input.phone_number;
        let role = input.role;

        let (company, account) = self
            .accounts
            .create_with_company(new_company, move |company_id: Uuid| NewAccount {
                company_id,
                first_name,
                last_name,
                email,
                phone_number,
                password_hash,
                role,
            })
            .await?;

        info!(company_id = %company.id, account_id = %account.id, "Tenant bootstrapped");
        Ok((company, account))
    }

    /// Bootstraps a tenant and logs its admin in.
    pub async fn register(&self, input: TenantBootstrap) -> AppResult<RegisteredTenant> {
        let (company, account) = self.bootstrap_tenant(input).await?;
        let tokens = self.issuer.issue_pair(&identity_of(&account))?;
        Ok(RegisteredTenant {
            company,
            account,
            tokens,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::password::hash_password;

    fn account_with_password(password: &str) -> Account {
        let now = jiff::civil::date(2025, 1, 15).at(9, 0, 0, 0);
        Account {
            id: Uuid::from_u128(1),
            company_id: Uuid::from_u128(2),
            first_name: "Jo".into(),
            last_name: "Doe".into(),
            email: None,
            phone_number: "+1000".into(),
            password_hash: hash_password(password).unwrap(),
            role: ADMIN_ROLE.into(),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn failure_text(result: AppResult<Account>) -> String {
        match result {
            Err(AppError::Unauthorized { message }) => message,
            other => panic!("expected Unauthorized, got {:?}", other.map(|a| a.id)),
        }
    }

    #[test]
    fn test_correct_password_accepted() {
        let account = check_credentials(Some(account_with_password("pw")), "pw").unwrap();
        assert_eq!(account.phone_number, "+1000");
    }

    #[test]
    fn test_failures_are_indistinguishable() {
        let unknown = failure_text(check_credentials(None, "pw"));
        let wrong = failure_text(check_credentials(Some(account_with_password("pw")), "nope"));

        assert_eq!(unknown, wrong);
        assert_eq!(unknown, LOGIN_FAILED_MESSAGE);
    }

    #[test]
    fn test_identity_carries_tenant() {
        let account = account_with_password("pw");
        let identity = identity_of(&account);
        assert_eq!(identity.tenant_id, account.company_id);
        assert_eq!(identity.account_id, account.id);
        assert_eq!(identity.role, "admin");
    }
}
