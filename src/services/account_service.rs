//! Account management inside one tenant.

use tracing::info;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{Account, AccountFilter, NewAccount, PageResult, UpdateAccount};
use crate::repositories::AccountRepository;
use crate::services::hash_password_blocking;
use crate::services::policy::AccessPolicy;

/// Account fields as supplied by a caller, password in plain text.
#[derive(Debug, Clone)]
pub struct AccountDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone_number: String,
    pub password: String,
    pub role: String,
}

/// Partial account update. A blank password leaves the hash untouched.
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

#[derive(Clone)]
pub struct AccountService {
    repo: AccountRepository,
    policy: AccessPolicy,
}

impl AccountService {
    pub fn new(repo: AccountRepository, policy: AccessPolicy) -> Self {
        Self { repo, policy }
    }

    /// Creates an account in the caller's tenant. `caller_role` decides
    /// whether the platform role may be assigned.
    pub async fn create(
        &self,
        tenant_id: Uuid,
        caller_role: &str,
        draft: AccountDraft,
    ) -> AppResult<Account> {
        self.policy.require_grantable(caller_role, &draft.role)?;
        let password_hash = hash_password_blocking(draft.password).await?;

        let account = self
            .repo
            .create(NewAccount {
                company_id: tenant_id,
                first_name: draft.first_name,
                last_name: draft.last_name,
                email: draft.email,
                phone_number: draft.phone_number,
                password_hash,
                role: draft.role,
            })
            .await?;

        info!(%tenant_id, account_id = %account.id, "Account created");
        Ok(account)
    }

    pub async fn get(&self, tenant_id: Uuid, account_id: Uuid) -> AppResult<Account> {
        Ok(self.repo.find(tenant_id, account_id).await?)
    }

    pub async fn list(
        &self,
        tenant_id: Uuid,
        filter: AccountFilter,
    ) -> AppResult<PageResult<Account>> {
        Ok(self.repo.list(tenant_id, filter).await?)
    }

    pub async fn update(
        &self,
        tenant_id: Uuid,
        caller_role: &str,
        account_id: Uuid,
        changes: AccountChanges,
    ) -> AppResult<Account> {
        if let Some(role) = &changes.role {
            self.policy.require_grantable(caller_role, role)?;
        }
        let password_hash = match changes.password.filter(|p| !p.trim().is_empty()) {
            Some(password) => Some(hash_password_blocking(password).await?),
            None => None,
        };

        let update = UpdateAccount {
            first_name: changes.first_name,
            last_name: changes.last_name,
            email: changes.email,
            phone_number: changes.phone_number,
            password_hash,
            role: changes.role,
        };

        Ok(self.repo.update(tenant_id, account_id, update).await?)
    }

    pub async fn delete(&self, tenant_id: Uuid, account_id: Uuid) -> AppResult<()> {
        self.repo.delete(tenant_id, account_id).await?;
        info!(%tenant_id, %account_id, "Account deleted");
        Ok(())
    }
}
