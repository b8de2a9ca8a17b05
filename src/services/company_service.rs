//! Tenant (company) operations.

use tracing::info;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{Account, Company, CompanyFilter, NewCompany, PageResult, UpdateCompany};
use crate::repositories::query::Page;
use crate::repositories::{AccountRepository, CompanyRepository};
use crate::services::policy::AccessPolicy;

#[derive(Clone)]
pub struct CompanyService {
    companies: CompanyRepository,
    accounts: AccountRepository,
    policy: AccessPolicy,
}

impl CompanyService {
    pub fn new(companies: CompanyRepository, accounts: AccountRepository, policy: AccessPolicy) -> Self {
        Self {
            companies,
            accounts,
            policy,
        }
    }

    /// Creates a tenant with no accounts. Platform role only.
    pub async fn create(&self, role: &str, new_company: NewCompany) -> AppResult<Company> {
        self.policy.require_platform(role)?;
        let company = self.companies.create(new_company).await?;
        info!(company_id = %company.id, "Company created");
        Ok(company)
    }

    /// Lists every live tenant. Platform role only.
    pub async fn list(&self, role: &str, filter: CompanyFilter) -> AppResult<PageResult<Company>> {
        self.policy.require_platform(role)?;
        Ok(self.companies.list(filter).await?)
    }

    pub async fn get(&self, tenant_id: Uuid, role: &str, company_id: Uuid) -> AppResult<Company> {
        self.policy.require_tenant(tenant_id, role, company_id)?;
        Ok(self.companies.find(company_id).await?)
    }

    pub async fn update(
        &self,
        tenant_id: Uuid,
        role: &str,
        company_id: Uuid,
        changes: UpdateCompany,
    ) -> AppResult<Company> {
        self.policy.require_tenant(tenant_id, role, company_id)?;
        Ok(self.companies.update(company_id, changes).await?)
    }

    /// Soft delete. The tenant's accounts can no longer log in afterwards.
    pub async fn delete(&self, tenant_id: Uuid, role: &str, company_id: Uuid) -> AppResult<()> {
        self.policy.require_tenant(tenant_id, role, company_id)?;
        self.companies.soft_delete(company_id).await?;
        info!(%company_id, "Company deleted");
        Ok(())
    }

    /// Accounts of a company whose "first last" name contains `name`.
    pub async fn list_accounts(
        &self,
        tenant_id: Uuid,
        role: &str,
        company_id: Uuid,
        name: Option<&str>,
        page: Page,
    ) -> AppResult<PageResult<Account>> {
        self.policy.require_tenant(tenant_id, role, company_id)?;
        Ok(self.accounts.list_by_full_name(company_id, name, page).await?)
    }
}
