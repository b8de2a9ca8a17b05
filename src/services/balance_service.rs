use bigdecimal::BigDecimal;
use tracing::info;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{Balance, BalanceFilter, NewBalance, PageResult};
use crate::repositories::BalanceRepository;
use crate::services::policy::AccessPolicy;

/// The caller's own tenant balance, plus a platform-wide listing.
#[derive(Clone)]
pub struct BalanceService {
    repo: BalanceRepository,
    policy: AccessPolicy,
}

impl BalanceService {
    pub fn new(repo: BalanceRepository, policy: AccessPolicy) -> Self {
        Self { repo, policy }
    }

    pub async fn create(&self, tenant_id: Uuid, amount: BigDecimal) -> AppResult<Balance> {
        let balance = self
            .repo
            .create(NewBalance {
                company_id: tenant_id,
                amount,
            })
            .await?;
        info!(%tenant_id, amount = %balance.amount, "Balance opened");
        Ok(balance)
    }

    pub async fn get(&self, tenant_id: Uuid) -> AppResult<Balance> {
        Ok(self.repo.find(tenant_id).await?)
    }

    /// Replaces the amount. No arithmetic is done on stored values.
    pub async fn update(&self, tenant_id: Uuid, amount: BigDecimal) -> AppResult<Balance> {
        let balance = self.repo.update_amount(tenant_id, amount).await?;
        info!(%tenant_id, amount = %balance.amount, "Balance updated");
        Ok(balance)
    }

    pub async fn delete(&self, tenant_id: Uuid) -> AppResult<()> {
        self.repo.soft_delete(tenant_id).await?;
        info!(%tenant_id, "Balance deleted");
        Ok(())
    }

    pub async fn list(&self, role: &str, filter: BalanceFilter) -> AppResult<PageResult<Balance>> {
        self.policy.require_platform(role)?;
        Ok(self.repo.list(filter).await?)
    }
}
