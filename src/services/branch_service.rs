use tracing::info;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{Branch, BranchFilter, NewBranch, PageResult, UpdateBranch};
use crate::repositories::BranchRepository;

#[derive(Clone)]
pub struct BranchService {
    repo: BranchRepository,
}

impl BranchService {
    pub fn new(repo: BranchRepository) -> Self {
        Self { repo }
    }

    pub async fn create(&self, new_branch: NewBranch) -> AppResult<Branch> {
        let branch = self.repo.create(new_branch).await?;
        info!(tenant_id = %branch.company_id, branch_id = %branch.id, "Branch created");
        Ok(branch)
    }

    pub async fn get(&self, tenant_id: Uuid, branch_id: Uuid) -> AppResult<Branch> {
        Ok(self.repo.find(tenant_id, branch_id).await?)
    }

    pub async fn list(&self, tenant_id: Uuid, filter: BranchFilter) -> AppResult<PageResult<Branch>> {
        Ok(self.repo.list(tenant_id, filter).await?)
    }

    pub async fn update(
        &self,
        tenant_id: Uuid,
        branch_id: Uuid,
        changes: UpdateBranch,
    ) -> AppResult<Branch> {
        Ok(self.repo.update(tenant_id, branch_id, changes).await?)
    }

    /// Soft delete.
    pub async fn delete(&self, tenant_id: Uuid, branch_id: Uuid) -> AppResult<()> {
        self.repo.soft_delete(tenant_id, branch_id).await?;
        info!(%tenant_id, %branch_id, "Branch deleted");
        Ok(())
    }
}
