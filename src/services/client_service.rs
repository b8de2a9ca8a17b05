use tracing::info;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{Client, ClientFilter, NewClient, PageResult, UpdateClient};
use crate::repositories::ClientRepository;

/// Client records of one tenant.
#[derive(Clone)]
pub struct ClientService {
    repo: ClientRepository,
}

impl ClientService {
    pub fn new(repo: ClientRepository) -> Self {
        Self { repo }
    }

    /// `new_client.company_id` must already be the caller's tenant.
    pub async fn create(&self, new_client: NewClient) -> AppResult<Client> {
        let client = self.repo.create(new_client).await?;
        info!(tenant_id = %client.company_id, client_id = %client.id, "Client created");
        Ok(client)
    }

    pub async fn get(&self, tenant_id: Uuid, client_id: Uuid) -> AppResult<Client> {
        Ok(self.repo.find(tenant_id, client_id).await?)
    }

    pub async fn list(&self, tenant_id: Uuid, filter: ClientFilter) -> AppResult<PageResult<Client>> {
        Ok(self.repo.list(tenant_id, filter).await?)
    }

    pub async fn update(
        &self,
        tenant_id: Uuid,
        client_id: Uuid,
        changes: UpdateClient,
    ) -> AppResult<Client> {
        Ok(self.repo.update(tenant_id, client_id, changes).await?)
    }

    pub async fn delete(&self, tenant_id: Uuid, client_id: Uuid) -> AppResult<()> {
        self.repo.delete(tenant_id, client_id).await?;
        info!(%tenant_id, %client_id, "Client deleted");
        Ok(())
    }
}
