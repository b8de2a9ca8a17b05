use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt;
use uuid::Uuid;

use crate::db::AsyncDbPool;
use crate::models::{Client, ClientFilter, NewClient, PageResult, UpdateClient};
use crate::repositories::query::{Assignments, Filter, NEWEST_FIRST, Page, Statement};
use crate::repositories::{ListSpec, RepoError, ensure_live_company, fetch_page, in_transaction};
use crate::schema::{clients, companies};

const TABLE: &str = "clients";
// `type` is reserved in Rust, so the row struct reads it back as `kind`.
const COLUMNS: &str = "id, company_id, full_name, address, phone, type AS kind, client_type, \
                       created_at, updated_at";

/// Client repository. Clients are hard-deleted.
#[derive(Clone)]
pub struct ClientRepository {
    pool: AsyncDbPool,
}

impl ClientRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new_client: NewClient) -> Result<Client, RepoError> {
        in_transaction(&self.pool, move |conn| {
            async move {
                ensure_live_company(conn, new_client.company_id).await?;

                diesel::insert_into(clients::table)
                    .values(&new_client)
                    .returning(Client::as_returning())
                    .get_result(conn)
                    .await
                    .map_err(RepoError::db("insert client"))
            }
            .scope_boxed()
        })
        .await
    }

    pub async fn find(&self, company_id: Uuid, client_id: Uuid) -> Result<Client, RepoError> {
        let mut conn = self.pool.get().await?;

        clients::table
            .inner_join(companies::table)
            .filter(clients::id.eq(client_id))
            .filter(clients::company_id.eq(company_id))
            .filter(companies::deleted_at.eq(0i64))
            .select(Client::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(RepoError::db("find client"))?
            .ok_or_else(|| RepoError::not_found("client", client_id))
    }

    /// Text fields match as case-insensitive substrings, `type` and
    /// `client_type` match exactly.
    pub async fn list(
        &self,
        company_id: Uuid,
        filter: ClientFilter,
    ) -> Result<PageResult<Client>, RepoError> {
        fetch_page(
            &self.pool,
            ListSpec {
                table: TABLE,
                columns: COLUMNS,
                order: NEWEST_FIRST,
                operation: "list clients",
            },
            Self::predicates(company_id, &filter),
            Page::new(filter.page, filter.limit),
        )
        .await
    }

    pub async fn update(
        &self,
        company_id: Uuid,
        client_id: Uuid,
        changes: UpdateClient,
    ) -> Result<Client, RepoError> {
        let assignments = Assignments::new()
            .set_opt("full_name", changes.full_name.as_deref())
            .set_opt("address", changes.address.as_deref())
            .set_opt("phone", changes.phone.as_deref())
            .set_opt("type", changes.kind.as_deref())
            .set_opt("client_type", changes.client_type.as_deref());
        let statement = Statement::update(
            TABLE,
            &assignments,
            &Filter::new().eq("id", client_id).eq("company_id", company_id),
            COLUMNS,
        )?;

        let mut conn = self.pool.get().await?;
        statement
            .into_query()
            .get_result::<Client>(&mut conn)
            .await
            .optional()
            .map_err(RepoError::db("update client"))?
            .ok_or_else(|| RepoError::not_found("client", client_id))
    }

    pub async fn delete(&self, company_id: Uuid, client_id: Uuid) -> Result<(), RepoError> {
        let mut conn = self.pool.get().await?;

        let deleted = diesel::delete(
            clients::table
                .filter(clients::id.eq(client_id))
                .filter(clients::company_id.eq(company_id)),
        )
        .execute(&mut conn)
        .await
        .map_err(RepoError::db("delete client"))?;

        if deleted == 0 {
            return Err(RepoError::not_found("client", client_id));
        }
        Ok(())
    }

    fn predicates(company_id: Uuid, filter: &ClientFilter) -> Filter {
        Filter::tenant(company_id)
            .contains_opt("full_name", filter.full_name.as_deref())
            .contains_opt("address", filter.address.as_deref())
            .contains_opt("phone", filter.phone.as_deref())
            .eq_opt("type", filter.kind.as_deref())
            .eq_opt("client_type", filter.client_type.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_filters_render_in_declared_order() {
        let tenant = Uuid::from_u128(42);
        let filter = ClientFilter {
            full_name: Some("ali".into()),
            kind: Some("vip".into()),
            client_type: Some("  ".into()),
            ..ClientFilter::default()
        };
        let stmt = Statement::select(
            TABLE,
            COLUMNS,
            &ClientRepository::predicates(tenant, &filter),
            NEWEST_FIRST,
            Some(Page::default()),
        );

        assert!(stmt.sql().starts_with("SELECT id, company_id, full_name"));
        assert!(stmt.sql().contains("type AS kind"));
        assert!(stmt.sql().contains(
            "WHERE company_id = $1 AND full_name ILIKE $2 AND type = $3 ORDER BY"
        ));
        assert!(stmt.sql().ends_with("LIMIT $4 OFFSET $5"));
    }

    #[test]
    fn unfiltered_list_still_scoped_to_tenant() {
        let filter = ClientRepository::predicates(Uuid::nil(), &ClientFilter::default());
        assert_eq!(filter.len(), 1);
        assert_eq!(
            Statement::count(TABLE, &filter).sql(),
            "SELECT COUNT(*) AS total FROM clients WHERE company_id = $1"
        );
    }
}
