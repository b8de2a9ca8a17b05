use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt;
use uuid::Uuid;

use crate::db::AsyncDbPool;
use crate::models::{Branch, BranchFilter, NewBranch, PageResult, UpdateBranch};
use crate::repositories::query::{Assignments, Filter, NEWEST_FIRST, Page, Statement};
use crate::repositories::{
    ListSpec, RepoError, ensure_live_company, fetch_page, in_transaction, unix_now,
};
use crate::schema::branches;

const TABLE: &str = "branches";
const COLUMNS: &str =
    "id, company_id, name, address, phone_number, created_at, updated_at, deleted_at";

/// Branch repository.
///
/// Branches are soft-deleted: every read, update and delete ignores rows
/// whose `deleted_at` is non-zero.
#[derive(Clone)]
pub struct BranchRepository {
    pool: AsyncDbPool,
}

impl BranchRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new_branch: NewBranch) -> Result<Branch, RepoError> {
        in_transaction(&self.pool, move |conn| {
            async move {
                ensure_live_company(conn, new_branch.company_id).await?;

                diesel::insert_into(branches::table)
                    .values(&new_branch)
                    .returning(Branch::as_returning())
                    .get_result(conn)
                    .await
                    .map_err(RepoError::db("insert branch"))
            }
            .scope_boxed()
        })
        .await
    }

    pub async fn find(&self, company_id: Uuid, branch_id: Uuid) -> Result<Branch, RepoError> {
        let mut conn = self.pool.get().await?;

        branches::table
            .filter(branches::id.eq(branch_id))
            .filter(branches::company_id.eq(company_id))
            .filter(branches::deleted_at.eq(0i64))
            .select(Branch::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(RepoError::db("find branch"))?
            .ok_or_else(|| RepoError::not_found("branch", branch_id))
    }

    pub async fn list(
        &self,
        company_id: Uuid,
        filter: BranchFilter,
    ) -> Result<PageResult<Branch>, RepoError> {
        let predicates = Filter::tenant(company_id)
            .contains_opt("name", filter.name.as_deref())
            .live();

        fetch_page(
            &self.pool,
            ListSpec {
                table: TABLE,
                columns: COLUMNS,
                order: NEWEST_FIRST,
                operation: "list branches",
            },
            predicates,
            Page::new(filter.page, filter.limit),
        )
        .await
    }

    pub async fn update(
        &self,
        company_id: Uuid,
        branch_id: Uuid,
        changes: UpdateBranch,
    ) -> Result<Branch, RepoError> {
        let assignments = Assignments::new()
            .set_opt("name", changes.name.as_deref())
            .set_opt("address", changes.address.as_deref())
            .set_opt("phone_number", changes.phone_number.as_deref());
        let statement = Statement::update(
            TABLE,
            &assignments,
            &Self::target(company_id, branch_id),
            COLUMNS,
        )?;

        let mut conn = self.pool.get().await?;
        statement
            .into_query()
            .get_result::<Branch>(&mut conn)
            .await
            .optional()
            .map_err(RepoError::db("update branch"))?
            .ok_or_else(|| RepoError::not_found("branch", branch_id))
    }

    /// Stamps `deleted_at`. A second delete of the same branch fails with
    /// `NotFoundOrAlreadyDeleted`.
    pub async fn soft_delete(&self, company_id: Uuid, branch_id: Uuid) -> Result<(), RepoError> {
        let statement =
            Statement::soft_delete(TABLE, &Self::target(company_id, branch_id), unix_now());

        let mut conn = self.pool.get().await?;
        let affected = statement
            .into_query()
            .execute(&mut conn)
            .await
            .map_err(RepoError::db("delete branch"))?;

        if affected == 0 {
            return Err(RepoError::not_found_or_deleted("branch", branch_id));
        }
        Ok(())
    }

    fn target(company_id: Uuid, branch_id: Uuid) -> Filter {
        Filter::new()
            .eq("id", branch_id)
            .eq("company_id", company_id)
            .live()
    }
}
