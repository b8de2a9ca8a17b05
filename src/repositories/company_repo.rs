//! Company (tenant) repository.
//!
//! A company row is its own tenant: the `id` column plays the role that
//! `company_id` plays on every other table.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::AsyncDbPool;
use crate::models::{Company, CompanyFilter, NewCompany, PageResult, UpdateCompany};
use crate::repositories::query::{Assignments, Filter, NEWEST_FIRST, Page, Statement};
use crate::repositories::{ListSpec, RepoError, fetch_page, unix_now};
use crate::schema::companies;

const TABLE: &str = "companies";
const COLUMNS: &str = "id, name, website, logo, created_at, updated_at, deleted_at";

#[derive(Clone)]
pub struct CompanyRepository {
    pool: AsyncDbPool,
}

impl CompanyRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new_company: NewCompany) -> Result<Company, RepoError> {
        let mut conn = self.pool.get().await?;

        diesel::insert_into(companies::table)
            .values(&new_company)
            .returning(Company::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(RepoError::db("insert company"))
    }

    /// Returns the company if it exists and has not been soft-deleted.
    pub async fn find(&self, company_id: Uuid) -> Result<Company, RepoError> {
        let mut conn = self.pool.get().await?;

        companies::table
            .filter(companies::id.eq(company_id))
            .filter(companies::deleted_at.eq(0i64))
            .select(Company::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(RepoError::db("find company"))?
            .ok_or_else(|| RepoError::not_found("company", company_id))
    }

    /// Lists every live company. Callers gate this on the platform role.
    pub async fn list(&self, filter: CompanyFilter) -> Result<PageResult<Company>, RepoError> {
        let predicates = Filter::new()
            .contains_opt("name", filter.name.as_deref())
            .live();

        fetch_page(
            &self.pool,
            ListSpec {
                table: TABLE,
                columns: COLUMNS,
                order: NEWEST_FIRST,
                operation: "list companies",
            },
            predicates,
            Page::new(filter.page, filter.limit),
        )
        .await
    }

    pub async fn update(
        &self,
        company_id: Uuid,
        changes: UpdateCompany,
    ) -> Result<Company, RepoError> {
        let assignments = Assignments::new()
            .set_opt("name", changes.name.as_deref())
            .set_opt("website", changes.website.as_deref())
            .set_opt("logo", changes.logo.as_deref());
        let statement =
            Statement::update(TABLE, &assignments, &Self::target(company_id), COLUMNS)?;

        let mut conn = self.pool.get().await?;
        statement
            .into_query()
            .get_result::<Company>(&mut conn)
            .await
            .optional()
            .map_err(RepoError::db("update company"))?
            .ok_or_else(|| RepoError::not_found("company", company_id))
    }

    /// Soft-deletes the tenant. Its accounts stop being able to log in, since
    /// login and session lookups join on live companies.
    pub async fn soft_delete(&self, company_id: Uuid) -> Result<(), RepoError> {
        let statement = Statement::soft_delete(TABLE, &Self::target(company_id), unix_now());

        let mut conn = self.pool.get().await?;
        let affected = statement
            .into_query()
            .execute(&mut conn)
            .await
            .map_err(RepoError::db("delete company"))?;

        if affected == 0 {
            return Err(RepoError::not_found_or_deleted("company", company_id));
        }
        Ok(())
    }

    fn target(company_id: Uuid) -> Filter {
        Filter::new().eq("id", company_id).live()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn company_update_is_keyed_on_its_own_id() {
        let stmt = Statement::update(
            TABLE,
            &Assignments::new().set_opt("website", Some("https://acme.test")),
            &CompanyRepository::target(Uuid::from_u128(9)),
            COLUMNS,
        )
        .unwrap();
        assert_eq!(
            stmt.sql(),
            "UPDATE companies SET website = $1, updated_at = NOW() \
             WHERE id = $2 AND deleted_at = $3 \
             RETURNING id, name, website, logo, created_at, updated_at, deleted_at"
        );
    }
}
