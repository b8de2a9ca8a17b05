//! Account repository.
//!
//! Accounts are hard-deleted. Phone numbers are globally unique, which makes
//! them usable as the login identifier without a tenant hint.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt;
use uuid::Uuid;

use crate::db::AsyncDbPool;
use crate::models::{
    Account, AccountFilter, Company, NewAccount, NewCompany, PageResult, UpdateAccount,
};
use crate::repositories::query::{Assignments, Filter, NEWEST_FIRST, Page, Statement};
use crate::repositories::{ListSpec, RepoError, ensure_live_company, fetch_page, in_transaction};
use crate::schema::{accounts, companies};

const TABLE: &str = "accounts";
const COLUMNS: &str = "id, company_id, first_name, last_name, email, phone_number, \
                       password_hash, role, created_at, updated_at";
const FULL_NAME: &str = "first_name || ' ' || last_name";

#[derive(Clone)]
pub struct AccountRepository {
    pool: AsyncDbPool,
}

impl AccountRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    /// Inserts an account after confirming its company is live.
    ///
    /// The check and the insert share one transaction; a missing tenant
    /// yields `TenantNotFound` and nothing is written.
    pub async fn create(&self, new_account: NewAccount) -> Result<Account, RepoError> {
        in_transaction(&self.pool, move |conn| {
            async move {
                ensure_live_company(conn, new_account.company_id).await?;

                diesel::insert_into(accounts::table)
                    .values(&new_account)
                    .returning(Account::as_returning())
                    .get_result(conn)
                    .await
                    .map_err(RepoError::db("insert account"))
            }
            .scope_boxed()
        })
        .await
    }

    /// Creates a tenant together with its first account.
    ///
    /// Both inserts run in one transaction, so a failed account insert (for
    /// example a duplicate phone number) leaves no orphan company behind.
    pub async fn create_with_company(
        &self,
        new_company: NewCompany,
        first_account: impl FnOnce(Uuid) -> NewAccount + Send + 'static,
    ) -> Result<(Company, Account), RepoError> {
        in_transaction(&self.pool, move |conn| {
            async move {
                let company = diesel::insert_into(companies::table)
                    .values(&new_company)
                    .returning(Company::as_returning())
                    .get_result(conn)
                    .await
                    .map_err(RepoError::db("insert company"))?;

                let account = diesel::insert_into(accounts::table)
                    .values(&first_account(company.id))
                    .returning(Account::as_returning())
                    .get_result(conn)
                    .await
                    .map_err(RepoError::db("insert account"))?;

                Ok((company, account))
            }
            .scope_boxed()
        })
        .await
    }

    /// Looks up a login candidate by phone number. Accounts of soft-deleted
    /// companies are invisible here.
    pub async fn find_for_login(&self, phone_number: &str) -> Result<Option<Account>, RepoError> {
        let mut conn = self.pool.get().await?;

        accounts::table
            .inner_join(companies::table)
            .filter(accounts::phone_number.eq(phone_number))
            .filter(companies::deleted_at.eq(0i64))
            .select(Account::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(RepoError::db("find account by phone"))
    }

    /// Tenant-scoped lookup.
    pub async fn find(&self, company_id: Uuid, account_id: Uuid) -> Result<Account, RepoError> {
        let mut conn = self.pool.get().await?;

        accounts::table
            .inner_join(companies::table)
            .filter(accounts::id.eq(account_id))
            .filter(accounts::company_id.eq(company_id))
            .filter(companies::deleted_at.eq(0i64))
            .select(Account::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(RepoError::db("find account"))?
            .ok_or_else(|| RepoError::not_found("account", account_id))
    }

    pub async fn list(
        &self,
        company_id: Uuid,
        filter: AccountFilter,
    ) -> Result<PageResult<Account>, RepoError> {
        let predicates = Filter::tenant(company_id)
            .contains_opt("first_name", filter.first_name.as_deref())
            .contains_opt("last_name", filter.last_name.as_deref())
            .eq_opt("role", filter.role.as_deref());

        fetch_page(
            &self.pool,
            Self::list_spec("list accounts"),
            predicates,
            Page::new(filter.page, filter.limit),
        )
        .await
    }

    /// Lists a company's accounts matching a substring of "first last".
    pub async fn list_by_full_name(
        &self,
        company_id: Uuid,
        name: Option<&str>,
        page: Page,
    ) -> Result<PageResult<Account>, RepoError> {
        let predicates = Filter::tenant(company_id).contains_opt(FULL_NAME, name);

        fetch_page(
            &self.pool,
            Self::list_spec("list company accounts"),
            predicates,
            page,
        )
        .await
    }

    /// Applies only the supplied fields. Empty payloads are rejected before
    /// a connection is taken.
    pub async fn update(
        &self,
        company_id: Uuid,
        account_id: Uuid,
        changes: UpdateAccount,
    ) -> Result<Account, RepoError> {
        let statement = Statement::update(
            TABLE,
            &Self::assignments(&changes),
            &Filter::new()
                .eq("id", account_id)
                .eq("company_id", company_id),
            COLUMNS,
        )?;

        let mut conn = self.pool.get().await?;
        statement
            .into_query()
            .get_result::<Account>(&mut conn)
            .await
            .optional()
            .map_err(RepoError::db("update account"))?
            .ok_or_else(|| RepoError::not_found("account", account_id))
    }

    pub async fn delete(&self, company_id: Uuid, account_id: Uuid) -> Result<(), RepoError> {
        let mut conn = self.pool.get().await?;

        let deleted = diesel::delete(
            accounts::table
                .filter(accounts::id.eq(account_id))
                .filter(accounts::company_id.eq(company_id)),
        )
        .execute(&mut conn)
        .await
        .map_err(RepoError::db("delete account"))?;

        if deleted == 0 {
            return Err(RepoError::not_found("account", account_id));
        }
        Ok(())
    }

    fn assignments(changes: &UpdateAccount) -> Assignments {
        Assignments::new()
            .set_opt("first_name", changes.first_name.as_deref())
            .set_opt("last_name", changes.last_name.as_deref())
            .set_opt("email", changes.email.as_deref())
            .set_opt("phone_number", changes.phone_number.as_deref())
            .set_opt("password_hash", changes.password_hash.as_deref())
            .set_opt("role", changes.role.as_deref())
    }

    fn list_spec(operation: &'static str) -> ListSpec {
        ListSpec {
            table: TABLE,
            columns: COLUMNS,
            order: NEWEST_FIRST,
            operation,
        }
    }
}
