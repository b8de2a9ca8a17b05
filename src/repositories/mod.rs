//! Tenant-scoped data access.
//!
//! Typed lookups use the diesel DSL; dynamic filters, partial updates and soft
//! deletes go through the [`query`] statement builder. Every tenant-owned
//! read, update and delete carries a `company_id` predicate.

mod account_repo;
mod balance_repo;
mod branch_repo;
mod client_repo;
mod company_repo;
mod error;
pub mod query;

pub use account_repo::AccountRepository;
pub use balance_repo::BalanceRepository;
pub use branch_repo::BranchRepository;
pub use client_repo::ClientRepository;
pub use company_repo::CompanyRepository;
pub use error::RepoError;

use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel_async::scoped_futures::{ScopedBoxFuture, ScopedFutureExt};
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::db::AsyncDbPool;
use crate::models::PageResult;
use crate::schema::companies;
use query::{Filter, Page, Statement};

/// Aggregates all repositories.
///
/// `AsyncDbPool` is `Arc`-backed, so cloning this is cheap.
#[derive(Clone)]
pub struct Repositories {
    pub accounts: AccountRepository,
    pub balances: BalanceRepository,
    pub branches: BranchRepository,
    pub clients: ClientRepository,
    pub companies: CompanyRepository,
}

impl Repositories {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self {
            accounts: AccountRepository::new(pool.clone()),
            balances: BalanceRepository::new(pool.clone()),
            branches: BranchRepository::new(pool.clone()),
            clients: ClientRepository::new(pool.clone()),
            companies: CompanyRepository::new(pool),
        }
    }
}

#[derive(QueryableByName)]
struct CountRow {
    #[diesel(sql_type = BigInt)]
    total: i64,
}

/// Describes one listable table for [`fetch_page`].
pub(crate) struct ListSpec {
    pub table: &'static str,
    pub columns: &'static str,
    pub order: &'static str,
    pub operation: &'static str,
}

/// Runs the page query and its count inside one read-only REPEATABLE READ
/// transaction so `total` and `items` describe the same snapshot.
pub(crate) async fn fetch_page<T>(
    pool: &AsyncDbPool,
    spec: ListSpec,
    filter: Filter,
    page: Page,
) -> Result<PageResult<T>, RepoError>
where
    T: QueryableByName<Pg> + Send + 'static,
{
    let select = Statement::select(spec.table, spec.columns, &filter, spec.order, Some(page));
    let count = Statement::count(spec.table, &filter);
    let operation = spec.operation;

    let mut conn = pool.get().await?;
    let conn: &mut AsyncPgConnection = &mut conn;
    let (items, total) = conn
        .build_transaction()
        .read_only()
        .repeatable_read()
        .run::<_, RepoError, _>(|conn| {
            async move {
                let items = select
                    .into_query()
                    .load::<T>(conn)
                    .await
                    .map_err(RepoError::db(operation))?;
                let total = count
                    .into_query()
                    .get_result::<CountRow>(conn)
                    .await
                    .map_err(RepoError::db(operation))?
                    .total;
                Ok((items, total))
            }
            .scope_boxed()
        })
        .await?;

    Ok(PageResult {
        items,
        page: page.page,
        limit: page.limit,
        total,
    })
}

/// Fails with `TenantNotFound` unless the company exists and is live.
///
/// Takes a share lock so a concurrent soft delete waits for the caller's
/// transaction to finish.
pub(crate) async fn ensure_live_company(
    conn: &mut AsyncPgConnection,
    company_id: Uuid,
) -> Result<(), RepoError> {
    let found = companies::table
        .filter(companies::id.eq(company_id))
        .filter(companies::deleted_at.eq(0i64))
        .select(companies::id)
        .for_share()
        .first::<Uuid>(conn)
        .await
        .optional()
        .map_err(RepoError::db("check company"))?;

    match found {
        Some(_) => Ok(()),
        None => Err(RepoError::TenantNotFound { id: company_id }),
    }
}

/// Current unix time in seconds, used as the soft-delete stamp.
pub(crate) fn unix_now() -> i64 {
    jiff::Timestamp::now().as_second()
}

/// Opens a read-write transaction on a pooled connection.
pub(crate) async fn in_transaction<T, F>(pool: &AsyncDbPool, f: F) -> Result<T, RepoError>
where
    T: Send + 'static,
    F: for<'r> FnOnce(&'r mut AsyncPgConnection) -> ScopedBoxFuture<'static, 'r, Result<T, RepoError>>
        + Send
        + 'static,
{
    let mut conn = pool.get().await?;
    let conn: &mut AsyncPgConnection = &mut conn;
    conn.transaction::<T, RepoError, _>(f).await
}
