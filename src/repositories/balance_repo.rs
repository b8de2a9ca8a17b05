use bigdecimal::BigDecimal;
use diesel::prelude::*;
use diesel::sql_types::{Numeric, Uuid as SqlUuid};
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt;
use uuid::Uuid;

use crate::db::AsyncDbPool;
use crate::models::{Balance, BalanceFilter, NewBalance, PageResult};
use crate::repositories::query::{Assignments, Filter, Page, Statement};
use crate::repositories::{
    ListSpec, RepoError, ensure_live_company, fetch_page, in_transaction, unix_now,
};
use crate::schema::balances;

const TABLE: &str = "balances";
const COLUMNS: &str = "company_id, amount, created_at, updated_at, deleted_at";
// Balances are keyed by company, there is no surrogate id.
const ORDER: &str = "created_at DESC, company_id DESC";

// Revives a soft-deleted row in place; a live row makes the WHERE fail and
// nothing is returned.
const UPSERT: &str = "INSERT INTO balances (company_id, amount) VALUES ($1, $2) \
     ON CONFLICT (company_id) DO UPDATE \
     SET amount = EXCLUDED.amount, deleted_at = 0, updated_at = NOW() \
     WHERE balances.deleted_at <> 0 \
     RETURNING company_id, amount, created_at, updated_at, deleted_at";

/// Per-tenant balance storage. At most one live balance exists per company.
#[derive(Clone)]
pub struct BalanceRepository {
    pool: AsyncDbPool,
}

impl BalanceRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    /// Opens the balance for a live company.
    ///
    /// Fails with `AlreadyExists` when the company already has a live balance.
    pub async fn create(&self, new_balance: NewBalance) -> Result<Balance, RepoError> {
        in_transaction(&self.pool, move |conn| {
            async move {
                let NewBalance { company_id, amount } = new_balance;
                ensure_live_company(conn, company_id).await?;

                diesel::sql_query(UPSERT)
                    .bind::<SqlUuid, _>(company_id)
                    .bind::<Numeric, _>(amount)
                    .get_result::<Balance>(conn)
                    .await
                    .optional()
                    .map_err(RepoError::db("insert balance"))?
                    .ok_or_else(|| RepoError::AlreadyExists {
                        entity: "balance",
                        id: company_id.to_string(),
                    })
            }
            .scope_boxed()
        })
        .await
    }

    pub async fn find(&self, company_id: Uuid) -> Result<Balance, RepoError> {
        let mut conn = self.pool.get().await?;

        balances::table
            .filter(balances::company_id.eq(company_id))
            .filter(balances::deleted_at.eq(0i64))
            .select(Balance::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(RepoError::db("find balance"))?
            .ok_or_else(|| RepoError::not_found("balance", company_id))
    }

    /// Lists live balances across all tenants.
    pub async fn list(&self, filter: BalanceFilter) -> Result<PageResult<Balance>, RepoError> {
        fetch_page(
            &self.pool,
            ListSpec {
                table: TABLE,
                columns: COLUMNS,
                order: ORDER,
                operation: "list balances",
            },
            Filter::new().live(),
            Page::new(filter.page, filter.limit),
        )
        .await
    }

    pub async fn update_amount(
        &self,
        company_id: Uuid,
        amount: BigDecimal,
    ) -> Result<Balance, RepoError> {
        let statement = Statement::update(
            TABLE,
            &Assignments::new().set("amount", amount),
            &Self::target(company_id),
            COLUMNS,
        )?;

        let mut conn = self.pool.get().await?;
        statement
            .into_query()
            .get_result::<Balance>(&mut conn)
            .await
            .optional()
            .map_err(RepoError::db("update balance"))?
            .ok_or_else(|| RepoError::not_found("balance", company_id))
    }

    pub async fn soft_delete(&self, company_id: Uuid) -> Result<(), RepoError> {
        let statement = Statement::soft_delete(TABLE, &Self::target(company_id), unix_now());

        let mut conn = self.pool.get().await?;
        let affected = statement
            .into_query()
            .execute(&mut conn)
            .await
            .map_err(RepoError::db("delete balance"))?;

        if affected == 0 {
            return Err(RepoError::not_found_or_deleted("balance", company_id));
        }
        Ok(())
    }

    fn target(company_id: Uuid) -> Filter {
        Filter::tenant(company_id).live()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::query::SqlValue;
    use std::str::FromStr;

    #[test]
    fn amount_update_binds_numeric() {
        let amount = BigDecimal::from_str("250.50").unwrap();
        let stmt = Statement::update(
            TABLE,
            &Assignments::new().set("amount", amount.clone()),
            &BalanceRepository::target(Uuid::from_u128(3)),
            COLUMNS,
        )
        .unwrap();

        assert_eq!(
            stmt.sql(),
            "UPDATE balances SET amount = $1, updated_at = NOW() \
             WHERE company_id = $2 AND deleted_at = $3 \
             RETURNING company_id, amount, created_at, updated_at, deleted_at"
        );
        assert_eq!(stmt.binds()[0], SqlValue::Numeric(amount));
    }

    #[test]
    fn listing_orders_without_surrogate_id() {
        let stmt = Statement::select(TABLE, COLUMNS, &Filter::new().live(), ORDER, None);
        assert!(stmt.sql().ends_with("ORDER BY created_at DESC, company_id DESC"));
    }
}
