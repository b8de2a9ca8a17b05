use bigdecimal::BigDecimal;
use diesel::prelude::*;
use jiff_diesel::DateTime;
use uuid::Uuid;

/// One balance per tenant, keyed by `company_id`.
#[derive(Debug, Clone, Queryable, Selectable, QueryableByName)]
#[diesel(table_name = crate::schema::balances)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Balance {
    pub company_id: Uuid,
    pub amount: BigDecimal,
    pub created_at: DateTime,
    pub updated_at: DateTime,
    pub deleted_at: i64,
}

#[derive(Debug, Clone)]
pub struct NewBalance {
    pub company_id: Uuid,
    pub amount: BigDecimal,
}

#[derive(Debug, Clone, Default)]
pub struct BalanceFilter {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}
