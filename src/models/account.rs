use diesel::prelude::*;
use jiff_diesel::DateTime;
use uuid::Uuid;

/// Account row.
///
/// Deliberately not `Serialize`: `password_hash` must never leave the
/// service layer, so responses go through `AccountResponse`.
#[derive(Debug, Clone, Queryable, Selectable, QueryableByName)]
#[diesel(table_name = crate::schema::accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Account {
    pub id: Uuid,
    pub company_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone_number: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::accounts)]
pub struct NewAccount {
    pub company_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone_number: String,
    pub password_hash: String,
    pub role: String,
}

/// Partial update; `None` and blank values are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccount {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}
