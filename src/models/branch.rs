use diesel::prelude::*;
use jiff_diesel::DateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Queryable, Selectable, QueryableByName)]
#[diesel(table_name = crate::schema::branches)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Branch {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub address: String,
    pub phone_number: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
    pub deleted_at: i64,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::branches)]
pub struct NewBranch {
    pub company_id: Uuid,
    pub name: String,
    pub address: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateBranch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct BranchFilter {
    pub name: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}
