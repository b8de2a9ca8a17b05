use diesel::prelude::*;
use jiff_diesel::DateTime;
use uuid::Uuid;

/// Tenant row. `deleted_at` is unix seconds, `0` while live.
#[derive(Debug, Clone, Queryable, Selectable, QueryableByName)]
#[diesel(table_name = crate::schema::companies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub website: Option<String>,
    pub logo: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
    pub deleted_at: i64,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::companies)]
pub struct NewCompany {
    pub name: String,
    pub website: Option<String>,
    pub logo: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateCompany {
    pub name: Option<String>,
    pub website: Option<String>,
    pub logo: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CompanyFilter {
    pub name: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}
