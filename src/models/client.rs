use diesel::prelude::*;
use jiff_diesel::DateTime;
use uuid::Uuid;

/// Client row. The `type` column is exposed as `kind`.
#[derive(Debug, Clone, Queryable, Selectable, QueryableByName)]
#[diesel(table_name = crate::schema::clients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Client {
    pub id: Uuid,
    pub company_id: Uuid,
    pub full_name: String,
    pub address: String,
    pub phone: String,
    pub kind: String,
    pub client_type: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::clients)]
pub struct NewClient {
    pub company_id: Uuid,
    pub full_name: String,
    pub address: String,
    pub phone: String,
    pub kind: String,
    pub client_type: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateClient {
    pub full_name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub kind: Option<String>,
    pub client_type: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ClientFilter {
    pub full_name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub kind: Option<String>,
    pub client_type: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}
