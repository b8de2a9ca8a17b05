//! crm-auth
//!
//! Multi-tenant CRM backend: JWT sessions with separate access and refresh
//! secrets, tenant-scoped repositories over PostgreSQL, and an axum API for
//! accounts, clients, branches, companies, balances and balance-gated SMS.

use shadow_rs::shadow;
shadow!(build);

pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod external;
pub mod logger;
pub mod models;
pub mod repositories;
pub mod schema;
pub mod server;
pub mod services;
pub mod state;
pub mod utils;

pub use state::AppState;

pub fn pkg_version() -> &'static str {
    build::PKG_VERSION
}
