//! Data Transfer Objects for API requests and responses.
//!
//! One module per resource, plus the shared `error` and `pagination` shapes.
//! Timestamps are rendered as `YYYY-MM-DDTHH:MM:SS` in UTC.

mod account;
mod auth;
mod balance;
mod branch;
mod client;
mod company;
mod error;
mod health;
mod pagination;
mod sms;

pub use account::{
    AccountListQuery, AccountResponse, CompanyAccountsQuery, CreateAccountRequest,
    UpdateAccountRequest,
};
pub use auth::{LoginRequest, RefreshTokenRequest, RegisterRequest, RegisterResponse, TokenResponse};
pub use balance::{BalanceListQuery, BalanceRequest, BalanceResponse};
pub use branch::{BranchListQuery, BranchResponse, CreateBranchRequest, UpdateBranchRequest};
pub use client::{ClientListQuery, ClientResponse, CreateClientRequest, UpdateClientRequest};
pub use company::{CompanyListQuery, CompanyResponse, CreateCompanyRequest, UpdateCompanyRequest};
pub use error::{ErrorResponse, MessageResponse};
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
pub use pagination::ListResponse;
pub use sms::{SmsRequest, SmsResponse};

pub(crate) fn format_timestamp(value: &jiff_diesel::DateTime) -> String {
    value.to_jiff().strftime("%Y-%m-%dT%H:%M:%S").to_string()
}
