//! Service layer for business logic operations.
//!
//! Services sit between the HTTP handlers and the repositories. They apply
//! role checks, hash passwords, log outcomes and turn repository failures
//! into [`AppError`].

mod account_service;
mod auth_service;
mod balance_service;
mod branch_service;
mod client_service;
mod company_service;
pub mod policy;
pub mod sms;

pub use account_service::{AccountChanges, AccountDraft, AccountService};
pub use auth_service::{
    ADMIN_ROLE, AuthService, LOGIN_FAILED_MESSAGE, RegisteredTenant, TenantBootstrap,
    check_credentials,
};
pub use balance_service::BalanceService;
pub use branch_service::BranchService;
pub use client_service::ClientService;
pub use company_service::CompanyService;
pub use sms::NotificationService;

use crate::config::Settings;
use crate::error::{AppError, AppResult};
use crate::repositories::Repositories;
use crate::utils::jwt::SessionIssuer;
use crate::utils::password::hash_password;
use policy::AccessPolicy;

/// Aggregates all services.
///
/// Used as part of the axum application state; cloning is cheap since the
/// repositories share one `Arc`-backed pool.
#[derive(Clone)]
pub struct Services {
    pub auth: AuthService,
    pub accounts: AccountService,
    pub clients: ClientService,
    pub branches: BranchService,
    pub companies: CompanyService,
    pub balances: BalanceService,
    pub notifications: NotificationService,
}

impl Services {
    pub fn new(repos: Repositories, settings: &Settings) -> Self {
        let policy = AccessPolicy::new(settings.auth.platform_role.clone());

        Self {
            auth: AuthService::new(repos.accounts.clone(), SessionIssuer::new(&settings.jwt)),
            accounts: AccountService::new(repos.accounts.clone(), policy.clone()),
            clients: ClientService::new(repos.clients),
            branches: BranchService::new(repos.branches),
            companies: CompanyService::new(repos.companies, repos.accounts, policy.clone()),
            balances: BalanceService::new(repos.balances.clone(), policy),
            notifications: NotificationService::from_config(repos.balances, &settings.sms),
        }
    }
}

/// Runs CPU-bound work (argon2) off the async worker threads.
pub(crate) async fn run_blocking<T, F>(f: F) -> AppResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> AppResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal {
            source: anyhow::Error::from(e),
        })?
}

pub(crate) async fn hash_password_blocking(password: String) -> AppResult<String> {
    run_blocking(move || hash_password(&password)).await
}
