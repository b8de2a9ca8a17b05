//! Bootstrap command handler: first company and admin account.

use tracing::info;

use crate::config::Settings;
use crate::db::establish_async_connection_pool;
use crate::error::AppResult;
use crate::models::{Account, Company};
use crate::repositories::Repositories;
use crate::services::{Services, TenantBootstrap};

pub struct BootstrapCommandHandler {
    config: Settings,
}

impl BootstrapCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Creates the company and its admin in one transaction. A duplicate
    /// phone number leaves no company behind.
    pub async fn execute(&self, input: TenantBootstrap) -> AppResult<(Company, Account)> {
        let pool = establish_async_connection_pool(&self.config.database).await?;
        let services = Services::new(Repositories::new(pool), &self.config);

        let (company, account) = services.auth.bootstrap_tenant(input).await?;
        info!(company_id = %company.id, account_id = %account.id, "Bootstrap completed");

        println!("✓ Created company {} ({})", company.name, company.id);
        println!(
            "✓ Created admin account {} ({}) with phone {}",
            account.first_name, account.id, account.phone_number
        );
        Ok((company, account))
    }
}

/// Builds the bootstrap input from CLI values. Blank emails are dropped.
pub fn bootstrap_input(
    company: &str,
    first_name: &str,
    last_name: &str,
    phone: &str,
    password: &str,
    email: Option<&str>,
    role: &str,
) -> TenantBootstrap {
    TenantBootstrap {
        company_name: company.to_string(),
        website: None,
        logo: None,
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: email
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string),
        phone_number: phone.to_string(),
        password: password.to_string(),
        role: role.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ADMIN_ROLE;

    #[test]
    fn test_bootstrap_input() {
        let input = bootstrap_input("Acme", "Jo", "Doe", "+1000", "pw", Some("  "), ADMIN_ROLE);
        assert_eq!(input.company_name, "Acme");
        assert_eq!(input.phone_number, "+1000");
        assert_eq!(input.password, "pw");
        assert!(input.email.is_none());
        assert_eq!(input.role, "admin");

        let input = bootstrap_input(
            "Platform Ops",
            "Jo",
            "Doe",
            "+1000",
            "pw",
            Some("jo@acme.test"),
            "superadmin",
        );
        assert_eq!(input.role, "superadmin");
        assert_eq!(input.email.as_deref(), Some("jo@acme.test"));
    }
}
