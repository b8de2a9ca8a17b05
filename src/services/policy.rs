//! Role checks shared by the account, company and balance services.

use uuid::Uuid;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct AccessPolicy {
    platform_role: String,
}

impl AccessPolicy {
    pub fn new(platform_role: impl Into<String>) -> Self {
        Self {
            platform_role: platform_role.into(),
        }
    }

    pub fn is_platform(&self, role: &str) -> bool {
        role == self.platform_role
    }

    /// Cross-tenant operations: listing every tenant, creating a bare tenant.
    pub fn require_platform(&self, role: &str) -> AppResult<()> {
        if self.is_platform(role) {
            Ok(())
        } else {
            Err(AppError::Forbidden {
                message: "This operation requires the platform role".to_string(),
            })
        }
    }

    /// A caller may act on its own tenant; the platform role on any.
    ///
    /// Other tenants are reported as missing so their ids cannot be enumerated.
    pub fn require_tenant(&self, caller_tenant: Uuid, role: &str, company_id: Uuid) -> AppResult<()> {
        if caller_tenant == company_id || self.is_platform(role) {
            Ok(())
        } else {
            Err(AppError::not_found("company", "id", company_id))
        }
    }

    /// Only platform callers may hand out the platform role.
    pub fn require_grantable(&self, caller_role: &str, requested_role: &str) -> AppResult<()> {
        if self.is_platform(requested_role.trim()) && !self.is_platform(caller_role) {
            return Err(AppError::Forbidden {
                message: "The platform role cannot be assigned by this account".to_string(),
            });
        }
        Ok(())
    }
}
