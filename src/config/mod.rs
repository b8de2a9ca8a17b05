//! Layered configuration for crm-auth
//!
//! # Configuration Priority (lowest to highest)
//! 1. `default.toml`
//! 2. `{environment}.toml`
//! 3. `local.toml` (not committed)
//! 4. `CRM_*` environment variables
//! 5. CLI flags (applied by the CLI layer)

pub mod environment;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use environment::Environment;
pub use loader::ConfigLoader;
pub use settings::{AuthConfig, DatabaseConfig, JwtConfig, Settings, SmsConfig};
