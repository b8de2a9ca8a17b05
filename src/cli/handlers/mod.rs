//! Command handlers for CLI operations.

pub mod bootstrap;
pub mod migrate;
pub mod serve;

pub use bootstrap::BootstrapCommandHandler;
pub use migrate::MigrateCommandHandler;
pub use serve::ServeCommandHandler;
