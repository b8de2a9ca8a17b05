//! Database access: the async connection pool and schema migrations.

pub mod migrations;
mod pool;

pub use migrations::{pending_migrations, revert_migrations, run_pending_migrations};
pub use pool::{AsyncDbPool, MIGRATIONS, establish_async_connection_pool};
