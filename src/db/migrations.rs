//! Schema migrations over a short-lived synchronous connection.
//!
//! `MigrationHarness` is blocking, so each operation runs on the blocking
//! pool with its own `PgConnection`.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::MigrationHarness;

use super::MIGRATIONS;
use crate::error::{AppError, AppResult};

fn connect(database_url: &str, purpose: &str) -> AppResult<PgConnection> {
    PgConnection::establish(database_url).map_err(|e| AppError::Database {
        operation: format!("establish connection for {purpose}"),
        source: anyhow::Error::from(e),
    })
}

fn migration_error(operation: &str) -> impl FnOnce(Box<dyn std::error::Error + Send + Sync>) -> AppError {
    let operation = operation.to_string();
    move |e| AppError::Database {
        operation,
        source: anyhow::anyhow!("Migration error: {e}"),
    }
}

async fn blocking<T: Send + 'static>(
    f: impl FnOnce() -> AppResult<T> + Send + 'static,
) -> AppResult<T> {
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal {
            source: anyhow::Error::from(e),
        })?
}

/// Names of migrations not yet applied.
pub async fn pending_migrations(database_url: String) -> AppResult<Vec<String>> {
    blocking(move || {
        let mut conn = connect(&database_url, "migration check")?;
        let pending = conn
            .pending_migrations(MIGRATIONS)
            .map_err(migration_error("check pending migrations"))?;
        Ok(pending.iter().map(|m| m.name().to_string()).collect())
    })
    .await
}

/// Applies everything pending and returns the applied versions.
pub async fn run_pending_migrations(database_url: String) -> AppResult<Vec<String>> {
    blocking(move || {
        let mut conn = connect(&database_url, "migrations")?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(migration_error("run pending migrations"))?;
        Ok(applied.iter().map(|m| m.to_string()).collect())
    })
    .await
}

/// Reverts the last `steps` migrations.
///
/// Fails up front when fewer than `steps` migrations are applied.
pub async fn revert_migrations(database_url: String, steps: u32) -> AppResult<usize> {
    if steps == 0 {
        return Err(AppError::Validation {
            field: "rollback_steps".to_string(),
            reason: "Number of rollback steps must be greater than 0".to_string(),
        });
    }

    blocking(move || {
        let mut conn = connect(&database_url, "rollback")?;
        let applied = conn
            .applied_migrations()
            .map_err(migration_error("get applied migrations"))?;

        let steps = steps as usize;
        if applied.len() < steps {
            return Err(AppError::Validation {
                field: "rollback_steps".to_string(),
                reason: format!(
                    "Cannot rollback {steps} migrations - only {} applied migrations available",
                    applied.len()
                ),
            });
        }

        for _ in 0..steps {
            conn.revert_last_migration(MIGRATIONS)
                .map_err(migration_error("revert migration"))?;
        }
        Ok(steps)
    })
    .await
}
