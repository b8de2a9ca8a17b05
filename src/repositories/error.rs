use diesel_async::pooled_connection::PoolError;
use thiserror::Error;
use uuid::Uuid;

use crate::error::{AppError, DatabaseErrorConverter};

/// Failures surfaced by the repository layer.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// A partial update arrived with nothing to set
    #[error("no fields to update")]
    NoFieldsToUpdate,

    #[error("{entity} {id} not found or already deleted")]
    NotFoundOrAlreadyDeleted { entity: &'static str, id: String },

    #[error("tenant {id} not found")]
    TenantNotFound { id: Uuid },

    #[error("{entity} {id} already exists")]
    AlreadyExists { entity: &'static str, id: String },

    #[error("database operation failed: {operation}")]
    Database {
        operation: &'static str,
        #[source]
        source: diesel::result::Error,
    },

    #[error("connection pool error")]
    Pool {
        #[source]
        source: bb8::RunError<PoolError>,
    },
}

impl RepoError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        RepoError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn not_found_or_deleted(entity: &'static str, id: impl ToString) -> Self {
        RepoError::NotFoundOrAlreadyDeleted {
            entity,
            id: id.to_string(),
        }
    }

    /// Wraps a diesel error with the name of the failed operation.
    pub fn db(operation: &'static str) -> impl FnOnce(diesel::result::Error) -> Self {
        move |source| RepoError::Database { operation, source }
    }
}

impl From<diesel::result::Error> for RepoError {
    fn from(source: diesel::result::Error) -> Self {
        RepoError::Database {
            operation: "transaction",
            source,
        }
    }
}

impl From<bb8::RunError<PoolError>> for RepoError {
    fn from(source: bb8::RunError<PoolError>) -> Self {
        RepoError::Pool { source }
    }
}

impl From<RepoError> for AppError {
    fn from(error: RepoError) -> Self {
        match error {
            RepoError::NotFound { entity, id }
            | RepoError::NotFoundOrAlreadyDeleted { entity, id } => {
                AppError::not_found(entity, "id", id)
            }
            RepoError::TenantNotFound { id } => AppError::not_found("company", "id", id),
            RepoError::NoFieldsToUpdate => AppError::Validation {
                field: "body".to_string(),
                reason: "no fields to update".to_string(),
            },
            RepoError::AlreadyExists { entity, id } => AppError::Duplicate {
                entity: entity.to_string(),
                field: "company_id".to_string(),
                value: id,
            },
            RepoError::Database { operation, source } => {
                DatabaseErrorConverter::convert_diesel_error(source, operation)
            }
            RepoError::Pool { source } => AppError::ConnectionPool {
                source: anyhow::Error::from(source),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_rows_map_to_not_found() {
        for error in [
            RepoError::not_found("client", "c1"),
            RepoError::not_found_or_deleted("branch", "b1"),
            RepoError::TenantNotFound { id: Uuid::nil() },
        ] {
            assert!(matches!(AppError::from(error), AppError::NotFound { .. }));
        }
    }

    #[test]
    fn empty_update_maps_to_validation() {
        assert!(matches!(
            AppError::from(RepoError::NoFieldsToUpdate),
            AppError::Validation { .. }
        ));
    }

    #[test]
    fn existing_balance_maps_to_duplicate() {
        let error = RepoError::AlreadyExists {
            entity: "balance",
            id: "t1".into(),
        };
        assert!(matches!(AppError::from(error), AppError::Duplicate { .. }));
    }

    #[test]
    fn store_failures_keep_operation_name() {
        let error = RepoError::db("list clients")(diesel::result::Error::BrokenTransactionManager);
        match AppError::from(error) {
            AppError::Database { operation, .. } => assert_eq!(operation, "list clients"),
            other => panic!("expected database error, got {other:?}"),
        }
    }
}
