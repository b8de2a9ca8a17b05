use crate::error::{AppError, ConstraintParser};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// Converts diesel errors into [`AppError`] variants.
///
/// Constraint violations become caller-facing `Duplicate`/`Validation`
/// errors; anything else is kept as a `Database` error whose source is only
/// ever logged.
pub struct DatabaseErrorConverter;

impl DatabaseErrorConverter {
    pub fn convert_diesel_error(error: DieselError, operation: &str) -> AppError {
        match error {
            DieselError::DatabaseError(kind, info) => {
                match Self::convert_database_error(&kind, info.as_ref(), operation) {
                    Some(converted) => converted,
                    None => AppError::Database {
                        operation: operation.to_string(),
                        source: anyhow::Error::from(DieselError::DatabaseError(kind, info)),
                    },
                }
            }
            DieselError::NotFound => AppError::NotFound {
                entity: "resource".to_string(),
                field: "id".to_string(),
                value: "unknown".to_string(),
            },
            other => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::from(other),
            },
        }
    }

    fn convert_database_error(
        kind: &DatabaseErrorKind,
        info: &(dyn DatabaseErrorInformation + Send + Sync),
        operation: &str,
    ) -> Option<AppError> {
        let violation =
            ConstraintParser::parse(info.message(), info.details(), info.constraint_name());

        match kind {
            DatabaseErrorKind::UniqueViolation => {
                let violation = violation?;
                tracing::debug!(
                    operation,
                    entity = %violation.entity,
                    field = %violation.field,
                    "Unique constraint violated"
                );
                Some(AppError::Duplicate {
                    entity: violation.entity,
                    field: violation.field,
                    value: violation.value.unwrap_or_else(|| "duplicate value".to_string()),
                })
            }
            DatabaseErrorKind::ForeignKeyViolation => {
                let violation = violation?;
                Some(AppError::Validation {
                    reason: format!("references a missing {} row", violation.entity),
                    field: violation.field,
                })
            }
            DatabaseErrorKind::NotNullViolation => {
                let violation = violation?;
                Some(AppError::Validation {
                    reason: format!("is required for {}", violation.entity),
                    field: violation.field,
                })
            }
            DatabaseErrorKind::CheckViolation => {
                let violation = violation?;
                Some(AppError::Validation {
                    reason: format!("violates a check on {}", violation.entity),
                    field: violation.field,
                })
            }
            _ => None,
        }
    }
}
