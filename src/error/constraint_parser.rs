use regex::Regex;
use std::sync::LazyLock;

/// Structured view of a PostgreSQL constraint violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    /// Table the constraint belongs to
    pub entity: String,
    /// Offending column
    pub field: String,
    /// Offending value, when the server reported one
    pub value: Option<String>,
}

/// Utility for parsing PostgreSQL constraint violation messages.
///
/// Constraint names in this schema follow `{table}_{column}_{suffix}` where
/// the table name never contains an underscore, so the column is whatever
/// sits between the first segment and the suffix.
pub struct ConstraintParser;

static KEY_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Key \(([^)]+)\)=\(([^)]*)\)").expect("valid key/value regex"));
static COLUMN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"column "([^"]+)""#).expect("valid column regex"));
static RELATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:relation|table) "([^"]+)""#).expect("valid relation regex")
});

const SUFFIXES: &[&str] = &["_fkey", "_pkey", "_key", "_check", "_idx", "_not_null"];

impl ConstraintParser {
    /// Splits a constraint name such as `accounts_phone_number_key` into
    /// `("accounts", "phone_number")`.
    pub fn split_constraint_name(constraint: &str) -> Option<(String, String)> {
        let stem = SUFFIXES
            .iter()
            .find_map(|suffix| constraint.strip_suffix(suffix))
            .unwrap_or(constraint);
        let (table, column) = stem.split_once('_')?;
        if table.is_empty() || column.is_empty() {
            return None;
        }
        Some((table.to_string(), column.to_string()))
    }

    /// Extracts `(column, value)` from a `Key (column)=(value)` fragment.
    pub fn key_value(text: &str) -> Option<(String, String)> {
        KEY_VALUE.captures(text).and_then(|caps| {
            let field = caps.get(1)?.as_str().to_string();
            let value = caps.get(2)?.as_str().to_string();
            Some((field, value))
        })
    }

    pub fn column(text: &str) -> Option<String> {
        COLUMN
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    pub fn relation(text: &str) -> Option<String> {
        RELATION
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Builds a [`ConstraintViolation`] from the pieces a driver error exposes.
    ///
    /// PostgreSQL puts the `Key (..)=(..)` fragment in the DETAIL line, which
    /// some drivers fold into the message, so both are searched.
    pub fn parse(
        message: &str,
        details: Option<&str>,
        constraint: Option<&str>,
    ) -> Option<ConstraintViolation> {
        let key_value = details
            .and_then(Self::key_value)
            .or_else(|| Self::key_value(message));
        let from_name = constraint.and_then(Self::split_constraint_name);

        let entity = from_name
            .as_ref()
            .map(|(table, _)| table.clone())
            .or_else(|| Self::relation(message))?;

        let field = key_value
            .as_ref()
            .map(|(field, _)| field.clone())
            .or_else(|| Self::column(message))
            .or_else(|| from_name.map(|(_, column)| column))?;

        Some(ConstraintViolation {
            entity,
            field,
            value: key_value.map(|(_, value)| value),
        })
    }
}
