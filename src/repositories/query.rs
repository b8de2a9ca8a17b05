//! Parameterized statement builder.
//!
//! Repositories describe a statement as an ordered list of
//! `(column expression, bound value)` pairs. Column expressions are always
//! `&'static str` supplied by repository code; caller input only ever travels
//! as a bound value behind a `$n` placeholder.

use bigdecimal::BigDecimal;
use diesel::pg::Pg;
use diesel::query_builder::{BoxedSqlQuery, SqlQuery};
use diesel::sql_types::{BigInt, Numeric, Text, Uuid as SqlUuid};
use uuid::Uuid;

use crate::repositories::RepoError;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;
/// Newest first with a stable tiebreak.
pub const NEWEST_FIRST: &str = "created_at DESC, id DESC";

/// A value bound to a positional placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Uuid(Uuid),
    BigInt(i64),
    Numeric(BigDecimal),
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<Uuid> for SqlValue {
    fn from(value: Uuid) -> Self {
        SqlValue::Uuid(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::BigInt(value)
    }
}

impl From<BigDecimal> for SqlValue {
    fn from(value: BigDecimal) -> Self {
        SqlValue::Numeric(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Eq,
    Ne,
    ILike,
}

impl Op {
    fn as_sql(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Ne => "<>",
            Op::ILike => "ILIKE",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Predicate {
    column: &'static str,
    op: Op,
    value: SqlValue,
}

/// AND-ed list of predicates, rendered in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    predicates: Vec<Predicate>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Anchors the filter on the owning tenant.
    pub fn tenant(company_id: Uuid) -> Self {
        Self::new().eq("company_id", company_id)
    }

    pub fn eq(mut self, column: &'static str, value: impl Into<SqlValue>) -> Self {
        self.predicates.push(Predicate {
            column,
            op: Op::Eq,
            value: value.into(),
        });
        self
    }

    pub fn ne(mut self, column: &'static str, value: impl Into<SqlValue>) -> Self {
        self.predicates.push(Predicate {
            column,
            op: Op::Ne,
            value: value.into(),
        });
        self
    }

    /// Case-insensitive substring match on a mandatory value.
    pub fn contains(mut self, column: &'static str, value: &str) -> Self {
        self.predicates.push(Predicate {
            column,
            op: Op::ILike,
            value: SqlValue::Text(format!("%{}%", escape_like(value))),
        });
        self
    }

    /// Exact match, skipped when the value is absent or blank.
    pub fn eq_opt(self, column: &'static str, value: Option<&str>) -> Self {
        match non_blank(value) {
            Some(v) => self.eq(column, v),
            None => self,
        }
    }

    /// Case-insensitive substring match, skipped when absent or blank.
    pub fn contains_opt(self, column: &'static str, value: Option<&str>) -> Self {
        match non_blank(value) {
            Some(v) => self.contains(column, v),
            None => self,
        }
    }

    /// Restricts to rows whose `deleted_at` sentinel is still zero.
    pub fn live(self) -> Self {
        self.eq("deleted_at", 0i64)
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    fn render(&self, binds: &mut Binds) -> String {
        if self.predicates.is_empty() {
            return String::new();
        }
        let clauses: Vec<String> = self
            .predicates
            .iter()
            .map(|p| {
                let placeholder = binds.push(p.value.clone());
                format!("{} {} {}", p.column, p.op.as_sql(), placeholder)
            })
            .collect();
        format!(" WHERE {}", clauses.join(" AND "))
    }
}

/// Ordered `SET column = $n` pairs for a partial update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assignments {
    sets: Vec<(&'static str, SqlValue)>,
}

impl Assignments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, column: &'static str, value: impl Into<SqlValue>) -> Self {
        self.sets.push((column, value.into()));
        self
    }

    /// Adds the column only when a non-blank value was supplied.
    pub fn set_opt(self, column: &'static str, value: Option<&str>) -> Self {
        match non_blank(value) {
            Some(v) => self.set(column, v),
            None => self,
        }
    }

    pub fn set_opt_value<V: Into<SqlValue>>(self, column: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.set(column, v),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn columns(&self) -> Vec<&'static str> {
        self.sets.iter().map(|(column, _)| *column).collect()
    }
}

/// Normalized pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub limit: i64,
}

impl Page {
    /// Non-positive or missing values fall back to page 1 / limit 10.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE);
        let limit = limit
            .filter(|l| *l > 0)
            .map(|l| l.min(MAX_LIMIT))
            .unwrap_or(DEFAULT_LIMIT);
        Self { page, limit }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// A rendered statement: SQL text plus binds in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    sql: String,
    binds: Vec<SqlValue>,
}

impl Statement {
    /// `SELECT {columns} FROM {table} WHERE … ORDER BY {order} [LIMIT … OFFSET …]`
    pub fn select(
        table: &'static str,
        columns: &'static str,
        filter: &Filter,
        order: &'static str,
        page: Option<Page>,
    ) -> Self {
        let mut binds = Binds::default();
        let mut sql = format!("SELECT {columns} FROM {table}");
        sql.push_str(&filter.render(&mut binds));
        sql.push_str(&format!(" ORDER BY {order}"));
        if let Some(page) = page {
            let limit = binds.push(SqlValue::BigInt(page.limit));
            let offset = binds.push(SqlValue::BigInt(page.offset()));
            sql.push_str(&format!(" LIMIT {limit} OFFSET {offset}"));
        }
        Self::from_parts(sql, binds)
    }

    /// `SELECT COUNT(*) AS total FROM {table} WHERE …` with the same predicates
    /// as the page query but no limiter.
    pub fn count(table: &'static str, filter: &Filter) -> Self {
        let mut binds = Binds::default();
        let mut sql = format!("SELECT COUNT(*) AS total FROM {table}");
        sql.push_str(&filter.render(&mut binds));
        Self::from_parts(sql, binds)
    }

    /// Partial update. `updated_at` is always refreshed; an empty assignment
    /// list is rejected before any SQL is produced.
    pub fn update(
        table: &'static str,
        assignments: &Assignments,
        filter: &Filter,
        returning: &'static str,
    ) -> Result<Self, RepoError> {
        if assignments.is_empty() {
            return Err(RepoError::NoFieldsToUpdate);
        }
        let mut binds = Binds::default();
        let mut sets: Vec<String> = assignments
            .sets
            .iter()
            .map(|(column, value)| format!("{column} = {}", binds.push(value.clone())))
            .collect();
        sets.push("updated_at = NOW()".to_string());

        let mut sql = format!("UPDATE {table} SET {}", sets.join(", "));
        sql.push_str(&filter.render(&mut binds));
        sql.push_str(&format!(" RETURNING {returning}"));
        Ok(Self::from_parts(sql, binds))
    }

    /// Soft delete: stamps `deleted_at` with the supplied unix time.
    pub fn soft_delete(table: &'static str, filter: &Filter, deleted_at: i64) -> Self {
        let mut binds = Binds::default();
        let stamp = binds.push(SqlValue::BigInt(deleted_at));
        let mut sql = format!("UPDATE {table} SET deleted_at = {stamp}, updated_at = NOW()");
        sql.push_str(&filter.render(&mut binds));
        Self::from_parts(sql, binds)
    }

    fn from_parts(sql: String, binds: Binds) -> Self {
        Self {
            sql,
            binds: binds.values,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn binds(&self) -> &[SqlValue] {
        &self.binds
    }

    /// Converts into a diesel query with every value bound in order.
    pub fn into_query(self) -> BoxedSqlQuery<'static, Pg, SqlQuery> {
        let mut query = diesel::sql_query(self.sql).into_boxed::<Pg>();
        for value in self.binds {
            query = match value {
                SqlValue::Text(v) => query.bind::<Text, _>(v),
                SqlValue::Uuid(v) => query.bind::<SqlUuid, _>(v),
                SqlValue::BigInt(v) => query.bind::<BigInt, _>(v),
                SqlValue::Numeric(v) => query.bind::<Numeric, _>(v),
            };
        }
        query
    }
}

#[derive(Default)]
struct Binds {
    values: Vec<SqlValue>,
}

impl Binds {
    fn push(&mut self, value: SqlValue) -> String {
        self.values.push(value);
        format!("${}", self.values.len())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Escapes LIKE metacharacters so user input matches literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tenant() -> Uuid {
        Uuid::parse_str("11111111-1111-1111-1111-111111111111").unwrap()
    }

    #[test]
    fn select_anchors_on_tenant_and_numbers_placeholders() {
        let filter = Filter::tenant(tenant())
            .contains_opt("full_name", Some("ali"))
            .eq_opt("phone", Some("+998"));
        let stmt = Statement::select(
            "clients",
            "id",
            &filter,
            NEWEST_FIRST,
            Some(Page::new(Some(2), Some(5))),
        );

        assert_eq!(
            stmt.sql(),
            "SELECT id FROM clients WHERE company_id = $1 AND full_name ILIKE $2 AND phone = $3 \
             ORDER BY created_at DESC, id DESC LIMIT $4 OFFSET $5"
        );
        assert_eq!(
            stmt.binds(),
            &[
                SqlValue::Uuid(tenant()),
                SqlValue::Text("%ali%".into()),
                SqlValue::Text("+998".into()),
                SqlValue::BigInt(5),
                SqlValue::BigInt(5),
            ]
        );
    }

    #[test]
    fn blank_optional_predicates_are_skipped() {
        let filter = Filter::tenant(tenant())
            .contains_opt("full_name", Some("   "))
            .eq_opt("type", None)
            .contains_opt("address", Some(""));
        assert_eq!(filter.len(), 1);
    }

    #[test]
    fn count_reuses_predicates_without_limiter() {
        let filter = Filter::tenant(tenant()).eq_opt("role", Some("admin"));
        let stmt = Statement::count("accounts", &filter);
        assert_eq!(
            stmt.sql(),
            "SELECT COUNT(*) AS total FROM accounts WHERE company_id = $1 AND role = $2"
        );
        assert_eq!(stmt.binds().len(), 2);
    }

    #[test]
    fn caller_text_never_reaches_sql() {
        let hostile = "x'; DROP TABLE accounts; --";
        let filter = Filter::tenant(tenant()).contains_opt("first_name", Some(hostile));
        let stmt = Statement::select("accounts", "id", &filter, NEWEST_FIRST, None);
        assert!(!stmt.sql().contains("DROP"));
        assert!(matches!(&stmt.binds()[1], SqlValue::Text(v) if v.contains("DROP TABLE")));
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        let filter = Filter::new().contains_opt("name", Some("50%_off\\"));
        let stmt = Statement::count("branches", &filter);
        assert_eq!(stmt.binds(), &[SqlValue::Text("%50\\%\\_off\\\\%".into())]);
    }

    #[test]
    fn update_sets_only_supplied_fields() {
        let assignments = Assignments::new()
            .set_opt("full_name", Some("Jo"))
            .set_opt("address", None)
            .set_opt("phone", Some(""))
            .set_opt("type", Some("vip"));
        let filter = Filter::new().eq("id", tenant()).eq("company_id", tenant());
        let stmt = Statement::update("clients", &assignments, &filter, "id").unwrap();

        assert_eq!(
            stmt.sql(),
            "UPDATE clients SET full_name = $1, type = $2, updated_at = NOW() \
             WHERE id = $3 AND company_id = $4 RETURNING id"
        );
        assert_eq!(assignments.columns(), vec!["full_name", "type"]);
    }

    #[test]
    fn update_without_fields_is_rejected() {
        let result = Statement::update(
            "branches",
            &Assignments::new().set_opt("name", Some("  ")),
            &Filter::tenant(tenant()),
            "id",
        );
        assert!(matches!(result, Err(RepoError::NoFieldsToUpdate)));
    }

    #[test]
    fn soft_delete_binds_timestamp_first() {
        let filter = Filter::new().eq("id", tenant()).eq("company_id", tenant()).live();
        let stmt = Statement::soft_delete("branches", &filter, 1_700_000_000);
        assert_eq!(
            stmt.sql(),
            "UPDATE branches SET deleted_at = $1, updated_at = NOW() \
             WHERE id = $2 AND company_id = $3 AND deleted_at = $4"
        );
        assert_eq!(stmt.binds()[0], SqlValue::BigInt(1_700_000_000));
        assert_eq!(stmt.binds()[3], SqlValue::BigInt(0));
    }

    #[test]
    fn ne_renders_inequality() {
        let filter = Filter::new().ne("deleted_at", 0i64);
        let stmt = Statement::select("balances", "company_id", &filter, "created_at DESC", None);
        assert_eq!(
            stmt.sql(),
            "SELECT company_id FROM balances WHERE deleted_at <> $1 ORDER BY created_at DESC"
        );
    }

    #[test]
    fn page_defaults() {
        assert_eq!(Page::new(None, None), Page { page: 1, limit: 10 });
        assert_eq!(Page::new(Some(0), Some(-3)), Page { page: 1, limit: 10 });
        assert_eq!(Page::new(Some(3), Some(500)).limit, MAX_LIMIT);
        assert_eq!(Page::new(Some(3), Some(20)).offset(), 40);
    }

    proptest! {
        #[test]
        fn non_positive_pagination_normalizes(page in i64::MIN..=0i64, limit in i64::MIN..=0i64) {
            let normalized = Page::new(Some(page), Some(limit));
            prop_assert_eq!(normalized, Page { page: 1, limit: 10 });
            prop_assert_eq!(normalized.offset(), 0);
        }

        #[test]
        fn positive_pagination_offsets(page in 1i64..10_000, limit in 1i64..=MAX_LIMIT) {
            let normalized = Page::new(Some(page), Some(limit));
            prop_assert_eq!(normalized.offset(), (page - 1) * limit);
        }
    }
}
