//! The boundary to the external statement executor.
//!
//! The builder's sole output is a rendered statement plus its parameters;
//! it never opens a connection. Whoever owns the actual driver implements
//! [`Executor`] and maps [`SqlValue`]s to and from driver types.

use crate::error::{SqlError, SqlResult};
use crate::param::{ParamBag, SqlParam};
use crate::value::SqlValue;

/// One result row: parallel column-name and value vectors.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<SqlValue>,
}

impl Row {
    /// Build a row from `(column, value)` pairs.
    pub fn new(pairs: Vec<(impl Into<String>, SqlValue)>) -> Self {
        let mut columns = Vec::with_capacity(pairs.len());
        let mut values = Vec::with_capacity(pairs.len());
        for (name, value) in pairs {
            columns.push(name.into());
            values.push(value);
        }
        Self { columns, values }
    }

    /// Column names, in result order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Look up a value by column name.
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.values.get(idx)
    }

    /// Look up a value by position.
    pub fn get_at(&self, index: usize) -> Option<&SqlValue> {
        self.values.get(index)
    }

    /// Get a required column value, failing with a decode error if absent.
    pub fn require(&self, column: &str) -> SqlResult<&SqlValue> {
        self.get(column)
            .ok_or_else(|| SqlError::decode(column, "column missing from row"))
    }

    /// Get a text column.
    pub fn try_text(&self, column: &str) -> SqlResult<String> {
        match self.require(column)? {
            SqlValue::Text(s) => Ok(s.clone()),
            other => Err(SqlError::decode(column, format!("expected text, got {other:?}"))),
        }
    }

    /// Get a text column that may be null.
    pub fn try_text_opt(&self, column: &str) -> SqlResult<Option<String>> {
        match self.get(column) {
            None | Some(SqlValue::Null) => Ok(None),
            Some(SqlValue::Text(s)) => Ok(Some(s.clone())),
            Some(other) => Err(SqlError::decode(column, format!("expected text, got {other:?}"))),
        }
    }

    /// Get an integer column.
    pub fn try_int(&self, column: &str) -> SqlResult<i64> {
        match self.require(column)? {
            SqlValue::Int(i) => Ok(*i),
            other => Err(SqlError::decode(column, format!("expected int, got {other:?}"))),
        }
    }

    /// Get an integer column that may be null.
    pub fn try_int_opt(&self, column: &str) -> SqlResult<Option<i64>> {
        match self.get(column) {
            None | Some(SqlValue::Null) => Ok(None),
            Some(SqlValue::Int(i)) => Ok(Some(*i)),
            Some(other) => Err(SqlError::decode(column, format!("expected int, got {other:?}"))),
        }
    }

    /// Read a column as a catalog flag (bool / 0-1 / yes-no), null as `false`.
    pub fn flag(&self, column: &str) -> bool {
        self.get(column).map(SqlValue::as_flag).unwrap_or(false)
    }

    /// Read a column as a catalog flag, preserving null as `None`.
    pub fn flag_opt(&self, column: &str) -> Option<bool> {
        match self.get(column) {
            None | Some(SqlValue::Null) => None,
            Some(v) => Some(v.as_flag()),
        }
    }

    /// Read a column as a catalog id string (integer or text).
    pub fn id(&self, column: &str) -> Option<String> {
        self.get(column).and_then(SqlValue::as_id)
    }
}

/// Executes rendered statements against a live server.
///
/// External collaborator: implementations own connections, transactions,
/// and driver value mapping. All methods take the rendered SQL text, the
/// named parameter snapshot, and the opaque dynamic bags exactly as the
/// builder produced them; the text must be executable without rewriting.
pub trait Executor: Send + Sync {
    /// Execute a query and return all rows.
    fn query(
        &self,
        sql: &str,
        params: &[SqlParam],
        dynamic: &[ParamBag],
    ) -> impl std::future::Future<Output = SqlResult<Vec<Row>>> + Send;

    /// Execute a query and return the first row, if any.
    fn query_opt(
        &self,
        sql: &str,
        params: &[SqlParam],
        dynamic: &[ParamBag],
    ) -> impl std::future::Future<Output = SqlResult<Option<Row>>> + Send {
        async move {
            let rows = self.query(sql, params, dynamic).await?;
            Ok(rows.into_iter().next())
        }
    }

    /// Execute a query and require at least one row.
    ///
    /// Semantics:
    /// - 0 rows: returns [`SqlError::NotFound`]
    /// - 1 or more rows: returns the first row
    fn query_one(
        &self,
        sql: &str,
        params: &[SqlParam],
        dynamic: &[ParamBag],
    ) -> impl std::future::Future<Output = SqlResult<Row>> + Send {
        async move {
            self.query_opt(sql, params, dynamic)
                .await?
                .ok_or_else(|| SqlError::not_found("Expected 1 row, got 0"))
        }
    }

    /// Execute a statement and return the affected-row count.
    fn execute(
        &self,
        sql: &str,
        params: &[SqlParam],
        dynamic: &[ParamBag],
    ) -> impl std::future::Future<Output = SqlResult<u64>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> Row {
        Row::new(vec![
            ("id", SqlValue::Int(7)),
            ("name", SqlValue::Text("users".into())),
            ("comment", SqlValue::Null),
            ("is_pk", SqlValue::Int(1)),
        ])
    }

    #[test]
    fn named_and_positional_access() {
        let r = row();
        assert_eq!(r.get("id"), Some(&SqlValue::Int(7)));
        assert_eq!(r.get_at(1), Some(&SqlValue::Text("users".into())));
        assert_eq!(r.get("missing"), None);
    }

    #[test]
    fn typed_getters_decode_or_fail() {
        let r = row();
        assert_eq!(r.try_int("id").unwrap(), 7);
        assert_eq!(r.try_text("name").unwrap(), "users");
        assert_eq!(r.try_text_opt("comment").unwrap(), None);

        let err = r.try_int("name").unwrap_err();
        assert!(matches!(err, SqlError::Decode { .. }));
        let err = r.try_text("absent").unwrap_err();
        assert!(matches!(err, SqlError::Decode { .. }));
    }

    #[test]
    fn flag_and_id_are_lenient() {
        let r = row();
        assert!(r.flag("is_pk"));
        assert!(!r.flag("comment"));
        assert_eq!(r.flag_opt("comment"), None);
        assert_eq!(r.id("id").as_deref(), Some("7"));
        assert_eq!(r.id("name").as_deref(), Some("users"));
        assert_eq!(r.id("comment"), None);
    }
}
