//! The generic clause accumulator and its renderers.

use crate::engine::{Engine, EngineProfile};
use crate::error::{SqlError, SqlResult};
use crate::param::{ParamBag, ParameterManager, SqlParam};
use crate::value::SqlValue;
use std::sync::{Arc, Mutex};

/// A rendered statement: SQL text plus the parameter snapshot to hand to
/// the external executor.
#[derive(Debug, Clone)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<SqlParam>,
    pub dynamic_params: Vec<ParamBag>,
}

/// Fluent clause accumulator rendering dialect-correct SQL text.
///
/// Per-statement and not for concurrent mutation. [`QueryBuilder::clone`]
/// yields an isolated copy (template reuse); [`QueryBuilder::subquery`]
/// yields a blank builder sharing this one's parameter manager (correlated
/// subqueries referencing the outer statement's parameters).
#[derive(Debug)]
pub struct QueryBuilder {
    profile: &'static EngineProfile,
    params: Arc<Mutex<ParameterManager>>,
    select_cols: Vec<String>,
    from_items: Vec<String>,
    join_clauses: Vec<String>,
    where_clauses: Vec<String>,
    group_clauses: Vec<String>,
    having_clauses: Vec<String>,
    order_clauses: Vec<String>,
    set_clauses: Vec<String>,
    insert_cols: Vec<String>,
    insert_rows: Vec<String>,
}

impl QueryBuilder {
    /// Create a blank builder wired to `engine`'s profile and a fresh
    /// parameter manager.
    ///
    /// Fails with [`SqlError::NotImplemented`] for unprofiled engines.
    pub fn new_for(engine: Engine) -> SqlResult<Self> {
        let profile = EngineProfile::get(engine)?;
        Ok(Self {
            profile,
            params: Arc::new(Mutex::new(ParameterManager::new(profile.dialect()))),
            select_cols: Vec::new(),
            from_items: Vec::new(),
            join_clauses: Vec::new(),
            where_clauses: Vec::new(),
            group_clauses: Vec::new(),
            having_clauses: Vec::new(),
            order_clauses: Vec::new(),
            set_clauses: Vec::new(),
            insert_cols: Vec::new(),
            insert_rows: Vec::new(),
        })
    }

    /// The engine this builder renders for.
    pub fn engine(&self) -> Engine {
        self.profile.engine()
    }

    /// The lexical rules this builder renders with.
    pub fn dialect(&self) -> &'static crate::dialect::Dialect {
        self.profile.dialect()
    }

    /// Create a blank builder sharing this one's parameter manager.
    pub fn subquery(&self) -> Self {
        Self {
            profile: self.profile,
            params: Arc::clone(&self.params),
            select_cols: Vec::new(),
            from_items: Vec::new(),
            join_clauses: Vec::new(),
            where_clauses: Vec::new(),
            group_clauses: Vec::new(),
            having_clauses: Vec::new(),
            order_clauses: Vec::new(),
            set_clauses: Vec::new(),
            insert_cols: Vec::new(),
            insert_rows: Vec::new(),
        }
    }

    // ==================== SELECT ====================

    /// Append columns to the select list, quoted through the column cache.
    pub fn select(mut self, columns_csv: &str) -> Self {
        let safe = self.profile.columns().safe_columns(columns_csv);
        self.select_cols.push(safe);
        self
    }

    /// Append a select fragment verbatim (expressions, literals).
    pub fn select_raw(mut self, fragment: &str) -> Self {
        self.select_cols.push(fragment.to_string());
        self
    }

    /// Drop the accumulated select list.
    pub fn clear_select(mut self) -> Self {
        self.select_cols.clear();
        self
    }

    // ==================== FROM / JOIN ====================

    /// Add a From item, verbatim (`users`, `users u`, a subquery).
    pub fn from(mut self, table: &str) -> Self {
        self.from_items.push(table.to_string());
        self
    }

    /// Add an Inner Join.
    pub fn inner_join(mut self, table: &str, on: &str) -> Self {
        self.join_clauses.push(format!("Inner Join {table} On {on}"));
        self
    }

    /// Add a Left Join.
    pub fn left_join(mut self, table: &str, on: &str) -> Self {
        self.join_clauses.push(format!("Left Join {table} On {on}"));
        self
    }

    /// Add a Right Join.
    pub fn right_join(mut self, table: &str, on: &str) -> Self {
        self.join_clauses.push(format!("Right Join {table} On {on}"));
        self
    }

    /// And another condition onto the most recent join's On clause.
    ///
    /// Without a preceding join the condition still must constrain the
    /// statement, so it lands in the Where list instead.
    pub fn append_on(mut self, condition: &str) -> Self {
        match self.join_clauses.last_mut() {
            Some(join) => {
                join.push_str(" And ");
                join.push_str(condition);
            }
            None => {
                tracing::debug!(condition, "append_on without a join; kept as a Where filter");
                self.where_clauses.push(condition.to_string());
            }
        }
        self
    }

    // ==================== WHERE ====================

    /// Append a Where fragment; fragments are joined with ` And `.
    pub fn and_where(mut self, condition: &str) -> Self {
        self.where_clauses.push(condition.to_string());
        self
    }

    /// Append `column = <token>`, quoting the column and registering the
    /// value under a generated parameter name.
    pub fn where_eq(mut self, column: &str, value: impl Into<SqlValue>) -> Self {
        let safe = self.profile.columns().safe_column(column);
        let token = self.params.lock().unwrap().bind(value);
        self.where_clauses.push(format!("{safe} = {token}"));
        self
    }

    /// Append membership against a literal set: `column In (<tokens>)`.
    ///
    /// An empty set can match nothing, so it renders as `1 = 0`.
    pub fn in_values(mut self, column: &str, values: Vec<SqlValue>) -> Self {
        if values.is_empty() {
            self.where_clauses.push("1 = 0".to_string());
            return self;
        }
        let safe = self.profile.columns().safe_column(column);
        let tokens = {
            let mut pm = self.params.lock().unwrap();
            values
                .into_iter()
                .map(|v| pm.bind(v))
                .collect::<Vec<_>>()
                .join(", ")
        };
        self.where_clauses.push(format!("{safe} In ({tokens})"));
        self
    }

    /// Append membership against a nested builder: `column In (<subselect>)`.
    ///
    /// Create the inner builder with [`QueryBuilder::subquery`] when it must
    /// reference this statement's parameters.
    pub fn in_query(mut self, column: &str, inner: &QueryBuilder) -> Self {
        let safe = self.profile.columns().safe_column(column);
        let mut body = String::new();
        inner.append_select_to(&mut body);
        self.where_clauses.push(format!("{safe} In (\n{body}\n)"));
        self
    }

    // ==================== GROUP / HAVING / ORDER ====================

    /// Append Group By columns, quoted through the column cache.
    pub fn group_by(mut self, columns_csv: &str) -> Self {
        let safe = self.profile.columns().safe_columns(columns_csv);
        self.group_clauses.push(safe);
        self
    }

    /// Append a Having fragment, verbatim.
    pub fn having(mut self, condition: &str) -> Self {
        self.having_clauses.push(condition.to_string());
        self
    }

    /// Append an Order By fragment, verbatim (may carry `Asc`/`Desc`).
    pub fn order_by(mut self, clause: &str) -> Self {
        self.order_clauses.push(clause.to_string());
        self
    }

    // ==================== SET / INSERT ====================

    /// Append `column = <token>` to the assignment list, registering the
    /// value under a generated parameter name.
    pub fn set(mut self, column: &str, value: impl Into<SqlValue>) -> Self {
        let safe = self.profile.columns().safe_column(column);
        let token = self.params.lock().unwrap().bind(value);
        self.set_clauses.push(format!("{safe} = {token}"));
        self
    }

    /// Append an assignment fragment verbatim.
    pub fn set_raw(mut self, fragment: &str) -> Self {
        self.set_clauses.push(fragment.to_string());
        self
    }

    /// Append columns to the insert-column list, quoted through the cache.
    pub fn insert_columns(mut self, columns_csv: &str) -> Self {
        let safe = self.profile.columns().safe_columns(columns_csv);
        self.insert_cols.push(safe);
        self
    }

    /// Append one Values row; each value is registered under a generated
    /// parameter name.
    pub fn insert_row(mut self, values: Vec<SqlValue>) -> Self {
        let tokens = {
            let mut pm = self.params.lock().unwrap();
            values
                .into_iter()
                .map(|v| pm.bind(v))
                .collect::<Vec<_>>()
                .join(", ")
        };
        self.insert_rows.push(format!("({tokens})"));
        self
    }

    // ==================== Parameters ====================

    /// Register a fully described parameter on the shared manager.
    pub fn add_param(self, param: SqlParam) -> Self {
        self.params.lock().unwrap().add(param);
        self
    }

    /// Store an opaque dynamic parameter bag on the shared manager.
    pub fn add_dynamic(self, bag: ParamBag) -> Self {
        self.params.lock().unwrap().add_dynamic(bag);
        self
    }

    /// Register a value under a generated name and return its token.
    pub fn bind(&mut self, value: impl Into<SqlValue>) -> String {
        self.params.lock().unwrap().bind(value)
    }

    /// Run a closure against the shared parameter manager.
    pub fn with_params<R>(&self, f: impl FnOnce(&mut ParameterManager) -> R) -> R {
        f(&mut self.params.lock().unwrap())
    }

    /// Snapshot of the named parameters registered so far.
    pub fn param_snapshot(&self) -> Vec<SqlParam> {
        self.params.lock().unwrap().params().to_vec()
    }

    // ==================== Render ====================

    /// Whether any From item has been accumulated.
    pub fn has_from(&self) -> bool {
        !self.from_items.is_empty()
    }

    /// Render the select-shaped clauses into `buf` without finalizing
    /// parameters, for embedding as a subquery.
    ///
    /// Clause order is fixed: Select, From, Join, Where, Group By, Having,
    /// Order By; clauses are newline-separated.
    pub fn append_select_to(&self, buf: &mut String) {
        buf.push_str("Select ");
        if self.select_cols.is_empty() {
            buf.push('*');
        } else {
            buf.push_str(&self.select_cols.join(", "));
        }

        if !self.from_items.is_empty() {
            buf.push_str("\nFrom ");
            buf.push_str(&self.from_items.join(", "));
        }

        for join in &self.join_clauses {
            buf.push('\n');
            buf.push_str(join);
        }

        if !self.where_clauses.is_empty() {
            buf.push_str("\nWhere ");
            buf.push_str(&self.where_clauses.join(" And "));
        }

        if !self.group_clauses.is_empty() {
            buf.push_str("\nGroup By ");
            buf.push_str(&self.group_clauses.join(", "));
        }

        if !self.having_clauses.is_empty() {
            buf.push_str("\nHaving ");
            buf.push_str(&self.having_clauses.join(" And "));
        }

        if !self.order_clauses.is_empty() {
            buf.push_str("\nOrder By ");
            buf.push_str(&self.order_clauses.join(", "));
        }
    }

    /// Render the accumulated state as a Select statement.
    pub fn render_select(&self) -> Statement {
        let mut sql = String::new();
        self.append_select_to(&mut sql);
        self.finish(sql)
    }

    /// Render the accumulated state as an Update statement.
    ///
    /// Requires exactly one From item and a non-empty assignment list.
    pub fn render_update(&self) -> SqlResult<Statement> {
        let target = self.single_target("Update")?;
        if self.set_clauses.is_empty() {
            return Err(SqlError::validation("Update requires at least one Set assignment"));
        }

        let mut sql = String::new();
        sql.push_str("Update ");
        sql.push_str(target);
        sql.push_str("\nSet ");
        sql.push_str(&self.set_clauses.join(", "));
        if !self.where_clauses.is_empty() {
            sql.push_str("\nWhere ");
            sql.push_str(&self.where_clauses.join(" And "));
        }
        Ok(self.finish(sql))
    }

    /// Render the accumulated state as an Insert statement.
    ///
    /// Requires exactly one From item, an insert-column list, and at least
    /// one Values row.
    pub fn render_insert(&self) -> SqlResult<Statement> {
        let target = self.single_target("Insert")?;
        if self.insert_cols.is_empty() {
            return Err(SqlError::validation("Insert requires a column list"));
        }
        if self.insert_rows.is_empty() {
            return Err(SqlError::validation("Insert requires at least one Values row"));
        }

        let mut sql = String::new();
        sql.push_str("Insert Into ");
        sql.push_str(target);
        sql.push_str(" (");
        sql.push_str(&self.insert_cols.join(", "));
        sql.push_str(")\nValues ");
        sql.push_str(&self.insert_rows.join(", "));
        Ok(self.finish(sql))
    }

    fn single_target(&self, verb: &str) -> SqlResult<&str> {
        match self.from_items.as_slice() {
            [one] => Ok(one),
            [] => Err(SqlError::validation(format!("{verb} requires a target table"))),
            _ => Err(SqlError::validation(format!("{verb} takes exactly one target table"))),
        }
    }

    fn finish(&self, sql: String) -> Statement {
        let pm = self.params.lock().unwrap();
        tracing::debug!(engine = %self.engine(), params = pm.len(), sql = %sql, "rendered statement");
        Statement {
            sql,
            params: pm.params().to_vec(),
            dynamic_params: pm.dynamic_params().to_vec(),
        }
    }
}

impl Clone for QueryBuilder {
    /// Duplicate every clause list and deep-copy the parameter manager into
    /// a fresh handle, so the copy is fully isolated from the original.
    fn clone(&self) -> Self {
        let pm = self.params.lock().unwrap().clone();
        Self {
            profile: self.profile,
            params: Arc::new(Mutex::new(pm)),
            select_cols: self.select_cols.clone(),
            from_items: self.from_items.clone(),
            join_clauses: self.join_clauses.clone(),
            where_clauses: self.where_clauses.clone(),
            group_clauses: self.group_clauses.clone(),
            having_clauses: self.having_clauses.clone(),
            order_clauses: self.order_clauses.clone(),
            set_clauses: self.set_clauses.clone(),
            insert_cols: self.insert_cols.clone(),
            insert_rows: self.insert_rows.clone(),
        }
    }
}
