//! Schema snapshots and the flat-row reduction.

use crate::catalog;
use serde::{Deserialize, Serialize};
use sqlforge::{Engine, Executor, Row, SqlResult};
use std::collections::HashMap;

/// One column of an introspected table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub id: i64,
    pub name: String,
    pub comment: Option<String>,
    pub is_primary_key: bool,
    pub is_auto_increment: bool,
    pub is_nullable: Option<bool>,
    pub data_type: String,
    pub length: Option<i64>,
    pub precision: Option<i64>,
    pub scale: Option<i64>,
}

/// One introspected table and the columns it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableInfo {
    /// Catalog id: numeric object id rendered as text (SQL Server,
    /// PostgreSQL) or the table name (MySQL, Oracle).
    pub id: String,
    pub schema: Option<String>,
    pub name: String,
    pub comment: Option<String>,
    pub columns: Vec<ColumnInfo>,
}

/// A nested snapshot of one database: tables in first-seen catalog order,
/// each owning its columns.
///
/// Created fresh by every [`MetadataService::database_info`] call and owned
/// solely by the caller thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseInfo {
    pub id: String,
    pub name: String,
    pub tables: Vec<TableInfo>,
}

/// Introspects a live schema through the external executor.
#[derive(Debug)]
pub struct MetadataService<E> {
    engine: Engine,
    executor: E,
}

impl<E: Executor> MetadataService<E> {
    /// Create a service for `engine`.
    ///
    /// Fails synchronously with a not-implemented error for engines without
    /// catalog support.
    pub fn new(engine: Engine, executor: E) -> SqlResult<Self> {
        catalog::supported(engine)?;
        Ok(Self { engine, executor })
    }

    /// The engine this service introspects.
    pub fn engine(&self) -> Engine {
        self.engine
    }

    /// Produce a fresh snapshot of the current database.
    ///
    /// Issues exactly two queries (identity, then the joined catalog) and
    /// folds the catalog rows in a single forward pass; it never re-queries
    /// per table.
    pub async fn database_info(&self) -> SqlResult<DatabaseInfo> {
        let identity = catalog::identity_query(self.engine)?.render_select();
        tracing::debug!(engine = %self.engine, "introspecting database identity");
        let row = self
            .executor
            .query_one(&identity.sql, &identity.params, &identity.dynamic_params)
            .await?;
        let name = row.try_text("name")?;
        let id = row.id("id").unwrap_or_else(|| name.clone());

        let listing = catalog::catalog_query(self.engine)?.render_select();
        tracing::debug!(engine = %self.engine, "introspecting table catalog");
        let rows = self
            .executor
            .query(&listing.sql, &listing.params, &listing.dynamic_params)
            .await?;
        let tables = reduce_tables(rows)?;

        Ok(DatabaseInfo { id, name, tables })
    }
}

/// Fold flat (table, column) rows into tables, preserving first-seen order.
///
/// An explicit ordered fold: the `Vec` carries the order, the id → index
/// map is the membership set. Rows missing a table id or column name (the
/// unmatched side of an outer join) are skipped.
fn reduce_tables(rows: Vec<Row>) -> SqlResult<Vec<TableInfo>> {
    let mut tables: Vec<TableInfo> = Vec::new();
    let mut by_id: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let Some(table_id) = row.id("table_id") else {
            continue;
        };
        let Some(column_name) = row.try_text_opt("column_name")? else {
            continue;
        };

        let idx = match by_id.get(&table_id) {
            Some(&idx) => idx,
            None => {
                tables.push(TableInfo {
                    id: table_id.clone(),
                    schema: row.try_text_opt("table_schema")?,
                    name: row.try_text("table_name")?,
                    comment: row.try_text_opt("table_comment")?,
                    columns: Vec::new(),
                });
                by_id.insert(table_id, tables.len() - 1);
                tables.len() - 1
            }
        };

        tables[idx].columns.push(ColumnInfo {
            id: row.try_int_opt("column_id")?.unwrap_or(0),
            name: column_name,
            comment: row.try_text_opt("column_comment")?,
            is_primary_key: row.flag("is_primary_key"),
            is_auto_increment: row.flag("is_auto_increment"),
            is_nullable: row.flag_opt("is_nullable"),
            data_type: row.try_text("data_type")?,
            length: row.try_int_opt("length")?,
            precision: row.try_int_opt("precision")?,
            scale: row.try_int_opt("scale")?,
        });
    }

    Ok(tables)
}
