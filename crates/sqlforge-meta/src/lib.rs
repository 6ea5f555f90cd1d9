//! # sqlforge-meta
//!
//! Schema introspection on top of [`sqlforge`]: builder-composed catalog
//! queries per engine, and a [`MetadataService`] that folds the flat
//! (table, column) result rows into a nested database → tables → columns
//! snapshot in one pass, without per-table re-querying.
//!
//! ```ignore
//! use sqlforge::Engine;
//! use sqlforge_meta::MetadataService;
//!
//! let service = MetadataService::new(Engine::PostgreSql, executor)?;
//! let info = service.database_info().await?;
//! for table in &info.tables {
//!     println!("{} ({} columns)", table.name, table.columns.len());
//! }
//! ```

pub mod catalog;
pub mod introspect;

pub use introspect::{ColumnInfo, DatabaseInfo, MetadataService, TableInfo};
