//! # sqlforge
//!
//! A cross-dialect SQL construction engine.
//!
//! ## Features
//!
//! - **Dialect-correct text**: identifier quoting and parameter prefixes per
//!   engine (SQL Server, MySQL, PostgreSQL, Oracle)
//! - **Safe parameterization**: named/typed parameters plus opaque dynamic
//!   parameter bags, tracked per statement
//! - **Memoized quoting**: repeated column lists normalize once per engine
//! - **One generic builder**: engines are data (a dialect + cache profile
//!   from a registry), not subclasses
//! - **Executor-agnostic**: renders `(sql, params)` and stops; the driver
//!   layer is an external collaborator behind the [`Executor`] trait
//!
//! ## Query builder (qb)
//!
//! ```ignore
//! use sqlforge::{qb, Engine};
//!
//! let stmt = qb::builder(Engine::SqlServer)?
//!     .select("u.id, u.name")
//!     .from("users u")
//!     .where_eq("u.status", "active")
//!     .order_by("u.created_at Desc")
//!     .render_select();
//!
//! assert!(stmt.sql.starts_with("Select [u].[id], [u].[name]"));
//! ```

pub mod cache;
pub mod dialect;
pub mod engine;
pub mod error;
pub mod executor;
pub mod param;
pub mod qb;
pub mod types;
pub mod value;

pub use cache::{CacheStats, ColumnCache};
pub use dialect::Dialect;
pub use engine::{Engine, EngineProfile};
pub use error::{SqlError, SqlResult};
pub use executor::{Executor, Row};
pub use param::{ParamBag, ParamDirection, ParameterManager, SqlParam};
pub use qb::{ExistsBuilder, QueryBuilder, Statement};
pub use types::{DbType, TypeConverter};
pub use value::SqlValue;
