//! Dialect-aware query builder.
//!
//! One generic [`QueryBuilder`] serves every registered engine: it is
//! parameterized by an [`EngineProfile`](crate::engine::EngineProfile)
//! bundle (dialect + shared column cache) and a per-statement
//! [`ParameterManager`](crate::param::ParameterManager) instead of one
//! builder subtype per engine.
//!
//! # Usage
//!
//! ```ignore
//! use sqlforge::{qb, Engine};
//!
//! let mut q = qb::builder(Engine::SqlServer)?
//!     .select("u.id, u.name")
//!     .from("users u")
//!     .inner_join("orders o", "o.user_id = u.id")
//!     .where_eq("u.status", "active")
//!     .order_by("u.created_at Desc");
//!
//! let stmt = q.render_select();
//! executor.query(&stmt.sql, &stmt.params, &stmt.dynamic_params).await?;
//! ```

mod builder;
mod exists;

pub use builder::{QueryBuilder, Statement};
pub use exists::ExistsBuilder;

use crate::engine::Engine;
use crate::error::SqlResult;

/// Create a query builder for the given engine.
///
/// Fails with a not-implemented error for engines without a registered
/// profile.
pub fn builder(engine: Engine) -> SqlResult<QueryBuilder> {
    QueryBuilder::new_for(engine)
}
