//! Engine identifiers and the profile registry.
//!
//! Instead of one builder/cache/dialect subtype per engine, a single
//! generic [`QueryBuilder`](crate::qb::QueryBuilder) is parameterized by an
//! [`EngineProfile`] bundle looked up here. Profiles are process-wide
//! statics: the dialect is `const` data and the column cache is a shared
//! singleton initialized on first use.

use crate::cache::ColumnCache;
use crate::dialect::Dialect;
use crate::error::{SqlError, SqlResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// A database engine identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Engine {
    SqlServer,
    MySql,
    PostgreSql,
    Oracle,
    /// Recognized as an identifier, but no profile, converter, or catalog
    /// support is registered; every factory fails with `NotImplemented`.
    Sqlite,
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SqlServer => "SqlServer",
            Self::MySql => "MySql",
            Self::PostgreSql => "PostgreSql",
            Self::Oracle => "Oracle",
            Self::Sqlite => "Sqlite",
        };
        f.write_str(name)
    }
}

impl FromStr for Engine {
    type Err = SqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sqlserver" | "mssql" => Ok(Self::SqlServer),
            "mysql" => Ok(Self::MySql),
            "postgresql" | "postgres" | "pgsql" => Ok(Self::PostgreSql),
            "oracle" => Ok(Self::Oracle),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(SqlError::invalid_argument(format!(
                "Unknown engine identifier: '{other}'"
            ))),
        }
    }
}

/// The per-engine bundle a builder composes: lexical rules plus the shared
/// column cache.
#[derive(Debug)]
pub struct EngineProfile {
    engine: Engine,
    dialect: &'static Dialect,
    columns: ColumnCache,
}

impl EngineProfile {
    fn new(engine: Engine, dialect: &'static Dialect) -> Self {
        Self {
            engine,
            dialect,
            columns: ColumnCache::new(dialect),
        }
    }

    /// Fetch the process-wide profile for `engine`.
    ///
    /// Fails fast with [`SqlError::NotImplemented`] for engines without a
    /// registered profile.
    pub fn get(engine: Engine) -> SqlResult<&'static EngineProfile> {
        static SQL_SERVER: OnceLock<EngineProfile> = OnceLock::new();
        static MYSQL: OnceLock<EngineProfile> = OnceLock::new();
        static POSTGRESQL: OnceLock<EngineProfile> = OnceLock::new();
        static ORACLE: OnceLock<EngineProfile> = OnceLock::new();

        match engine {
            Engine::SqlServer => Ok(SQL_SERVER
                .get_or_init(|| EngineProfile::new(engine, &Dialect::SQL_SERVER))),
            Engine::MySql => Ok(MYSQL.get_or_init(|| EngineProfile::new(engine, &Dialect::MYSQL))),
            Engine::PostgreSql => Ok(POSTGRESQL
                .get_or_init(|| EngineProfile::new(engine, &Dialect::POSTGRESQL))),
            Engine::Oracle => {
                Ok(ORACLE.get_or_init(|| EngineProfile::new(engine, &Dialect::ORACLE)))
            }
            other => Err(SqlError::not_implemented(other.to_string())),
        }
    }

    /// The engine this profile belongs to.
    pub fn engine(&self) -> Engine {
        self.engine
    }

    /// The engine's lexical rules.
    pub fn dialect(&self) -> &'static Dialect {
        self.dialect
    }

    /// The engine's shared column cache.
    pub fn columns(&self) -> &ColumnCache {
        &self.columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_are_shared_singletons() {
        let a = EngineProfile::get(Engine::SqlServer).unwrap();
        let b = EngineProfile::get(Engine::SqlServer).unwrap();
        assert!(std::ptr::eq(a, b));
        assert_eq!(a.dialect().opening_identifier, "[");
    }

    #[test]
    fn sqlite_has_no_profile() {
        let err = EngineProfile::get(Engine::Sqlite).unwrap_err();
        assert!(err.is_not_implemented());
    }

    #[test]
    fn engine_parses_common_spellings() {
        assert_eq!("mssql".parse::<Engine>().unwrap(), Engine::SqlServer);
        assert_eq!("postgres".parse::<Engine>().unwrap(), Engine::PostgreSql);
        assert_eq!("MySQL".parse::<Engine>().unwrap(), Engine::MySql);
        assert!("db2".parse::<Engine>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for engine in [
            Engine::SqlServer,
            Engine::MySql,
            Engine::PostgreSql,
            Engine::Oracle,
            Engine::Sqlite,
        ] {
            assert_eq!(engine.to_string().parse::<Engine>().unwrap(), engine);
        }
    }
}
