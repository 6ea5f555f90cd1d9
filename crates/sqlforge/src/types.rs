//! Generic type tags and the per-engine native-type converter.

use crate::engine::Engine;
use crate::error::{SqlError, SqlResult};
use serde::{Deserialize, Serialize};

/// Engine-agnostic representation of a column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DbType {
    AnsiString,
    AnsiStringFixedLength,
    String,
    StringFixedLength,
    Boolean,
    Byte,
    Int16,
    Int32,
    Int64,
    Single,
    Double,
    Decimal,
    Date,
    Time,
    DateTime,
    DateTimeOffset,
    Guid,
    Binary,
}

/// Maps native column type names to generic [`DbType`] tags, per engine.
///
/// Pure lookup, no side effects. Some native names are ambiguous and need
/// the length hint (MySQL `tinyint(1)` is a boolean, `char(36)` a GUID);
/// unmapped names yield `None` rather than an error.
#[derive(Debug, Clone, Copy)]
pub struct TypeConverter {
    engine: Engine,
}

impl TypeConverter {
    /// Create a converter for `engine`.
    ///
    /// Fails with [`SqlError::NotImplemented`] for engines without a
    /// registered mapping table.
    pub fn new(engine: Engine) -> SqlResult<Self> {
        match engine {
            Engine::SqlServer | Engine::MySql | Engine::PostgreSql | Engine::Oracle => {
                Ok(Self { engine })
            }
            other => Err(SqlError::not_implemented(other.to_string())),
        }
    }

    /// The engine this converter maps for.
    pub fn engine(&self) -> Engine {
        self.engine
    }

    /// Convert a native type name (plus optional length hint) to a tag.
    ///
    /// Accepts names with an inline length suffix (`tinyint(1)`); an inline
    /// length is used only when no explicit `length` is given.
    pub fn to_type(&self, native: &str, length: Option<i64>) -> Option<DbType> {
        let trimmed = native.trim().to_ascii_lowercase();
        let (name, inline_len) = split_inline_length(&trimmed);
        let length = length.or(inline_len);

        match self.engine {
            Engine::SqlServer => sql_server_type(name),
            Engine::MySql => mysql_type(name, length),
            Engine::PostgreSql => postgresql_type(name),
            Engine::Oracle => oracle_type(name, length),
            _ => None,
        }
    }
}

/// Split `"tinyint(1)"` into `("tinyint", Some(1))`.
fn split_inline_length(native: &str) -> (&str, Option<i64>) {
    match native.split_once('(') {
        Some((name, rest)) => {
            let len = rest
                .trim_end_matches(')')
                .split(',')
                .next()
                .and_then(|n| n.trim().parse().ok());
            (name.trim_end(), len)
        }
        None => (native, None),
    }
}

fn sql_server_type(name: &str) -> Option<DbType> {
    let tag = match name {
        "bigint" => DbType::Int64,
        "int" => DbType::Int32,
        "smallint" => DbType::Int16,
        "tinyint" => DbType::Byte,
        "bit" => DbType::Boolean,
        "decimal" | "numeric" | "money" | "smallmoney" => DbType::Decimal,
        "float" => DbType::Double,
        "real" => DbType::Single,
        "date" => DbType::Date,
        "datetime" | "datetime2" | "smalldatetime" => DbType::DateTime,
        "datetimeoffset" => DbType::DateTimeOffset,
        "time" => DbType::Time,
        "char" => DbType::AnsiStringFixedLength,
        "varchar" | "text" => DbType::AnsiString,
        "nchar" => DbType::StringFixedLength,
        "nvarchar" | "ntext" | "xml" | "sysname" => DbType::String,
        "uniqueidentifier" => DbType::Guid,
        "binary" | "varbinary" | "image" | "timestamp" | "rowversion" => DbType::Binary,
        _ => return None,
    };
    Some(tag)
}

fn mysql_type(name: &str, length: Option<i64>) -> Option<DbType> {
    let tag = match name {
        "bigint" => DbType::Int64,
        "int" | "integer" | "mediumint" => DbType::Int32,
        "smallint" => DbType::Int16,
        // tinyint(1) is MySQL's boolean spelling
        "tinyint" if length == Some(1) => DbType::Boolean,
        "tinyint" => DbType::Byte,
        "bit" | "bool" | "boolean" => DbType::Boolean,
        "decimal" | "numeric" => DbType::Decimal,
        "double" => DbType::Double,
        "float" => DbType::Single,
        "date" => DbType::Date,
        "datetime" | "timestamp" => DbType::DateTime,
        "time" => DbType::Time,
        "year" => DbType::Int16,
        // char(36) is the conventional GUID column width
        "char" if length == Some(36) => DbType::Guid,
        "char" => DbType::StringFixedLength,
        "varchar" | "text" | "tinytext" | "mediumtext" | "longtext" | "enum" | "set" | "json" => {
            DbType::String
        }
        "binary" | "varbinary" | "blob" | "tinyblob" | "mediumblob" | "longblob" => DbType::Binary,
        _ => return None,
    };
    Some(tag)
}

fn postgresql_type(name: &str) -> Option<DbType> {
    let tag = match name {
        "int8" | "bigint" | "bigserial" | "serial8" => DbType::Int64,
        "int4" | "int" | "integer" | "serial" | "serial4" | "oid" => DbType::Int32,
        "int2" | "smallint" | "smallserial" | "serial2" => DbType::Int16,
        "bool" | "boolean" => DbType::Boolean,
        "numeric" | "decimal" | "money" => DbType::Decimal,
        "float8" | "double precision" => DbType::Double,
        "float4" | "real" => DbType::Single,
        "date" => DbType::Date,
        "timestamp" | "timestamp without time zone" => DbType::DateTime,
        "timestamptz" | "timestamp with time zone" => DbType::DateTimeOffset,
        "time" | "time without time zone" | "timetz" | "time with time zone" => DbType::Time,
        "bpchar" | "char" | "character" => DbType::StringFixedLength,
        "varchar" | "character varying" | "text" | "name" | "json" | "jsonb" => DbType::String,
        "uuid" => DbType::Guid,
        "bytea" => DbType::Binary,
        _ => return None,
    };
    Some(tag)
}

fn oracle_type(name: &str, length: Option<i64>) -> Option<DbType> {
    let tag = match name {
        "number" | "decimal" | "numeric" => DbType::Decimal,
        "integer" | "int" => DbType::Int64,
        "smallint" => DbType::Int16,
        "binary_float" => DbType::Single,
        "binary_double" | "float" => DbType::Double,
        // Oracle DATE carries a time component
        "date" => DbType::DateTime,
        "timestamp" => DbType::DateTime,
        "timestamp with time zone" | "timestamp with local time zone" => DbType::DateTimeOffset,
        "char" | "nchar" => DbType::StringFixedLength,
        "varchar2" | "nvarchar2" | "varchar" => DbType::String,
        "clob" | "nclob" | "long" => DbType::String,
        // raw(16) is the conventional GUID column width
        "raw" if length == Some(16) => DbType::Guid,
        "raw" | "blob" | "long raw" | "bfile" => DbType::Binary,
        _ => return None,
    };
    Some(tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unregistered_engine_fails_at_factory() {
        let err = TypeConverter::new(Engine::Sqlite).unwrap_err();
        assert!(err.is_not_implemented());
    }

    #[test]
    fn sql_server_mappings() {
        let tc = TypeConverter::new(Engine::SqlServer).unwrap();
        assert_eq!(tc.to_type("int", None), Some(DbType::Int32));
        assert_eq!(tc.to_type("nvarchar", Some(255)), Some(DbType::String));
        assert_eq!(tc.to_type("varchar", None), Some(DbType::AnsiString));
        assert_eq!(tc.to_type("uniqueidentifier", None), Some(DbType::Guid));
        assert_eq!(tc.to_type("bit", None), Some(DbType::Boolean));
        assert_eq!(tc.to_type("geography", None), None);
    }

    #[test]
    fn mysql_length_disambiguates() {
        let tc = TypeConverter::new(Engine::MySql).unwrap();
        assert_eq!(tc.to_type("tinyint", Some(1)), Some(DbType::Boolean));
        assert_eq!(tc.to_type("tinyint", Some(4)), Some(DbType::Byte));
        assert_eq!(tc.to_type("char", Some(36)), Some(DbType::Guid));
        assert_eq!(tc.to_type("char", Some(10)), Some(DbType::StringFixedLength));
    }

    #[test]
    fn inline_length_suffix_is_honored() {
        let tc = TypeConverter::new(Engine::MySql).unwrap();
        assert_eq!(tc.to_type("tinyint(1)", None), Some(DbType::Boolean));
        assert_eq!(tc.to_type("decimal(10,2)", None), Some(DbType::Decimal));
        // An explicit length wins over the inline suffix.
        assert_eq!(tc.to_type("tinyint(1)", Some(4)), Some(DbType::Byte));
    }

    #[test]
    fn postgresql_mappings() {
        let tc = TypeConverter::new(Engine::PostgreSql).unwrap();
        assert_eq!(tc.to_type("int8", None), Some(DbType::Int64));
        assert_eq!(tc.to_type("character varying", None), Some(DbType::String));
        assert_eq!(tc.to_type("timestamptz", None), Some(DbType::DateTimeOffset));
        assert_eq!(tc.to_type("uuid", None), Some(DbType::Guid));
    }

    #[test]
    fn oracle_mappings() {
        let tc = TypeConverter::new(Engine::Oracle).unwrap();
        assert_eq!(tc.to_type("number", None), Some(DbType::Decimal));
        assert_eq!(tc.to_type("varchar2", Some(100)), Some(DbType::String));
        assert_eq!(tc.to_type("raw", Some(16)), Some(DbType::Guid));
        assert_eq!(tc.to_type("raw", Some(64)), Some(DbType::Binary));
        assert_eq!(tc.to_type("date", None), Some(DbType::DateTime));
    }

    #[test]
    fn unmapped_names_yield_none() {
        let tc = TypeConverter::new(Engine::PostgreSql).unwrap();
        assert_eq!(tc.to_type("tsvector", None), None);
        assert_eq!(tc.to_type("", None), None);
    }
}
