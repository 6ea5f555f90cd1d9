//! Engine-agnostic scalar values.

use serde::{Deserialize, Serialize};

/// A scalar value carried by a bound parameter or returned in a result row.
///
/// The builder never talks to a driver directly, so values are represented
/// in an engine-neutral form; the external executor maps them to and from
/// whatever its driver expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SqlValue {
    /// Null/missing value
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point number
    Float(f64),
    /// UTF-8 string
    Text(String),
    /// Raw bytes
    Bytes(Vec<u8>),
}

impl SqlValue {
    /// Returns `true` if the value is null.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the value as a boolean if it is one.
    #[inline]
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the value as an integer if it is one.
    #[inline]
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a float if it is one.
    #[inline]
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the value as a string slice if it is one.
    #[inline]
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Render the value as a catalog identifier key.
    ///
    /// System catalogs expose object ids as integers (SQL Server `object_id`,
    /// Postgres `oid`) or as names (MySQL, Oracle). Both forms key the same
    /// reduction, so either renders to a string; other variants yield `None`.
    #[must_use]
    pub fn as_id(&self) -> Option<String> {
        match self {
            Self::Int(i) => Some(i.to_string()),
            Self::Text(s) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }

    /// Interpret the value as a catalog flag.
    ///
    /// Catalogs disagree on how to say "yes": booleans, 0/1 integers, or
    /// `'YES'`/`'NO'` text. Null reads as `false`.
    #[must_use]
    pub fn as_flag(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
            Self::Text(s) => {
                matches!(s.to_ascii_lowercase().as_str(), "1" | "yes" | "true" | "y")
            }
            _ => false,
        }
    }
}

impl From<bool> for SqlValue {
    #[inline]
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for SqlValue {
    #[inline]
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<i64> for SqlValue {
    #[inline]
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for SqlValue {
    #[inline]
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for SqlValue {
    #[inline]
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for SqlValue {
    #[inline]
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<u8>> for SqlValue {
    #[inline]
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    #[inline]
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_match_variant() {
        assert_eq!(SqlValue::from(42i64).as_int(), Some(42));
        assert_eq!(SqlValue::from("x").as_text(), Some("x"));
        assert_eq!(SqlValue::from(true).as_bool(), Some(true));
        assert!(SqlValue::Null.is_null());
        assert_eq!(SqlValue::from(1.5f64).as_int(), None);
    }

    #[test]
    fn id_renders_ints_and_text() {
        assert_eq!(SqlValue::Int(245575913).as_id().as_deref(), Some("245575913"));
        assert_eq!(SqlValue::from("users").as_id().as_deref(), Some("users"));
        assert_eq!(SqlValue::Null.as_id(), None);
        assert_eq!(SqlValue::from("").as_id(), None);
    }

    #[test]
    fn flag_accepts_catalog_spellings() {
        assert!(SqlValue::Bool(true).as_flag());
        assert!(SqlValue::Int(1).as_flag());
        assert!(SqlValue::from("YES").as_flag());
        assert!(!SqlValue::from("NO").as_flag());
        assert!(!SqlValue::Int(0).as_flag());
        assert!(!SqlValue::Null.as_flag());
    }

    #[test]
    fn option_maps_none_to_null() {
        let v: SqlValue = Option::<i64>::None.into();
        assert!(v.is_null());
        let v: SqlValue = Some("a").into();
        assert_eq!(v.as_text(), Some("a"));
    }
}
