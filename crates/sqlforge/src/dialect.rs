//! Per-engine lexical rules.
//!
//! A [`Dialect`] carries the handful of lexical constants that differ between
//! database engines: the identifier quote pair, the bound-parameter prefix,
//! and the literals used when a statement must yield a boolean scalar.
//!
//! Dialects are plain data. There is one `const` instance per engine and it
//! is never mutated; every consumer shares the same `&'static Dialect`.

/// Lexical constants for one database engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    /// Character(s) opening a quoted identifier (`[`, `"`, `` ` ``).
    pub opening_identifier: &'static str,
    /// Character(s) closing a quoted identifier (`]`, `"`, `` ` ``).
    pub closing_identifier: &'static str,
    /// Token required before a bound-parameter name (`@`, `:`).
    pub parameter_prefix: &'static str,
    /// Boolean-true literal for scalar EXISTS projections.
    pub true_literal: &'static str,
    /// Boolean-false literal for scalar EXISTS projections.
    pub false_literal: &'static str,
}

impl Dialect {
    /// SQL Server: bracket-quoted identifiers, `@` parameters, no native
    /// boolean type (scalars are cast to `Bit`).
    pub const SQL_SERVER: Dialect = Dialect {
        opening_identifier: "[",
        closing_identifier: "]",
        parameter_prefix: "@",
        true_literal: "Cast(1 As Bit)",
        false_literal: "Cast(0 As Bit)",
    };

    /// MySQL: backtick-quoted identifiers, `@` parameters, native booleans.
    pub const MYSQL: Dialect = Dialect {
        opening_identifier: "`",
        closing_identifier: "`",
        parameter_prefix: "@",
        true_literal: "True",
        false_literal: "False",
    };

    /// PostgreSQL: double-quoted identifiers, `@` parameters, native booleans.
    pub const POSTGRESQL: Dialect = Dialect {
        opening_identifier: "\"",
        closing_identifier: "\"",
        parameter_prefix: "@",
        true_literal: "True",
        false_literal: "False",
    };

    /// Oracle: double-quoted identifiers, `:` parameters. Oracle has no
    /// boolean column type, so scalar projections fall back to `1`/`0`.
    pub const ORACLE: Dialect = Dialect {
        opening_identifier: "\"",
        closing_identifier: "\"",
        parameter_prefix: ":",
        true_literal: "1",
        false_literal: "0",
    };

    /// Wrap a single raw identifier in this dialect's quote pair.
    ///
    /// The input must be one bare segment; dotted paths and csv lists are
    /// handled by the column cache.
    pub fn quote(&self, ident: &str) -> String {
        let mut out = String::with_capacity(
            ident.len() + self.opening_identifier.len() + self.closing_identifier.len(),
        );
        out.push_str(self.opening_identifier);
        out.push_str(ident);
        out.push_str(self.closing_identifier);
        out
    }

    /// Prefix a bare parameter name with this dialect's parameter token.
    pub fn param_token(&self, name: &str) -> String {
        let mut out = String::with_capacity(name.len() + self.parameter_prefix.len());
        out.push_str(self.parameter_prefix);
        out.push_str(name);
        out
    }

    /// Check whether `s` is already wrapped in this dialect's quote pair.
    pub fn is_quoted(&self, s: &str) -> bool {
        s.len() >= self.opening_identifier.len() + self.closing_identifier.len()
            && s.starts_with(self.opening_identifier)
            && s.ends_with(self.closing_identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sql_server_lexical_constants() {
        assert_eq!(Dialect::SQL_SERVER.opening_identifier, "[");
        assert_eq!(Dialect::SQL_SERVER.closing_identifier, "]");
        assert_eq!(Dialect::SQL_SERVER.parameter_prefix, "@");
    }

    #[test]
    fn oracle_lexical_constants() {
        assert_eq!(Dialect::ORACLE.opening_identifier, "\"");
        assert_eq!(Dialect::ORACLE.closing_identifier, "\"");
        assert_eq!(Dialect::ORACLE.parameter_prefix, ":");
    }

    #[test]
    fn postgresql_lexical_constants() {
        assert_eq!(Dialect::POSTGRESQL.opening_identifier, "\"");
        assert_eq!(Dialect::POSTGRESQL.closing_identifier, "\"");
        assert_eq!(Dialect::POSTGRESQL.parameter_prefix, "@");
    }

    #[test]
    fn quote_wraps_once() {
        assert_eq!(Dialect::SQL_SERVER.quote("col"), "[col]");
        assert_eq!(Dialect::MYSQL.quote("col"), "`col`");
        assert_eq!(Dialect::ORACLE.quote("col"), "\"col\"");
    }

    #[test]
    fn param_token_uses_prefix() {
        assert_eq!(Dialect::SQL_SERVER.param_token("p0"), "@p0");
        assert_eq!(Dialect::ORACLE.param_token("p0"), ":p0");
    }

    #[test]
    fn is_quoted_detects_wrapped() {
        assert!(Dialect::SQL_SERVER.is_quoted("[col]"));
        assert!(!Dialect::SQL_SERVER.is_quoted("col"));
        assert!(!Dialect::POSTGRESQL.is_quoted("\""));
    }
}
