//! Boolean-scalar EXISTS wrapper.

use crate::error::{SqlError, SqlResult};
use crate::qb::QueryBuilder;

/// Wraps a select-shaped [`QueryBuilder`] into a single boolean-typed
/// scalar expression: a `Case When Exists (...)` projection whose true and
/// false arms use the dialect's boolean literals (`Cast(1 As Bit)` on SQL
/// Server, `True`/`False` where the engine has a native boolean).
///
/// The inner builder's select list is rewritten to the literal `1` before
/// embedding; its parameters stay registered on its own manager and travel
/// with the outer statement.
pub struct ExistsBuilder<'a> {
    inner: &'a QueryBuilder,
}

impl<'a> ExistsBuilder<'a> {
    /// Wrap `inner`, which must already carry a full Select body.
    pub fn new(inner: &'a QueryBuilder) -> Self {
        Self { inner }
    }

    /// Render the boolean scalar expression.
    ///
    /// Fails with [`SqlError::InvalidArgument`] if the wrapped builder has
    /// no From clause to test against.
    pub fn render(&self) -> SqlResult<String> {
        if !self.inner.has_from() {
            return Err(SqlError::invalid_argument(
                "Exists requires a builder with a From clause",
            ));
        }

        let body_builder = self.inner.clone().clear_select().select_raw("1");
        let mut body = String::new();
        body_builder.append_select_to(&mut body);

        let dialect = self.inner.dialect();
        Ok(format!(
            "Select Case\n  When Exists (\n{body}\n)\n  Then {}\n  Else {} \nEnd",
            dialect.true_literal, dialect.false_literal
        ))
    }
}

impl QueryBuilder {
    /// Shorthand for [`ExistsBuilder::render`] over this builder.
    pub fn exists(&self) -> SqlResult<String> {
        ExistsBuilder::new(self).render()
    }
}
