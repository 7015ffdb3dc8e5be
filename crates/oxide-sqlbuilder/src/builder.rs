//! The text/argument accumulator every node renders into.

use tracing::{debug, trace};

use crate::dialect::Dialect;
use crate::error::{BuildError, Result};
use crate::value::SqlValue;

/// A node that can write itself into a [`Builder`].
pub trait Render {
    /// Appends this node's SQL text and bound arguments.
    fn render(&self, b: &mut Builder<'_>);
}

impl<T: Render + ?Sized> Render for &T {
    fn render(&self, b: &mut Builder<'_>) {
        (**self).render(b);
    }
}

impl<T: Render> Render for Result<T> {
    fn render(&self, b: &mut Builder<'_>) {
        match self {
            Ok(node) => node.render(b),
            Err(e) => b.set_error(e.clone()),
        }
    }
}

/// Accumulates query text and bound arguments for one statement.
///
/// The first error recorded is sticky: every later append is ignored and
/// [`query`](Self::query) and [`args`](Self::args) report nothing.
pub struct Builder<'d> {
    dialect: &'d dyn Dialect,
    query: String,
    args: Vec<SqlValue>,
    err: Option<BuildError>,
}

impl<'d> Builder<'d> {
    /// Creates an empty builder rendering for `dialect`.
    #[must_use]
    pub const fn new(dialect: &'d dyn Dialect) -> Self {
        Self {
            dialect,
            query: String::new(),
            args: vec![],
            err: None,
        }
    }

    /// Returns the active dialect.
    #[must_use]
    pub const fn dialect(&self) -> &'d dyn Dialect {
        self.dialect
    }

    /// Appends raw SQL text.
    pub fn append(&mut self, text: &str) {
        if self.err.is_none() {
            self.query.push_str(text);
        }
    }

    /// Appends a placeholder and records `value` as its argument.
    pub fn append_value(&mut self, value: SqlValue) {
        if self.err.is_some() {
            return;
        }
        let placeholder = self.dialect.bind_var(self.args.len() + 1);
        self.query.push_str(&placeholder);
        self.args.push(value);
    }

    /// Appends a dialect-quoted identifier.
    pub fn append_identifier(&mut self, name: &str) {
        if self.err.is_none() {
            let quoted = self.dialect.quote_field(name);
            self.query.push_str(&quoted);
        }
    }

    /// Appends a dialect fragment, or records its error.
    pub fn append_result(&mut self, fragment: Result<String>) {
        match fragment {
            Ok(text) => self.append(&text),
            Err(e) => self.set_error(e),
        }
    }

    /// Renders one node.
    pub fn append_item<R: Render + ?Sized>(&mut self, item: &R) {
        if self.err.is_none() {
            item.render(self);
        }
    }

    /// Renders nodes joined by `separator`.
    pub fn append_items<R: Render>(&mut self, items: &[R], separator: &str) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.append(separator);
            }
            self.append_item(item);
        }
    }

    /// Records an error. Only the first one is kept.
    pub fn set_error(&mut self, err: BuildError) {
        if let Some(first) = &self.err {
            trace!(kept = %first, suppressed = %err, "suppressing later build error");
            return;
        }
        debug!(error = %err, dialect = self.dialect.name(), "statement build failed");
        self.err = Some(err);
    }

    /// Returns true once an error is recorded.
    #[must_use]
    pub const fn has_error(&self) -> bool {
        self.err.is_some()
    }

    /// Returns the query text, or an empty string when an error is recorded.
    #[must_use]
    pub fn query(&self) -> &str {
        if self.err.is_some() {
            ""
        } else {
            &self.query
        }
    }

    /// Returns the bound arguments, or nothing when an error is recorded.
    #[must_use]
    pub fn args(&self) -> &[SqlValue] {
        if self.err.is_some() {
            &[]
        } else {
            &self.args
        }
    }

    /// Returns the first recorded error.
    #[must_use]
    pub const fn err(&self) -> Option<&BuildError> {
        self.err.as_ref()
    }

    /// Consumes the builder into its text and arguments, or its error.
    ///
    /// # Errors
    ///
    /// Returns the first error recorded while rendering.
    pub fn finish(self) -> Result<(String, Vec<SqlValue>)> {
        self.err.map_or_else(|| Ok((self.query, self.args)), Err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{MysqlDialect, PostgresDialect, SqliteDialect};

    #[test]
    fn test_append_value_numbers_placeholders() {
        let mut b = Builder::new(&PostgresDialect);
        b.append("a = ");
        b.append_value(SqlValue::Int(1));
        b.append(" AND b = ");
        b.append_value(SqlValue::Int(2));
        assert_eq!(b.query(), "a = $1 AND b = $2");
        assert_eq!(b.args(), &[SqlValue::Int(1), SqlValue::Int(2)]);
    }

    #[test]
    fn test_append_identifier_uses_dialect_quote() {
        let mut b = Builder::new(&MysqlDialect);
        b.append_identifier("users");
        assert_eq!(b.query(), "`users`");
    }

    #[test]
    fn test_error_short_circuits() {
        let mut b = Builder::new(&SqliteDialect);
        b.append("SELECT ");
        b.append_value(SqlValue::Int(1));
        b.set_error(BuildError::HavingWithoutGroupBy);
        b.append(" FROM t");
        b.append_value(SqlValue::Int(2));
        b.set_error(BuildError::MissingClause("later"));

        assert_eq!(b.query(), "");
        assert!(b.args().is_empty());
        assert_eq!(b.err(), Some(&BuildError::HavingWithoutGroupBy));
        assert_eq!(b.finish(), Err(BuildError::HavingWithoutGroupBy));
    }

    #[test]
    fn test_render_result_sets_error() {
        let mut b = Builder::new(&SqliteDialect);
        let missing: Result<crate::Literal> = Err(BuildError::DuplicateColumn(String::from("id")));
        b.append_item(&missing);
        assert!(b.has_error());
        assert_eq!(b.err(), Some(&BuildError::DuplicateColumn(String::from("id"))));
    }

    #[test]
    fn test_builder_new_in_const_context() {
        const EMPTY: Builder<'static> = Builder::new(&PostgresDialect);
        let b = EMPTY;
        assert_eq!(b.dialect().name(), "postgresql");
        assert_eq!(b.finish(), Ok((String::new(), vec![])));
    }

    #[test]
    fn test_finish_returns_text_and_args() {
        let mut b = Builder::new(&SqliteDialect);
        b.append("x = ");
        b.append_value(SqlValue::Bool(true));
        assert_eq!(
            b.finish(),
            Ok((String::from("x = ?"), vec![SqlValue::Bool(true)]))
        );
    }
}
