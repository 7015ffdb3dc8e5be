//! Expressions: columns, SQL functions, aliases and `*`.

use crate::builder::{Builder, Render};
use crate::condition::{BinaryOperator, Condition, Operand};
use crate::error::Result;
use crate::schema::{AliasColumn, Column};

/// Anything that can appear where a column can.
#[derive(Debug, Clone)]
pub enum Expr {
    /// A bound column.
    Column(Column),
    /// A SQL function call.
    Func(SqlFunc),
    /// An aliased expression.
    Alias(AliasColumn),
    /// `*`.
    Star,
}

impl Expr {
    /// Renders the expression as a SELECT list item: aliases become
    /// `<source> AS <alias>`.
    pub(crate) fn render_projection(&self, b: &mut Builder<'_>) {
        match self {
            Self::Alias(a) => a.render_projection(b),
            other => other.render(b),
        }
    }
}

impl Render for Expr {
    fn render(&self, b: &mut Builder<'_>) {
        match self {
            Self::Column(c) => c.render(b),
            Self::Func(f) => f.render(b),
            Self::Alias(a) => a.render(b),
            Self::Star => b.append("*"),
        }
    }
}

/// A SQL function call such as `count(*)`.
#[derive(Debug, Clone)]
pub struct SqlFunc {
    name: String,
    args: Vec<Result<Expr>>,
}

impl SqlFunc {
    /// Returns the function name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Render for SqlFunc {
    fn render(&self, b: &mut Builder<'_>) {
        b.append(&self.name);
        b.append("(");
        b.append_items(&self.args, ", ");
        b.append(")");
    }
}

/// Creates a SQL function call. The name is written as given.
///
/// ```
/// use oxide_sqlbuilder::{func, star};
///
/// let count = func("count", [star()]);
/// assert_eq!(count.name(), "count");
/// ```
#[must_use]
pub fn func<I>(name: impl Into<String>, args: I) -> SqlFunc
where
    I: IntoIterator,
    I::Item: IntoExpr,
{
    SqlFunc {
        name: name.into(),
        args: args.into_iter().map(IntoExpr::into_expr).collect(),
    }
}

/// The `*` expression.
#[must_use]
pub const fn star() -> Expr {
    Expr::Star
}

/// Conversion into an expression. Lookup failures are carried along.
pub trait IntoExpr {
    /// Converts into an expression.
    ///
    /// # Errors
    ///
    /// Returns the lookup error carried by the source.
    fn into_expr(self) -> Result<Expr>;
}

impl IntoExpr for Expr {
    fn into_expr(self) -> Result<Expr> {
        Ok(self)
    }
}

impl IntoExpr for Result<Expr> {
    fn into_expr(self) -> Result<Expr> {
        self
    }
}

impl IntoExpr for Column {
    fn into_expr(self) -> Result<Expr> {
        Ok(Expr::Column(self))
    }
}

impl IntoExpr for &Column {
    fn into_expr(self) -> Result<Expr> {
        Ok(Expr::Column(self.clone()))
    }
}

impl IntoExpr for Result<Column> {
    fn into_expr(self) -> Result<Expr> {
        self.map(Expr::Column)
    }
}

impl IntoExpr for SqlFunc {
    fn into_expr(self) -> Result<Expr> {
        Ok(Expr::Func(self))
    }
}

impl IntoExpr for AliasColumn {
    fn into_expr(self) -> Result<Expr> {
        Ok(Expr::Alias(self))
    }
}

/// Conversion into a bound column, for clauses that only take columns.
pub trait IntoColumn {
    /// Converts into a column.
    ///
    /// # Errors
    ///
    /// Returns the lookup error carried by the source.
    fn into_column(self) -> Result<Column>;
}

impl IntoColumn for Column {
    fn into_column(self) -> Result<Column> {
        Ok(self)
    }
}

impl IntoColumn for &Column {
    fn into_column(self) -> Result<Column> {
        Ok(self.clone())
    }
}

impl IntoColumn for Result<Column> {
    fn into_column(self) -> Result<Column> {
        self
    }
}

/// Comparison and aliasing operators for every expression.
///
/// ```
/// use oxide_sqlbuilder::{int_column, ExprOps, Table};
///
/// let t = Table::new("T", [int_column("id")]).unwrap();
/// let _cond = t.c("id").gt(10);
/// ```
pub trait ExprOps: IntoExpr + Sized {
    /// `self = right`, or `self IS NULL` when `right` is NULL.
    #[must_use]
    fn eq(self, right: impl Into<Operand>) -> Condition {
        Condition::binary(self.into_expr(), BinaryOperator::Eq, right.into())
    }

    /// `self <> right`, or `self IS NOT NULL` when `right` is NULL.
    #[must_use]
    fn not_eq(self, right: impl Into<Operand>) -> Condition {
        Condition::binary(self.into_expr(), BinaryOperator::NotEq, right.into())
    }

    /// `self > right`.
    #[must_use]
    fn gt(self, right: impl Into<Operand>) -> Condition {
        Condition::binary(self.into_expr(), BinaryOperator::Gt, right.into())
    }

    /// `self >= right`.
    #[must_use]
    fn gt_eq(self, right: impl Into<Operand>) -> Condition {
        Condition::binary(self.into_expr(), BinaryOperator::GtEq, right.into())
    }

    /// `self < right`.
    #[must_use]
    fn lt(self, right: impl Into<Operand>) -> Condition {
        Condition::binary(self.into_expr(), BinaryOperator::Lt, right.into())
    }

    /// `self <= right`.
    #[must_use]
    fn lt_eq(self, right: impl Into<Operand>) -> Condition {
        Condition::binary(self.into_expr(), BinaryOperator::LtEq, right.into())
    }

    /// `self LIKE pattern`.
    #[must_use]
    fn like(self, pattern: impl Into<Operand>) -> Condition {
        Condition::binary(self.into_expr(), BinaryOperator::Like, pattern.into())
    }

    /// `self BETWEEN low AND high`.
    #[must_use]
    fn between(self, low: impl Into<Operand>, high: impl Into<Operand>) -> Condition {
        Condition::Between {
            expr: self.into_expr(),
            low: low.into(),
            high: high.into(),
        }
    }

    /// `self IN ( v1, v2, ... )`.
    #[must_use]
    fn in_list<I>(self, values: I) -> Condition
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        Condition::In {
            expr: self.into_expr(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// `self IS NULL`.
    #[must_use]
    fn is_null(self) -> Condition {
        self.eq(crate::value::Null)
    }

    /// `self IS NOT NULL`.
    #[must_use]
    fn is_not_null(self) -> Condition {
        self.not_eq(crate::value::Null)
    }

    /// Renames the expression.
    #[must_use]
    fn alias(self, alias: impl Into<String>) -> AliasColumn {
        AliasColumn::new(self.into_expr(), alias)
    }
}

impl<T: IntoExpr> ExprOps for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::SqliteDialect;
    use crate::error::BuildError;
    use crate::schema::{int_column, Table};

    fn table() -> Table {
        Table::new("T", [int_column("id"), int_column("score")]).unwrap()
    }

    fn render(node: &impl Render) -> crate::error::Result<String> {
        let mut b = Builder::new(&SqliteDialect);
        b.append_item(node);
        b.finish().map(|(sql, _)| sql)
    }

    #[test]
    fn test_func_renders_arguments() {
        let t = table();
        assert_eq!(
            render(&func("count", [star()])).unwrap(),
            "count(*)"
        );
        assert_eq!(
            render(&func("max", [t.c("id"), t.c("score")])).unwrap(),
            "max(\"T\".\"id\", \"T\".\"score\")"
        );
    }

    #[test]
    fn test_func_carries_lookup_error() {
        let t = table();
        assert!(matches!(
            render(&func("sum", [t.c("missing")])),
            Err(BuildError::ColumnNotFound { .. })
        ));
    }

    #[test]
    fn test_alias_renders_alias_or_projection() {
        let t = table();
        let alias = t.c("score").alias("s");
        assert_eq!(render(&alias).unwrap(), "\"s\"");

        let expr = alias.into_expr().unwrap();
        let mut b = Builder::new(&SqliteDialect);
        expr.render_projection(&mut b);
        assert_eq!(b.query(), "\"T\".\"score\" AS \"s\"");
    }
}
