//! SELECT statement builder.

use std::rc::Rc;

use super::{render_tail, Lock, OrderItem, Statement};
use crate::builder::{Builder, Render};
use crate::condition::Condition;
use crate::error::{BuildError, Result};
use crate::expr::{Expr, IntoExpr};
use crate::schema::{Subquery, TableRef};
use crate::statement::Order;

/// A SELECT statement.
///
/// ```
/// use oxide_sqlbuilder::{int_column, ExprOps, Select, SqliteDialect, Statement, Table};
///
/// let t = Table::new("T", [int_column("id"), int_column("n")]).unwrap();
/// let (sql, args) = Select::new(&t)
///     .columns([t.c("n")])
///     .where_clause(t.c("id").eq(1))
///     .to_sql(&SqliteDialect)
///     .unwrap();
/// assert_eq!(sql, r#"SELECT "T"."n" FROM "T" WHERE "T"."id"=?;"#);
/// assert_eq!(args.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Select {
    from: TableRef,
    columns: Vec<Result<Expr>>,
    distinct: bool,
    where_clause: Option<Condition>,
    group_by: Vec<Result<Expr>>,
    having: Option<Condition>,
    order_by: Vec<OrderItem>,
    limit: Option<u64>,
    offset: Option<u64>,
    lock: Option<Lock>,
}

impl Select {
    /// Creates `SELECT * FROM from`.
    #[must_use]
    pub fn new(from: impl Into<TableRef>) -> Self {
        Self {
            from: from.into(),
            columns: vec![],
            distinct: false,
            where_clause: None,
            group_by: vec![],
            having: None,
            order_by: vec![],
            limit: None,
            offset: None,
            lock: None,
        }
    }

    /// Adds result columns. Without any, the statement selects `*`.
    #[must_use]
    pub fn columns<I>(mut self, columns: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoExpr,
    {
        self.columns
            .extend(columns.into_iter().map(IntoExpr::into_expr));
        self
    }

    /// Adds one result column.
    #[must_use]
    pub fn column(mut self, column: impl IntoExpr) -> Self {
        self.columns.push(column.into_expr());
        self
    }

    /// Adds DISTINCT.
    #[must_use]
    pub const fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Sets the WHERE clause.
    #[must_use]
    pub fn where_clause(mut self, cond: Condition) -> Self {
        self.where_clause = Some(cond);
        self
    }

    /// Adds GROUP BY expressions.
    #[must_use]
    pub fn group_by<I>(mut self, exprs: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoExpr,
    {
        self.group_by
            .extend(exprs.into_iter().map(IntoExpr::into_expr));
        self
    }

    /// Sets the HAVING clause. Requires a GROUP BY.
    #[must_use]
    pub fn having(mut self, cond: Condition) -> Self {
        self.having = Some(cond);
        self
    }

    /// Adds an ORDER BY item.
    #[must_use]
    pub fn order_by(mut self, expr: impl IntoExpr, order: Order) -> Self {
        self.order_by.push(OrderItem::new(expr.into_expr(), order));
        self
    }

    /// Sets LIMIT.
    #[must_use]
    pub const fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets OFFSET.
    #[must_use]
    pub const fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Sets a row-lock clause.
    #[must_use]
    pub fn lock(mut self, lock: Lock) -> Self {
        self.lock = Some(lock);
        self
    }

    /// Wraps the statement as a FROM source named `alias`.
    ///
    /// An empty alias fails when the outer statement is rendered.
    ///
    /// ```
    /// use oxide_sqlbuilder::{int_column, ExprOps, Select, SqliteDialect, Statement, Table};
    ///
    /// let t = Table::new("T", [int_column("id"), int_column("n")]).unwrap();
    /// let s = Select::new(&t).columns([t.c("n")]).to_subquery("s");
    /// let (sql, _) = Select::new(&s)
    ///     .where_clause(s.c("n").gt(1))
    ///     .to_sql(&SqliteDialect)
    ///     .unwrap();
    /// assert_eq!(
    ///     sql,
    ///     r#"SELECT * FROM ( SELECT "T"."n" FROM "T" ) AS "s" WHERE "s"."n">?;"#
    /// );
    /// ```
    #[must_use]
    pub fn to_subquery(self, alias: impl Into<String>) -> TableRef {
        TableRef::Subquery(Rc::new(Subquery::new(self, alias.into())))
    }

    pub(crate) fn projection(&self) -> &[Result<Expr>] {
        &self.columns
    }

    pub(crate) const fn source(&self) -> &TableRef {
        &self.from
    }
}

impl Render for Select {
    fn render(&self, b: &mut Builder<'_>) {
        b.append("SELECT ");
        if self.distinct {
            b.append("DISTINCT ");
        }

        if self.columns.is_empty() {
            b.append("*");
        } else {
            for (i, column) in self.columns.iter().enumerate() {
                if i > 0 {
                    b.append(", ");
                }
                match column {
                    Ok(expr) => expr.render_projection(b),
                    Err(e) => b.set_error(e.clone()),
                }
            }
        }

        b.append(" FROM ");
        b.append_item(&self.from);

        if let Some(cond) = &self.where_clause {
            b.append(" WHERE ");
            b.append_item(cond);
        }

        if !self.group_by.is_empty() {
            b.append(" GROUP BY ");
            b.append_items(&self.group_by, ", ");
        }

        if let Some(cond) = &self.having {
            if self.group_by.is_empty() {
                b.set_error(BuildError::HavingWithoutGroupBy);
            }
            b.append(" HAVING ");
            b.append_item(cond);
        }

        render_tail(b, &self.order_by, self.limit, self.offset);

        if let Some(lock) = &self.lock {
            b.append(" ");
            b.append_item(lock);
        }
    }
}

impl Statement for Select {}
