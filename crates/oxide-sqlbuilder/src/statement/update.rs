//! UPDATE statement builder.

use super::{checked_value, owned_column, render_tail, Order, OrderItem, Statement};
use crate::builder::{Builder, Render};
use crate::condition::Condition;
use crate::error::{BuildError, Result};
use crate::expr::{IntoColumn, IntoExpr};
use crate::literal::Literal;
use crate::schema::{Column, TableRef};

/// An UPDATE statement.
#[derive(Debug, Clone)]
pub struct Update {
    table: TableRef,
    sets: Vec<(Result<Column>, Literal)>,
    where_clause: Option<Condition>,
    order_by: Vec<OrderItem>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl Update {
    /// Creates `UPDATE table`.
    #[must_use]
    pub fn new(table: impl Into<TableRef>) -> Self {
        Self {
            table: table.into(),
            sets: vec![],
            where_clause: None,
            order_by: vec![],
            limit: None,
            offset: None,
        }
    }

    /// Adds `column = value` to the SET list.
    #[must_use]
    pub fn set(mut self, column: impl IntoColumn, value: impl Into<Literal>) -> Self {
        self.sets.push((column.into_column(), value.into()));
        self
    }

    /// Sets the WHERE clause.
    #[must_use]
    pub fn where_clause(mut self, cond: Condition) -> Self {
        self.where_clause = Some(cond);
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

    fn resolve(&self) -> Result<Vec<(Column, &Literal)>> {
        let target = self.table.natural("UPDATE")?;
        if self.sets.is_empty() {
            return Err(BuildError::MissingClause("UPDATE needs at least one SET"));
        }
        self.sets
            .iter()
            .map(|(column, value)| {
                let column = owned_column(target, column)?;
                checked_value(&column, value)?;
                Ok((column, value))
            })
            .collect()
    }
}

impl Render for Update {
    fn render(&self, b: &mut Builder<'_>) {
        let sets = match self.resolve() {
            Ok(sets) => sets,
            Err(e) => return b.set_error(e),
        };

        b.append("UPDATE ");
        b.append_item(&self.table);
        b.append(" SET ");
        for (i, (column, value)) in sets.iter().enumerate() {
            if i > 0 {
                b.append(", ");
            }
            b.append_identifier(column.name());
            b.append("=");
            b.append_item(*value);
        }

        if let Some(cond) = &self.where_clause {
            b.append(" WHERE ");
            b.append_item(cond);
        }

        render_tail(b, &self.order_by, self.limit, self.offset);
    }
}

impl Statement for Update {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{PostgresDialect, SqliteDialect};
    use crate::expr::ExprOps;
    use crate::schema::{int_column, Table};
    use crate::value::SqlValue;

    fn table() -> Table {
        Table::new(
            "TABLE_A",
            [
                int_column("id").primary_key(),
                int_column("test1"),
                int_column("test2"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_update_full() {
        let t = table();
        let (sql, args) = Update::new(&t)
            .where_clause(t.c("id").eq(1))
            .set(t.c("test1"), 10)
            .set(t.c("test2"), 20)
            .order_by(t.c("test1"), Order::Desc)
            .limit(1)
            .offset(2)
            .to_sql(&SqliteDialect)
            .unwrap();
        assert_eq!(
            sql,
            "UPDATE \"TABLE_A\" SET \"test1\"=?, \"test2\"=? WHERE \"TABLE_A\".\"id\"=? \
             ORDER BY \"TABLE_A\".\"test1\" DESC LIMIT ? OFFSET ?;"
        );
        assert_eq!(
            args,
            vec![
                SqlValue::Int(10),
                SqlValue::Int(20),
                SqlValue::Int(1),
                SqlValue::Int(1),
                SqlValue::Int(2)
            ]
        );
    }

    #[test]
    fn test_update_postgres() {
        let t = table();
        let (sql, _) = Update::new(&t)
            .set(t.c("test1"), 10)
            .where_clause(t.c("id").eq(1))
            .to_sql(&PostgresDialect)
            .unwrap();
        assert_eq!(
            sql,
            "UPDATE \"TABLE_A\" SET \"test1\"=$1 WHERE \"TABLE_A\".\"id\"=$2;"
        );
    }

    #[test]
    fn test_update_requires_set() {
        let t = table();
        let err = Update::new(&t)
            .where_clause(t.c("id").eq(1))
            .to_sql(&SqliteDialect)
            .unwrap_err();
        assert!(matches!(err, BuildError::MissingClause(_)));
    }

    #[test]
    fn test_update_type_check() {
        let t = table();
        let err = Update::new(&t)
            .set(t.c("test1"), "foo")
            .to_sql(&SqliteDialect)
            .unwrap_err();
        assert!(matches!(err, BuildError::IncompatibleType { .. }));
    }
}
