//! DELETE statement builder.

use super::Statement;
use crate::builder::{Builder, Render};
use crate::condition::Condition;
use crate::schema::TableRef;

/// A DELETE statement.
#[derive(Debug, Clone)]
pub struct Delete {
    from: TableRef,
    where_clause: Option<Condition>,
}

impl Delete {
    /// Creates `DELETE FROM from`.
    #[must_use]
    pub fn new(from: impl Into<TableRef>) -> Self {
        Self {
            from: from.into(),
            where_clause: None,
        }
    }

    /// Sets the WHERE clause.
    #[must_use]
    pub fn where_clause(mut self, cond: Condition) -> Self {
        self.where_clause = Some(cond);
        self
    }
}

impl Render for Delete {
    fn render(&self, b: &mut Builder<'_>) {
        if let Err(e) = self.from.natural("DELETE") {
            return b.set_error(e);
        }
        b.append("DELETE FROM ");
        b.append_item(&self.from);
        if let Some(cond) = &self.where_clause {
            b.append(" WHERE ");
            b.append_item(cond);
        }
    }
}

impl Statement for Delete {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::SqliteDialect;
    use crate::error::BuildError;
    use crate::expr::ExprOps;
    use crate::schema::{int_column, Table};
    use crate::value::SqlValue;

    #[test]
    fn test_delete() {
        let t = Table::new("TABLE_A", [int_column("id").primary_key()]).unwrap();
        let (sql, args) = Delete::new(&t)
            .where_clause(t.c("id").eq(1))
            .to_sql(&SqliteDialect)
            .unwrap();
        assert_eq!(sql, "DELETE FROM \"TABLE_A\" WHERE \"TABLE_A\".\"id\"=?;");
        assert_eq!(args, vec![SqlValue::Int(1)]);
    }

    #[test]
    fn test_delete_without_where() {
        let t = Table::new("TABLE_A", [int_column("id")]).unwrap();
        let (sql, _) = Delete::new(&t).to_sql(&SqliteDialect).unwrap();
        assert_eq!(sql, "DELETE FROM \"TABLE_A\";");
    }

    #[test]
    fn test_delete_from_join_rejected() {
        let a = Table::new("A", [int_column("id")]).unwrap();
        let b = Table::new("B", [int_column("a_id")]).unwrap();
        let joined = a.inner_join(&b, a.c("id").eq(b.c("a_id")));
        assert_eq!(
            Delete::new(joined).to_sql(&SqliteDialect).unwrap_err(),
            BuildError::JoinedTarget("DELETE")
        );
    }
}
