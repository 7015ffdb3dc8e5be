//! Statement builders.
//!
//! Every statement is a plain aggregate of tables, columns and conditions.
//! Nothing is validated while it is being built; [`Statement::to_sql`] checks
//! everything and reports the first problem.

mod alter;
mod create;
mod delete;
mod drop;
mod insert;
mod lock;
mod select;
mod update;

pub use alter::AlterTable;
pub use create::{CreateIndex, CreateTable};
pub use delete::Delete;
pub use drop::DropTable;
pub use insert::Insert;
pub use lock::{Lock, LockStrength};
pub use select::Select;
pub use update::Update;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::builder::{Builder, Render};
use crate::dialect::Dialect;
use crate::error::{BuildError, Result};
use crate::expr::Expr;
use crate::literal::Literal;
use crate::schema::{Column, Table};
use crate::value::SqlValue;

/// A complete SQL statement.
pub trait Statement: Render {
    /// Renders the statement for `dialect`, terminator included.
    ///
    /// Rendering never mutates the statement, so calling this twice yields
    /// the same output.
    ///
    /// # Errors
    ///
    /// Returns the first error met while rendering. No partial text is ever
    /// returned.
    fn to_sql(&self, dialect: &dyn Dialect) -> Result<(String, Vec<SqlValue>)> {
        let mut b = Builder::new(dialect);
        b.append_item(self);
        b.append(dialect.query_suffix());
        let (sql, args) = b.finish()?;
        trace!(dialect = dialect.name(), sql = %sql, args = args.len(), "rendered statement");
        Ok((sql, args))
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl Order {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct OrderItem {
    expr: Result<Expr>,
    order: Order,
}

impl OrderItem {
    pub(crate) const fn new(expr: Result<Expr>, order: Order) -> Self {
        Self { expr, order }
    }
}

impl Render for OrderItem {
    fn render(&self, b: &mut Builder<'_>) {
        b.append_item(&self.expr);
        b.append(" ");
        b.append(self.order.as_sql());
    }
}

/// Writes ` ORDER BY ...`, ` LIMIT ?` and ` OFFSET ?` where set.
pub(crate) fn render_tail(
    b: &mut Builder<'_>,
    order_by: &[OrderItem],
    limit: Option<u64>,
    offset: Option<u64>,
) {
    if !order_by.is_empty() {
        b.append(" ORDER BY ");
        b.append_items(order_by, ", ");
    }
    if let Some(limit) = limit {
        b.append(" LIMIT ");
        append_count(b, limit);
    }
    if let Some(offset) = offset {
        b.append(" OFFSET ");
        append_count(b, offset);
    }
}

fn append_count(b: &mut Builder<'_>, n: u64) {
    match i64::try_from(n) {
        Ok(v) => b.append_value(SqlValue::Int(v)),
        Err(_) => b.set_error(BuildError::IntegerOutOfRange(n)),
    }
}

/// Resolves a column for a statement targeting `target`: the lookup must
/// have succeeded and the column must currently belong to the table.
pub(crate) fn owned_column(target: &Table, column: &Result<Column>) -> Result<Column> {
    let column = column.clone()?;
    if target.owns(&column) {
        Ok(column)
    } else {
        Err(BuildError::ForeignColumn {
            table: target.name(),
            column: column.name().to_string(),
        })
    }
}

/// Converts `value` and checks it against the column's declared type.
pub(crate) fn checked_value(column: &Column, value: &Literal) -> Result<()> {
    let converted = value.converted()?;
    column.config().check_value(&converted)
}
