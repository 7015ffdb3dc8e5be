//! INSERT statement builder.

use super::{checked_value, owned_column, Statement};
use crate::builder::{Builder, Render};
use crate::error::{BuildError, Result};
use crate::expr::IntoColumn;
use crate::literal::Literal;
use crate::schema::{Column, TableRef};

/// An INSERT statement for one row.
#[derive(Debug, Clone)]
pub struct Insert {
    into: TableRef,
    columns: Vec<Result<Column>>,
    values: Vec<Literal>,
}

impl Insert {
    /// Creates `INSERT INTO into`.
    #[must_use]
    pub fn new(into: impl Into<TableRef>) -> Self {
        Self {
            into: into.into(),
            columns: vec![],
            values: vec![],
        }
    }

    /// Adds target columns. Without any, every column of the table is used
    /// in declaration order.
    #[must_use]
    pub fn columns<I>(mut self, columns: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoColumn,
    {
        self.columns
            .extend(columns.into_iter().map(IntoColumn::into_column));
        self
    }

    /// Adds values.
    #[must_use]
    pub fn values<I>(mut self, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Literal>,
    {
        self.values.extend(values.into_iter().map(Into::into));
        self
    }

    /// Adds one value.
    #[must_use]
    pub fn value(mut self, value: impl Into<Literal>) -> Self {
        self.values.push(value.into());
        self
    }

    /// Adds a column together with its value.
    #[must_use]
    pub fn set(mut self, column: impl IntoColumn, value: impl Into<Literal>) -> Self {
        self.columns.push(column.into_column());
        self.values.push(value.into());
        self
    }

    fn resolve(&self) -> Result<Vec<Column>> {
        let target = self.into.natural("INSERT")?;
        let columns = if self.columns.is_empty() {
            target.columns()
        } else {
            self.columns
                .iter()
                .map(|c| owned_column(target, c))
                .collect::<Result<Vec<_>>>()?
        };
        if columns.len() != self.values.len() {
            return Err(BuildError::ValueCountMismatch {
                expected: columns.len(),
                got: self.values.len(),
            });
        }
        for (column, value) in columns.iter().zip(&self.values) {
            checked_value(column, value)?;
        }
        Ok(columns)
    }
}

impl Render for Insert {
    fn render(&self, b: &mut Builder<'_>) {
        let columns = match self.resolve() {
            Ok(columns) => columns,
            Err(e) => return b.set_error(e),
        };

        b.append("INSERT INTO ");
        b.append_item(&self.into);
        b.append(" ( ");
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                b.append(", ");
            }
            b.append_identifier(column.name());
        }
        b.append(" ) VALUES ( ");
        b.append_items(&self.values, ", ");
        b.append(" )");
    }
}

impl Statement for Insert {}
