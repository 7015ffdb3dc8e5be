//! CREATE TABLE and CREATE INDEX statement builders.

use super::{owned_column, Statement};
use crate::builder::{Builder, Render};
use crate::error::{BuildError, Result};
use crate::expr::IntoColumn;
use crate::schema::{Column, TableRef};

/// A CREATE TABLE statement built from a table's current schema.
#[derive(Debug, Clone)]
pub struct CreateTable {
    table: TableRef,
    if_not_exists: bool,
}

impl CreateTable {
    /// Creates `CREATE TABLE table`.
    #[must_use]
    pub fn new(table: impl Into<TableRef>) -> Self {
        Self {
            table: table.into(),
            if_not_exists: false,
        }
    }

    /// Adds IF NOT EXISTS.
    #[must_use]
    pub const fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }
}

impl Render for CreateTable {
    fn render(&self, b: &mut Builder<'_>) {
        let table = match self.table.natural("CREATE TABLE") {
            Ok(table) => table,
            Err(e) => return b.set_error(e),
        };
        let configs = table.configs();
        if configs.is_empty() {
            return b.set_error(BuildError::EmptyTable(table.name()));
        }

        b.append("CREATE TABLE ");
        if self.if_not_exists {
            b.append("IF NOT EXISTS ");
        }
        b.append_item(table);
        b.append(" ( ");
        for (i, config) in configs.iter().enumerate() {
            if i > 0 {
                b.append(", ");
            }
            config.render_definition(b);
        }
        match b.dialect().table_option_to_string(table.options()) {
            Ok(options) if options.is_empty() => {}
            Ok(options) => {
                b.append(", ");
                b.append(&options);
            }
            Err(e) => b.set_error(e),
        }
        b.append(" )");
    }
}

impl Statement for CreateTable {}

/// A CREATE INDEX statement.
#[derive(Debug, Clone)]
pub struct CreateIndex {
    table: TableRef,
    name: Option<String>,
    columns: Vec<Result<Column>>,
    unique: bool,
    if_not_exists: bool,
}

impl CreateIndex {
    /// Creates `CREATE INDEX ... ON table`.
    #[must_use]
    pub fn new(table: impl Into<TableRef>) -> Self {
        Self {
            table: table.into(),
            name: None,
            columns: vec![],
            unique: false,
            if_not_exists: false,
        }
    }

    /// Sets the index name. Required.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Adds indexed columns. At least one is required.
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

    /// Makes the index UNIQUE.
    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Adds IF NOT EXISTS.
    #[must_use]
    pub const fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }

    fn resolve(&self) -> Result<(&str, Vec<Column>)> {
        let table = self.table.natural("CREATE INDEX")?;
        let name = match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => return Err(BuildError::MissingClause("CREATE INDEX needs a name")),
        };
        if self.columns.is_empty() {
            return Err(BuildError::MissingClause(
                "CREATE INDEX needs at least one column",
            ));
        }
        let columns = self
            .columns
            .iter()
            .map(|c| owned_column(table, c))
            .collect::<Result<Vec<_>>>()?;
        Ok((name, columns))
    }
}

impl Render for CreateIndex {
    fn render(&self, b: &mut Builder<'_>) {
        let (name, columns) = match self.resolve() {
            Ok(resolved) => resolved,
            Err(e) => return b.set_error(e),
        };

        b.append("CREATE ");
        if self.unique {
            b.append("UNIQUE ");
        }
        b.append("INDEX ");
        if self.if_not_exists {
            b.append("IF NOT EXISTS ");
        }
        b.append_identifier(name);
        b.append(" ON ");
        b.append_item(&self.table);
        b.append(" ( ");
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                b.append(", ");
            }
            b.append_identifier(column.name());
        }
        b.append(" )");
    }
}

impl Statement for CreateIndex {}
