//! ALTER TABLE statement builder and its in-memory application.

use std::rc::Rc;

use tracing::debug;

use super::{owned_column, Statement};
use crate::builder::{Builder, Render};
use crate::error::{BuildError, Result};
use crate::expr::IntoColumn;
use crate::schema::{validate_columns, Column, ColumnConfig, Table, TableRef};

#[derive(Debug, Clone)]
enum Placement {
    End,
    First,
    After(Result<Column>),
}

impl Placement {
    fn render(&self, table: &Table, b: &mut Builder<'_>) {
        match self {
            Self::End => {}
            Self::First => b.append(" FIRST"),
            Self::After(column) => match owned_column(table, column) {
                Ok(column) => {
                    b.append(" AFTER ");
                    b.append_identifier(column.name());
                }
                Err(e) => b.set_error(e),
            },
        }
    }

    /// Insertion index in `columns` for this placement.
    fn index(&self, table: &Table, columns: &[Rc<ColumnConfig>]) -> Result<usize> {
        match self {
            Self::End => Ok(columns.len()),
            Self::First => Ok(0),
            Self::After(column) => index_of(table, columns, column).map(|i| i + 1),
        }
    }
}

#[derive(Debug, Clone)]
struct AddColumn {
    config: ColumnConfig,
    placement: Placement,
}

#[derive(Debug, Clone)]
struct ChangeColumn {
    old: Result<Column>,
    config: ColumnConfig,
    placement: Placement,
}

/// Position of `column` in `columns`, matched by identity.
fn index_of(table: &Table, columns: &[Rc<ColumnConfig>], column: &Result<Column>) -> Result<usize> {
    let column = column.clone()?;
    if !column.table().is_some_and(|owner| owner.is_same(table)) {
        return Err(BuildError::ForeignColumn {
            table: table.name(),
            column: column.name().to_string(),
        });
    }
    columns
        .iter()
        .position(|cfg| Rc::ptr_eq(cfg, column.config_rc()))
        .ok_or_else(|| BuildError::ColumnNotFound {
            table: table.name(),
            column: column.name().to_string(),
        })
}

/// An ALTER TABLE statement.
///
/// Clauses are rendered as adds, then changes, then drops, then the rename,
/// whatever order they were added in. Rendering does not touch the table;
/// call [`apply_to_table`](Self::apply_to_table) once the statement has been
/// executed to bring the in-memory schema in line.
#[derive(Debug, Clone)]
pub struct AlterTable {
    table: TableRef,
    rename_to: Option<String>,
    adds: Vec<AddColumn>,
    changes: Vec<ChangeColumn>,
    drops: Vec<Result<Column>>,
}

impl AlterTable {
    /// Creates `ALTER TABLE table`.
    #[must_use]
    pub fn new(table: impl Into<TableRef>) -> Self {
        Self {
            table: table.into(),
            rename_to: None,
            adds: vec![],
            changes: vec![],
            drops: vec![],
        }
    }

    /// Renames the table.
    #[must_use]
    pub fn rename_to(mut self, name: impl Into<String>) -> Self {
        self.rename_to = Some(name.into());
        self
    }

    fn add(mut self, config: ColumnConfig, placement: Placement) -> Self {
        self.adds.push(AddColumn { config, placement });
        self
    }

    /// Adds a column at the end.
    #[must_use]
    pub fn add_column(self, config: ColumnConfig) -> Self {
        self.add(config, Placement::End)
    }

    /// Adds a column in first position.
    #[must_use]
    pub fn add_column_first(self, config: ColumnConfig) -> Self {
        self.add(config, Placement::First)
    }

    /// Adds a column right after `after`.
    #[must_use]
    pub fn add_column_after(self, config: ColumnConfig, after: impl IntoColumn) -> Self {
        self.add(config, Placement::After(after.into_column()))
    }

    fn change(mut self, old: impl IntoColumn, config: ColumnConfig, placement: Placement) -> Self {
        self.changes.push(ChangeColumn {
            old: old.into_column(),
            config,
            placement,
        });
        self
    }

    /// Replaces `old` with `config` in place.
    #[must_use]
    pub fn change_column(self, old: impl IntoColumn, config: ColumnConfig) -> Self {
        self.change(old, config, Placement::End)
    }

    /// Replaces `old` with `config` and moves it first.
    #[must_use]
    pub fn change_column_first(self, old: impl IntoColumn, config: ColumnConfig) -> Self {
        self.change(old, config, Placement::First)
    }

    /// Replaces `old` with `config` and moves it right after `after`.
    #[must_use]
    pub fn change_column_after(
        self,
        old: impl IntoColumn,
        config: ColumnConfig,
        after: impl IntoColumn,
    ) -> Self {
        self.change(old, config, Placement::After(after.into_column()))
    }

    /// Drops a column.
    #[must_use]
    pub fn drop_column(mut self, column: impl IntoColumn) -> Self {
        self.drops.push(column.into_column());
        self
    }

    fn is_empty(&self) -> bool {
        self.rename_to.is_none()
            && self.adds.is_empty()
            && self.changes.is_empty()
            && self.drops.is_empty()
    }

    fn target(&self) -> Result<&Table> {
        let table = self.table.natural("ALTER TABLE")?;
        if self.is_empty() {
            return Err(BuildError::MissingClause(
                "ALTER TABLE needs at least one operation",
            ));
        }
        Ok(table)
    }

    /// Applies the statement to the in-memory table.
    ///
    /// Adds are applied first, then changes, then drops, then the rename.
    /// The whole batch is worked out on a copy of the column list; if any
    /// referenced column cannot be resolved, or the result would be an
    /// invalid table, nothing is changed.
    ///
    /// # Errors
    ///
    /// Fails on a joined or subquery target, an empty statement, an unresolved or
    /// foreign column reference, or a resulting schema that is empty or
    /// repeats a column name.
    pub fn apply_to_table(&self) -> Result<()> {
        let table = self.target()?;
        let mut columns = table.configs();

        for add in &self.adds {
            let index = add.placement.index(table, &columns)?;
            columns.insert(index, Rc::new(add.config.clone()));
        }

        for change in &self.changes {
            let index = index_of(table, &columns, &change.old)?;
            let config = Rc::new(change.config.clone());
            if matches!(change.placement, Placement::End) {
                columns[index] = config;
            } else {
                columns.remove(index);
                let index = change.placement.index(table, &columns)?;
                columns.insert(index, config);
            }
        }

        for drop in &self.drops {
            let index = index_of(table, &columns, drop)?;
            columns.remove(index);
        }

        let name = self.rename_to.clone().unwrap_or_else(|| table.name());
        validate_columns(&name, &columns)?;

        debug!(
            table = %table.name(),
            new_name = %name,
            columns = columns.len(),
            "applied ALTER TABLE to in-memory schema"
        );
        table.replace_schema(name, columns);
        Ok(())
    }
}

impl Render for AlterTable {
    fn render(&self, b: &mut Builder<'_>) {
        let table = match self.target() {
            Ok(table) => table,
            Err(e) => return b.set_error(e),
        };

        b.append("ALTER TABLE ");
        b.append_item(table);
        b.append(" ");

        let mut first = true;
        let mut separate = |b: &mut Builder<'_>| {
            if !first {
                b.append(", ");
            }
            first = false;
        };

        for add in &self.adds {
            separate(b);
            b.append("ADD COLUMN ");
            add.config.render_definition(b);
            add.placement.render(table, b);
        }

        for change in &self.changes {
            separate(b);
            b.append("CHANGE COLUMN ");
            match owned_column(table, &change.old) {
                Ok(old) => b.append_identifier(old.name()),
                Err(e) => b.set_error(e),
            }
            b.append(" ");
            change.config.render_definition(b);
            change.placement.render(table, b);
        }

        for drop in &self.drops {
            separate(b);
            b.append("DROP COLUMN ");
            match owned_column(table, drop) {
                Ok(column) => b.append_identifier(column.name()),
                Err(e) => b.set_error(e),
            }
        }

        if let Some(name) = &self.rename_to {
            separate(b);
            b.append("RENAME TO ");
            b.append_identifier(name);
        }
    }
}

impl Statement for AlterTable {}
