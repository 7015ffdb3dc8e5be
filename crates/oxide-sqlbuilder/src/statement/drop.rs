//! DROP TABLE statement builder.

use super::Statement;
use crate::builder::{Builder, Render};
use crate::schema::TableRef;

/// A DROP TABLE statement.
#[derive(Debug, Clone)]
pub struct DropTable {
    table: TableRef,
    if_exists: bool,
}

impl DropTable {
    /// Creates `DROP TABLE table`.
    #[must_use]
    pub fn new(table: impl Into<TableRef>) -> Self {
        Self {
            table: table.into(),
            if_exists: false,
        }
    }

    /// Adds IF EXISTS.
    #[must_use]
    pub const fn if_exists(mut self) -> Self {
        self.if_exists = true;
        self
    }
}

impl Render for DropTable {
    fn render(&self, b: &mut Builder<'_>) {
        if let Err(e) = self.table.natural("DROP TABLE") {
            return b.set_error(e);
        }
        b.append("DROP TABLE ");
        if self.if_exists {
            b.append("IF EXISTS ");
        }
        b.append_item(&self.table);
    }
}

impl Statement for DropTable {}
