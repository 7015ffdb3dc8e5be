//! Row-lock clause for SELECT.

use serde::{Deserialize, Serialize};

use crate::builder::{Builder, Render};
use crate::schema::Table;

/// Row-lock strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockStrength {
    /// `FOR UPDATE`.
    Update,
    /// `FOR SHARE`.
    Share,
}

/// A `FOR UPDATE`/`FOR SHARE` clause.
#[derive(Debug, Clone)]
pub struct Lock {
    strength: LockStrength,
    tables: Vec<Table>,
    nowait: bool,
}

impl Lock {
    /// Creates a lock clause.
    #[must_use]
    pub const fn new(strength: LockStrength) -> Self {
        Self {
            strength,
            tables: Vec::new(),
            nowait: false,
        }
    }

    /// `FOR UPDATE`.
    #[must_use]
    pub const fn update() -> Self {
        Self::new(LockStrength::Update)
    }

    /// `FOR SHARE`.
    #[must_use]
    pub const fn share() -> Self {
        Self::new(LockStrength::Share)
    }

    /// Restricts the lock to `table` (`OF ...`).
    #[must_use]
    pub fn of(mut self, table: &Table) -> Self {
        self.tables.push(table.clone());
        self
    }

    /// Fails instead of waiting for a held lock.
    #[must_use]
    pub const fn nowait(mut self) -> Self {
        self.nowait = true;
        self
    }
}

impl Render for Lock {
    fn render(&self, b: &mut Builder<'_>) {
        b.append_result(b.dialect().lock_strength_to_string(self.strength));
        if !self.tables.is_empty() {
            b.append(" OF ");
            b.append_items(&self.tables, ", ");
        }
        if self.nowait {
            b.append(" ");
            b.append_result(b.dialect().nowait_to_string());
        }
    }
}
