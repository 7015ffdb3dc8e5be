//! SQL dialect support.
//!
//! Different databases quote identifiers, number placeholders and name column
//! types differently. Statements only ever talk to a [`Dialect`], so adding a
//! database means adding an implementation here and nothing else.

mod mysql;
mod postgres;
mod sqlite;

use std::fmt;
use std::str::FromStr;

pub use mysql::MysqlDialect;
pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;

use serde::{Deserialize, Serialize};

use crate::error::{BuildError, Result};
use crate::schema::{ColumnConfig, ColumnOption, TableOption};
use crate::statement::LockStrength;

/// Trait for SQL dialect-specific behavior.
pub trait Dialect {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns the statement terminator.
    fn query_suffix(&self) -> &'static str {
        ";"
    }

    /// Returns the placeholder for the argument at `ordinal` (1-based).
    fn bind_var(&self, ordinal: usize) -> String;

    /// Returns the identifier quote character.
    fn quote_char(&self) -> char {
        '"'
    }

    /// Quotes an identifier. Embedded quote characters are doubled.
    fn quote_field(&self, name: &str) -> String {
        let q = self.quote_char();
        let mut quoted = String::with_capacity(name.len() + 2);
        quoted.push(q);
        for ch in name.chars() {
            if ch == q {
                quoted.push(q);
            }
            quoted.push(ch);
        }
        quoted.push(q);
        quoted
    }

    /// Maps a column's declared type to SQL. An explicit `sql_type` wins.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Unsupported`] for a type the dialect cannot
    /// declare.
    fn column_type_to_string(&self, column: &ColumnConfig) -> Result<String>;

    /// Returns the keyword for the auto-increment column option.
    fn auto_increment_keyword(&self) -> &'static str;

    /// Maps one column option to SQL. An empty string means nothing is
    /// written for it.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Unsupported`] for an option the dialect lacks.
    fn column_option_to_string(&self, option: ColumnOption) -> Result<String> {
        let keyword = match option {
            ColumnOption::PrimaryKey => "PRIMARY KEY",
            ColumnOption::AutoIncrement => self.auto_increment_keyword(),
            ColumnOption::NotNull => "NOT NULL",
            ColumnOption::Unique => "UNIQUE",
        };
        Ok(keyword.to_string())
    }

    /// Maps table-level options to SQL, e.g. composite `UNIQUE(...)`
    /// constraints. An empty string means there are none.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Unsupported`] for a constraint the dialect
    /// lacks.
    fn table_option_to_string(&self, option: &TableOption) -> Result<String> {
        let constraints: Vec<String> = option
            .unique_sets()
            .iter()
            .map(|cols| {
                let quoted: Vec<String> = cols.iter().map(|c| self.quote_field(c)).collect();
                format!("UNIQUE({})", quoted.join(", "))
            })
            .collect();
        Ok(constraints.join(", "))
    }

    /// Maps a row-lock strength to SQL.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Unsupported`] when the dialect has no row
    /// locking.
    fn lock_strength_to_string(&self, strength: LockStrength) -> Result<String> {
        Ok(match strength {
            LockStrength::Update => String::from("FOR UPDATE"),
            LockStrength::Share => String::from("FOR SHARE"),
        })
    }

    /// Returns the NOWAIT modifier for row locks.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Unsupported`] when the dialect has no NOWAIT.
    fn nowait_to_string(&self) -> Result<String> {
        Ok(String::from("NOWAIT"))
    }
}

impl fmt::Debug for dyn Dialect + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Dialect").field(&self.name()).finish()
    }
}

/// Dialect selection as found in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    /// `SQLite`.
    Sqlite,
    /// `MySQL`.
    Mysql,
    /// `PostgreSQL`.
    #[serde(alias = "postgresql")]
    Postgres,
}

impl DialectKind {
    /// Returns the dialect implementation.
    #[must_use]
    pub const fn dialect(self) -> &'static dyn Dialect {
        match self {
            Self::Sqlite => &SqliteDialect,
            Self::Mysql => &MysqlDialect,
            Self::Postgres => &PostgresDialect,
        }
    }
}

impl FromStr for DialectKind {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            "mysql" => Ok(Self::Mysql),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            _ => Err(BuildError::UnknownDialect(s.to_string())),
        }
    }
}
