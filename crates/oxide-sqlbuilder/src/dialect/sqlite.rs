//! `SQLite` dialect.

use super::Dialect;
use crate::error::{BuildError, Result};
use crate::schema::{ColumnConfig, ColumnType};
use crate::statement::LockStrength;

/// `SQLite` dialect: `?` placeholders, `"` quoting, no row locks.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteDialect;

impl SqliteDialect {
    /// Creates a new `SQLite` dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn bind_var(&self, _ordinal: usize) -> String {
        String::from("?")
    }

    fn column_type_to_string(&self, column: &ColumnConfig) -> Result<String> {
        if let Some(sql_type) = column.declared_sql_type() {
            return Ok(sql_type.to_string());
        }
        // SQLite has dynamic typing with type affinity
        let ty = match column.column_type() {
            ColumnType::Int => "INTEGER",
            ColumnType::String => "TEXT",
            ColumnType::Date => "DATE",
            ColumnType::Float => "REAL",
            ColumnType::Bool => "BOOLEAN",
            ColumnType::Bytes => "BLOB",
        };
        Ok(ty.to_string())
    }

    fn auto_increment_keyword(&self) -> &'static str {
        "AUTOINCREMENT"
    }

    fn lock_strength_to_string(&self, _strength: LockStrength) -> Result<String> {
        Err(BuildError::Unsupported {
            dialect: self.name(),
            feature: "row locking",
        })
    }

    fn nowait_to_string(&self) -> Result<String> {
        Err(BuildError::Unsupported {
            dialect: self.name(),
            feature: "NOWAIT",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{bytes_column, date_column, int_column, string_column, ColumnOption};

    #[test]
    fn test_sqlite_dialect() {
        let dialect = SqliteDialect::new();
        assert_eq!(dialect.name(), "sqlite");
        assert_eq!(dialect.query_suffix(), ";");
        assert_eq!(dialect.bind_var(3), "?");
        assert_eq!(dialect.quote_field("id"), "\"id\"");
    }

    #[test]
    fn test_sqlite_column_types() {
        let d = SqliteDialect;
        assert_eq!(d.column_type_to_string(&int_column("a")).unwrap(), "INTEGER");
        assert_eq!(d.column_type_to_string(&string_column("a")).unwrap(), "TEXT");
        assert_eq!(d.column_type_to_string(&date_column("a")).unwrap(), "DATE");
        assert_eq!(d.column_type_to_string(&bytes_column("a")).unwrap(), "BLOB");
        assert_eq!(
            d.column_type_to_string(&string_column("a").sql_type("VARCHAR(10)"))
                .unwrap(),
            "VARCHAR(10)"
        );
    }

    #[test]
    fn test_sqlite_options_and_locks() {
        let d = SqliteDialect;
        assert_eq!(
            d.column_option_to_string(ColumnOption::AutoIncrement).unwrap(),
            "AUTOINCREMENT"
        );
        assert!(matches!(
            d.lock_strength_to_string(LockStrength::Update),
            Err(BuildError::Unsupported { dialect: "sqlite", .. })
        ));
        assert!(d.nowait_to_string().is_err());
    }
}
