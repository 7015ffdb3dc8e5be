//! `PostgreSQL` dialect.

use super::Dialect;
use crate::error::Result;
use crate::schema::{ColumnConfig, ColumnOption, ColumnType};

/// `PostgreSQL` dialect: `$n` placeholders, `"` quoting.
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresDialect;

impl PostgresDialect {
    /// Creates a new `PostgreSQL` dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgresql"
    }

    fn bind_var(&self, ordinal: usize) -> String {
        format!("${ordinal}")
    }

    fn column_type_to_string(&self, column: &ColumnConfig) -> Result<String> {
        if let Some(sql_type) = column.declared_sql_type() {
            return Ok(sql_type.to_string());
        }
        Ok(match column.column_type() {
            // PostgreSQL uses SERIAL instead of an AUTOINCREMENT keyword
            ColumnType::Int if column.has_option(ColumnOption::AutoIncrement) => {
                String::from("SERIAL")
            }
            ColumnType::Int => String::from("BIGINT"),
            ColumnType::String => column
                .declared_size()
                .map_or_else(|| String::from("TEXT"), |n| format!("VARCHAR({n})")),
            ColumnType::Date => String::from("TIMESTAMP"),
            ColumnType::Float => String::from("REAL"),
            ColumnType::Bool => String::from("BOOLEAN"),
            ColumnType::Bytes => String::from("BYTEA"),
        })
    }

    fn auto_increment_keyword(&self) -> &'static str {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{bytes_column, int_column, string_column};

    #[test]
    fn test_postgres_dialect() {
        let d = PostgresDialect::new();
        assert_eq!(d.name(), "postgresql");
        assert_eq!(d.bind_var(1), "$1");
        assert_eq!(d.bind_var(12), "$12");
        assert_eq!(d.quote_field("id"), "\"id\"");
    }

    #[test]
    fn test_postgres_serial_substitution() {
        let d = PostgresDialect;
        assert_eq!(
            d.column_type_to_string(&int_column("id").primary_key().auto_increment())
                .unwrap(),
            "SERIAL"
        );
        assert_eq!(d.column_type_to_string(&int_column("n")).unwrap(), "BIGINT");
        assert_eq!(
            d.column_option_to_string(ColumnOption::AutoIncrement).unwrap(),
            ""
        );
    }

    #[test]
    fn test_postgres_column_types() {
        let d = PostgresDialect;
        assert_eq!(d.column_type_to_string(&string_column("s")).unwrap(), "TEXT");
        assert_eq!(
            d.column_type_to_string(&string_column("s").size(32)).unwrap(),
            "VARCHAR(32)"
        );
        assert_eq!(d.column_type_to_string(&bytes_column("b")).unwrap(), "BYTEA");
    }
}
