//! `MySQL` dialect.

use super::Dialect;
use crate::error::Result;
use crate::schema::{ColumnConfig, ColumnType};

/// Width used for `VARCHAR` when a string column declares no size.
const DEFAULT_VARCHAR_SIZE: u32 = 255;

/// `MySQL` dialect: `?` placeholders, backtick quoting.
#[derive(Debug, Default, Clone, Copy)]
pub struct MysqlDialect;

impl MysqlDialect {
    /// Creates a new `MySQL` dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for MysqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn bind_var(&self, _ordinal: usize) -> String {
        String::from("?")
    }

    fn quote_char(&self) -> char {
        '`'
    }

    fn column_type_to_string(&self, column: &ColumnConfig) -> Result<String> {
        if let Some(sql_type) = column.declared_sql_type() {
            return Ok(sql_type.to_string());
        }
        Ok(match column.column_type() {
            ColumnType::Int => String::from("INTEGER"),
            ColumnType::String => format!(
                "VARCHAR({})",
                column.declared_size().unwrap_or(DEFAULT_VARCHAR_SIZE)
            ),
            ColumnType::Date => String::from("DATETIME"),
            ColumnType::Float => String::from("FLOAT"),
            ColumnType::Bool => String::from("BOOLEAN"),
            ColumnType::Bytes => String::from("BLOB"),
        })
    }

    fn auto_increment_keyword(&self) -> &'static str {
        "AUTO_INCREMENT"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{float_column, int_column, string_column, ColumnOption};
    use crate::statement::LockStrength;

    #[test]
    fn test_mysql_dialect() {
        let d = MysqlDialect::new();
        assert_eq!(d.name(), "mysql");
        assert_eq!(d.bind_var(2), "?");
        assert_eq!(d.quote_field("name"), "`name`");
    }

    #[test]
    fn test_mysql_column_types() {
        let d = MysqlDialect;
        assert_eq!(
            d.column_type_to_string(&string_column("a")).unwrap(),
            "VARCHAR(255)"
        );
        assert_eq!(
            d.column_type_to_string(&string_column("a").size(64)).unwrap(),
            "VARCHAR(64)"
        );
        assert_eq!(d.column_type_to_string(&int_column("a")).unwrap(), "INTEGER");
        assert_eq!(d.column_type_to_string(&float_column("a")).unwrap(), "FLOAT");
    }

    #[test]
    fn test_mysql_options_and_locks() {
        let d = MysqlDialect;
        assert_eq!(
            d.column_option_to_string(ColumnOption::AutoIncrement).unwrap(),
            "AUTO_INCREMENT"
        );
        assert_eq!(
            d.lock_strength_to_string(LockStrength::Share).unwrap(),
            "FOR SHARE"
        );
        assert_eq!(d.nowait_to_string().unwrap(), "NOWAIT");
    }
}
