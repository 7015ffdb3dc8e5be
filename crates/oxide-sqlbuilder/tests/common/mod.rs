#![allow(dead_code)]

use oxide_sqlbuilder::{
    int_column, string_column, Dialect, MysqlDialect, PostgresDialect, SqliteDialect, Table,
};

pub const DIALECTS: [&dyn Dialect; 3] = [&SqliteDialect, &MysqlDialect, &PostgresDialect];

/// `TABLE_A (id INTEGER PRIMARY KEY, test1 INTEGER, test2 INTEGER)`.
pub fn table_a() -> Table {
    Table::new(
        "TABLE_A",
        [
            int_column("id").primary_key(),
            int_column("test1"),
            int_column("test2"),
        ],
    )
    .expect("TABLE_A is a valid table")
}

/// `A (id, right_id)` and `B (id, value)`, joined on `A.right_id = B.id`.
pub fn join_tables() -> (Table, Table) {
    let a = Table::new("A", [int_column("id"), int_column("right_id")])
        .expect("A is a valid table");
    let b = Table::new("B", [int_column("id"), string_column("value")])
        .expect("B is a valid table");
    (a, b)
}

/// Number of placeholders in `sql` for `dialect`.
pub fn placeholder_count(dialect: &dyn Dialect, sql: &str) -> usize {
    if dialect.name() == "postgresql" {
        sql.match_indices('$').count()
    } else {
        sql.matches('?').count()
    }
}
