//! # oxide-sqlbuilder
//!
//! A dialect-aware SQL statement builder.
//!
//! Statements are built from an in-memory schema of [`Table`]s and rendered
//! into SQL text plus an ordered list of bound arguments for one of the
//! supported dialects:
//! - `SQLite`, through [`SqliteDialect`]
//! - `MySQL`, through [`MysqlDialect`]
//! - `PostgreSQL`, through [`PostgresDialect`]
//!
//! ## Building statements
//!
//! Columns are looked up on their table, so a typo is reported instead of
//! being sent to the database:
//!
//! ```rust
//! use oxide_sqlbuilder::{
//!     func, int_column, lit, star, string_column, ExprOps, Order, Select, SqliteDialect,
//!     Statement, Table,
//! };
//!
//! let users = Table::new(
//!     "users",
//!     [int_column("id").primary_key(), string_column("name")],
//! )
//! .unwrap();
//!
//! let (sql, args) = Select::new(&users)
//!     .columns([users.c("name")])
//!     .column(func("COUNT", [star()]).alias("n"))
//!     .where_clause(users.c("id").gt(lit(10)))
//!     .group_by([users.c("name")])
//!     .order_by(users.c("name"), Order::Desc)
//!     .to_sql(&SqliteDialect)
//!     .unwrap();
//!
//! assert_eq!(
//!     sql,
//!     r#"SELECT "users"."name", COUNT(*) AS "n" FROM "users" WHERE "users"."id">? GROUP BY "users"."name" ORDER BY "users"."name" DESC;"#
//! );
//! assert_eq!(args.len(), 1);
//!
//! assert!(users.c("nmae").is_err());
//! ```
//!
//! ## SQL Injection Prevention
//!
//! Values are bound as arguments by default; only literals explicitly marked
//! [`Literal::inline`] are written into the text, escaped.
//!
//! ```rust
//! use oxide_sqlbuilder::{
//!     int_column, string_column, ExprOps, PostgresDialect, Select, SqlValue, Statement, Table,
//! };
//!
//! let users = Table::new("users", [int_column("id"), string_column("name")]).unwrap();
//! let user_input = "'; DROP TABLE users; --";
//! let (sql, args) = Select::new(&users)
//!     .columns([users.c("id")])
//!     .where_clause(users.c("name").eq(user_input))
//!     .to_sql(&PostgresDialect)
//!     .unwrap();
//!
//! assert_eq!(sql, r#"SELECT "users"."id" FROM "users" WHERE "users"."name"=$1;"#);
//! assert_eq!(args, vec![SqlValue::Text(String::from(user_input))]);
//! ```

mod builder;
mod condition;
pub mod dialect;
mod error;
mod expr;
mod literal;
pub mod schema;
pub mod statement;
mod value;

pub use builder::{Builder, Render};
pub use condition::{and, or, BinaryOperator, Condition, Operand};
pub use dialect::{Dialect, DialectKind, MysqlDialect, PostgresDialect, SqliteDialect};
pub use error::{BuildError, Result};
pub use expr::{func, star, Expr, ExprOps, IntoColumn, IntoExpr, SqlFunc};
pub use literal::{lit, Literal, LiteralKind};
pub use schema::{
    bool_column, bytes_column, date_column, float_column, int_column, string_column, AliasColumn,
    Column, ColumnConfig, ColumnOption, ColumnType, Join, JoinKind, Subquery, Table, TableOption,
    TableRef,
};
pub use statement::{
    AlterTable, CreateIndex, CreateTable, Delete, DropTable, Insert, Lock, LockStrength, Order,
    Select, Statement, Update,
};
pub use value::{CustomValue, Null, SqlValue, ToSqlValue};
