//! Table and column model.

mod column;
mod subquery;
mod table;

pub use column::{
    bool_column, bytes_column, date_column, float_column, int_column, string_column, AliasColumn,
    Column, ColumnConfig, ColumnOption, ColumnType,
};
pub(crate) use table::validate_columns;
pub use subquery::Subquery;
pub use table::{Join, JoinKind, Table, TableOption, TableRef};
