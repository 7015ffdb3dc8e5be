//! Error types for statement construction.
//!
//! Every failure travels either as a [`BuildError`] returned directly (table
//! construction, ALTER application) or as the sticky error of a
//! [`Builder`](crate::Builder) during rendering.

use crate::literal::LiteralKind;

/// Errors that can occur while building or rendering a statement.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    /// A table was declared without any column.
    #[error("table `{0}` needs at least one column")]
    EmptyTable(String),

    /// The same column name was declared twice in one table.
    #[error("column `{column}` is declared more than once in table `{table}`")]
    DuplicateDefinition {
        /// Table name.
        table: String,
        /// Repeated column name.
        column: String,
    },

    /// A required clause was not provided.
    #[error("{0}")]
    MissingClause(&'static str),

    /// A named column does not exist.
    #[error("column `{column}` was not found in `{table}`")]
    ColumnNotFound {
        /// Table (or join) the lookup ran against.
        table: String,
        /// Column name.
        column: String,
    },

    /// A column name resolves on both sides of a join.
    #[error("column `{0}` is ambiguous: it exists on both sides of the join")]
    DuplicateColumn(String),

    /// A column of another table was used where the target table's column is required.
    #[error("column `{column}` does not belong to table `{table}`")]
    ForeignColumn {
        /// Target table name.
        table: String,
        /// Column name.
        column: String,
    },

    /// Column list and value list have different lengths.
    #[error("{expected} values needed, but got {got}")]
    ValueCountMismatch {
        /// Number of columns.
        expected: usize,
        /// Number of values.
        got: usize,
    },

    /// HAVING was set without GROUP BY.
    #[error("HAVING requires a GROUP BY clause")]
    HavingWithoutGroupBy,

    /// A literal wraps a value the engine cannot bind.
    #[error("unsupported literal type `{0}`")]
    UnsupportedLiteral(&'static str),

    /// An unsigned integer does not fit into a signed 64-bit integer.
    #[error("integer {0} is out of range for a 64-bit signed value")]
    IntegerOutOfRange(u64),

    /// A NaN or infinite float was to be written into the statement text.
    #[error("non-finite float {0} has no SQL literal form")]
    NonFiniteFloat(f64),

    /// A value's kind is not accepted by the column's declared type.
    #[error("column `{column}` does not accept type {kind}")]
    IncompatibleType {
        /// Column name.
        column: String,
        /// Kind of the rejected value.
        kind: LiteralKind,
    },

    /// NULL was used with an operator that has no NULL form.
    #[error("NULL is not usable with operator {0}")]
    NullOperand(&'static str),

    /// A mutation statement targets a joined table.
    #[error("{0} requires a natural table, not a join")]
    JoinedTarget(&'static str),

    /// A mutation statement targets a subquery.
    #[error("{0} requires a natural table, not a subquery")]
    SubqueryTarget(&'static str),

    /// A subquery was used as one side of a join.
    #[error("a subquery cannot be joined")]
    SubqueryJoin,

    /// The dialect cannot express a construct.
    #[error("dialect `{dialect}` does not support {feature}")]
    Unsupported {
        /// Dialect name.
        dialect: &'static str,
        /// The construct that was requested.
        feature: &'static str,
    },

    /// A dialect name from configuration is not recognized.
    #[error("unknown dialect `{0}`")]
    UnknownDialect(String),
}

/// Result type alias for statement construction.
pub type Result<T> = std::result::Result<T, BuildError>;
