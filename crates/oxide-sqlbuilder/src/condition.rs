//! WHERE/HAVING/ON conditions.

use crate::builder::{Builder, Render};
use crate::error::{BuildError, Result};
use crate::expr::{Expr, IntoExpr, SqlFunc};
use crate::literal::Literal;
use crate::schema::{AliasColumn, Column};
use crate::value::ToSqlValue;

/// Binary comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    /// `=`
    Eq,
    /// `<>`
    NotEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `LIKE`
    Like,
}

impl BinaryOperator {
    /// Returns the SQL text written between the operands.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Like => " LIKE ",
        }
    }

    /// Returns the operator name used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Like => "LIKE",
            other => other.as_sql(),
        }
    }

    const fn null_form(self) -> Option<&'static str> {
        match self {
            Self::Eq => Some(" IS NULL"),
            Self::NotEq => Some(" IS NOT NULL"),
            _ => None,
        }
    }
}

/// The right-hand side of a comparison: an expression or a literal.
#[derive(Debug, Clone)]
pub enum Operand {
    /// A column, function or alias.
    Expr(Result<Expr>),
    /// A wrapped host value.
    Literal(Literal),
}

impl Operand {
    fn is_null(&self) -> bool {
        matches!(self, Self::Literal(l) if l.is_null())
    }
}

impl Render for Operand {
    fn render(&self, b: &mut Builder<'_>) {
        match self {
            Self::Expr(e) => b.append_item(e),
            Self::Literal(l) => b.append_item(l),
        }
    }
}

impl<T: ToSqlValue> From<T> for Operand {
    fn from(value: T) -> Self {
        Self::Literal(Literal::new(value))
    }
}

impl From<Literal> for Operand {
    fn from(value: Literal) -> Self {
        Self::Literal(value)
    }
}

impl From<Expr> for Operand {
    fn from(value: Expr) -> Self {
        Self::Expr(Ok(value))
    }
}

impl From<Column> for Operand {
    fn from(value: Column) -> Self {
        Self::Expr(value.into_expr())
    }
}

impl From<&Column> for Operand {
    fn from(value: &Column) -> Self {
        Self::Expr(value.into_expr())
    }
}

impl From<Result<Column>> for Operand {
    fn from(value: Result<Column>) -> Self {
        Self::Expr(value.into_expr())
    }
}

impl From<SqlFunc> for Operand {
    fn from(value: SqlFunc) -> Self {
        Self::Expr(value.into_expr())
    }
}

impl From<AliasColumn> for Operand {
    fn from(value: AliasColumn) -> Self {
        Self::Expr(value.into_expr())
    }
}

/// A boolean condition tree.
#[derive(Debug, Clone)]
pub enum Condition {
    /// `left <op> right`.
    Binary {
        /// Left-hand expression.
        left: Result<Expr>,
        /// Operator.
        op: BinaryOperator,
        /// Right-hand operand.
        right: Operand,
    },
    /// `expr BETWEEN low AND high`.
    Between {
        /// Tested expression.
        expr: Result<Expr>,
        /// Lower bound.
        low: Operand,
        /// Upper bound.
        high: Operand,
    },
    /// `expr IN ( values )`.
    In {
        /// Tested expression.
        expr: Result<Expr>,
        /// Candidate values.
        values: Vec<Operand>,
    },
    /// All conditions hold.
    And(Vec<Self>),
    /// At least one condition holds.
    Or(Vec<Self>),
}

impl Condition {
    pub(crate) const fn binary(left: Result<Expr>, op: BinaryOperator, right: Operand) -> Self {
        Self::Binary { left, op, right }
    }

    const fn is_connective(&self) -> bool {
        matches!(self, Self::And(_) | Self::Or(_))
    }

    fn render_connective(conds: &[Self], connector: &'static str, b: &mut Builder<'_>) {
        if conds.is_empty() {
            b.set_error(BuildError::MissingClause(
                "AND/OR needs at least one condition",
            ));
            return;
        }
        for (i, cond) in conds.iter().enumerate() {
            if i > 0 {
                b.append(connector);
            }
            if cond.is_connective() {
                b.append("( ");
                b.append_item(cond);
                b.append(" )");
            } else {
                b.append_item(cond);
            }
        }
    }
}

impl Render for Condition {
    fn render(&self, b: &mut Builder<'_>) {
        match self {
            Self::Binary { left, op, right } => {
                b.append_item(left);
                if right.is_null() {
                    let Some(form) = op.null_form() else {
                        return b.set_error(BuildError::NullOperand(op.name()));
                    };
                    b.append(form);
                } else {
                    b.append(op.as_sql());
                    b.append_item(right);
                }
            }
            Self::Between { expr, low, high } => {
                b.append_item(expr);
                if low.is_null() || high.is_null() {
                    return b.set_error(BuildError::NullOperand("BETWEEN"));
                }
                b.append(" BETWEEN ");
                b.append_item(low);
                b.append(" AND ");
                b.append_item(high);
            }
            Self::In { expr, values } => {
                b.append_item(expr);
                if values.is_empty() {
                    return b.set_error(BuildError::MissingClause("IN needs at least one value"));
                }
                // NULL never matches inside IN.
                if values.iter().any(Operand::is_null) {
                    return b.set_error(BuildError::NullOperand("IN"));
                }
                b.append(" IN ( ");
                b.append_items(values, ", ");
                b.append(" )");
            }
            Self::And(conds) => Self::render_connective(conds, " AND ", b),
            Self::Or(conds) => Self::render_connective(conds, " OR ", b),
        }
    }
}

/// All of `conditions` hold.
#[must_use]
pub fn and(conditions: impl IntoIterator<Item = Condition>) -> Condition {
    Condition::And(conditions.into_iter().collect())
}

/// At least one of `conditions` holds.
#[must_use]
pub fn or(conditions: impl IntoIterator<Item = Condition>) -> Condition {
    Condition::Or(conditions.into_iter().collect())
}
