//! SQL values and parameter handling.
//!
//! A [`SqlValue`] is what ends up in the argument list of a rendered
//! statement, or, for non-bindable contexts such as `DEFAULT`, inline in the
//! statement text.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::{BuildError, Result};
use crate::literal::LiteralKind;

/// A value bound by a driver that the engine does not interpret.
///
/// Implementors are passed through to the argument list untouched. The only
/// thing the engine asks of them is a textual form for inline rendering.
pub trait CustomValue: fmt::Debug + Send + Sync {
    /// Returns the SQL representation for inline use (already escaped).
    fn to_sql_inline(&self) -> String;
}

/// A SQL value that can be used as a parameter.
#[derive(Debug, Clone)]
pub enum SqlValue {
    /// NULL value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Binary blob value.
    Blob(Vec<u8>),
    /// Point in time, UTC.
    Timestamp(DateTime<Utc>),
    /// Driver-specific value passed through opaque.
    Custom(Arc<dyn CustomValue>),
}

impl SqlValue {
    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> LiteralKind {
        match self {
            Self::Null => LiteralKind::Null,
            Self::Bool(_) => LiteralKind::Bool,
            Self::Int(_) => LiteralKind::Int64,
            Self::Float(_) => LiteralKind::Float64,
            Self::Text(_) => LiteralKind::String,
            Self::Blob(_) => LiteralKind::Bytes,
            Self::Timestamp(_) => LiteralKind::Timestamp,
            Self::Custom(_) => LiteralKind::Custom,
        }
    }

    /// Returns true for [`SqlValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the SQL representation for inline use (escaped).
    ///
    /// **Warning**: Prefer using parameterized queries instead.
    #[must_use]
    pub fn to_sql_inline(&self) -> String {
        match self {
            Self::Null => String::from("NULL"),
            Self::Bool(b) => {
                if *b {
                    String::from("TRUE")
                } else {
                    String::from("FALSE")
                }
            }
            Self::Int(n) => format!("{n}"),
            Self::Float(f) => format!("{f}"),
            Self::Text(s) => {
                // Escape single quotes by doubling them
                let escaped = s.replace('\'', "''");
                format!("'{escaped}'")
            }
            Self::Blob(b) => {
                let hex: String = b.iter().map(|byte| format!("{byte:02X}")).collect();
                format!("X'{hex}'")
            }
            Self::Timestamp(t) => format!("'{}'", t.format("%Y-%m-%d %H:%M:%S")),
            Self::Custom(c) => c.to_sql_inline(),
        }
    }

    /// Like [`to_sql_inline`](Self::to_sql_inline), but refuses NaN and
    /// infinities, which no dialect can read back.
    pub(crate) fn checked_inline(&self) -> Result<String> {
        match self {
            Self::Float(f) if !f.is_finite() => Err(BuildError::NonFiniteFloat(*f)),
            other => Ok(other.to_sql_inline()),
        }
    }
}

impl PartialEq for SqlValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Blob(a), Self::Blob(b)) => a == b,
            (Self::Timestamp(a), Self::Timestamp(b)) => a == b,
            (Self::Custom(a), Self::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// The absent value. Binds as NULL and turns `eq`/`not_eq` into
/// `IS NULL`/`IS NOT NULL`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Null;

/// Trait for types that can be converted to SQL values.
pub trait ToSqlValue {
    /// Converts the value to a `SqlValue`.
    fn to_sql_value(self) -> SqlValue;
}

impl ToSqlValue for SqlValue {
    fn to_sql_value(self) -> Self {
        self
    }
}

impl ToSqlValue for Null {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Null
    }
}

impl ToSqlValue for bool {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Bool(self)
    }
}

impl ToSqlValue for i64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(self)
    }
}

impl ToSqlValue for i32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for i16 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for i8 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for u32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for u16 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for u8 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for f64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(self)
    }
}

impl ToSqlValue for f32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(f64::from(self))
    }
}

impl ToSqlValue for String {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self)
    }
}

impl ToSqlValue for &String {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self.clone())
    }
}

impl ToSqlValue for &str {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(String::from(self))
    }
}

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(self) -> SqlValue {
        self.map_or(SqlValue::Null, ToSqlValue::to_sql_value)
    }
}

impl ToSqlValue for Vec<u8> {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self)
    }
}

impl ToSqlValue for &[u8] {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self.to_vec())
    }
}

impl ToSqlValue for DateTime<Utc> {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Timestamp(self)
    }
}

impl ToSqlValue for NaiveDateTime {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Timestamp(self.and_utc())
    }
}

impl ToSqlValue for NaiveDate {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Timestamp(self.and_time(chrono::NaiveTime::MIN).and_utc())
    }
}

impl ToSqlValue for Arc<dyn CustomValue> {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Custom(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Point(i32, i32);

    impl CustomValue for Point {
        fn to_sql_inline(&self) -> String {
            format!("POINT({}, {})", self.0, self.1)
        }
    }

    #[test]
    fn test_sql_value_inline_null() {
        assert_eq!(SqlValue::Null.to_sql_inline(), "NULL");
    }

    #[test]
    fn test_sql_value_inline_bool() {
        assert_eq!(SqlValue::Bool(true).to_sql_inline(), "TRUE");
        assert_eq!(SqlValue::Bool(false).to_sql_inline(), "FALSE");
    }

    #[test]
    fn test_sql_value_inline_text_escaping() {
        assert_eq!(
            SqlValue::Text(String::from("O'Brien")).to_sql_inline(),
            "'O''Brien'"
        );
    }

    #[test]
    fn test_sql_value_inline_blob() {
        assert_eq!(
            SqlValue::Blob(vec![0x48, 0x45, 0x4C, 0x4C, 0x4F]).to_sql_inline(),
            "X'48454C4C4F'"
        );
    }

    #[test]
    fn test_sql_value_inline_timestamp() {
        let epoch = DateTime::<Utc>::from_timestamp(0, 0).unwrap();
        assert_eq!(
            SqlValue::Timestamp(epoch).to_sql_inline(),
            "'1970-01-01 00:00:00'"
        );
    }

    #[test]
    fn test_checked_inline_rejects_non_finite() {
        assert_eq!(SqlValue::Float(1.5).checked_inline(), Ok(String::from("1.5")));
        assert!(matches!(
            SqlValue::Float(f64::NAN).checked_inline(),
            Err(BuildError::NonFiniteFloat(f)) if f.is_nan()
        ));
        assert_eq!(
            SqlValue::Float(f64::NEG_INFINITY).checked_inline(),
            Err(BuildError::NonFiniteFloat(f64::NEG_INFINITY))
        );
    }

    #[test]
    fn test_custom_value_passes_through() {
        let point: Arc<dyn CustomValue> = Arc::new(Point(1, 2));
        let value = Arc::clone(&point).to_sql_value();
        assert_eq!(value.kind(), LiteralKind::Custom);
        assert_eq!(value.to_sql_inline(), "POINT(1, 2)");
        assert_eq!(value, SqlValue::Custom(point));
    }

    #[test]
    fn test_to_sql_value_conversions() {
        assert_eq!(true.to_sql_value(), SqlValue::Bool(true));
        assert_eq!(42_i32.to_sql_value(), SqlValue::Int(42));
        assert_eq!(7_u8.to_sql_value(), SqlValue::Int(7));
        assert_eq!(2.5_f32.to_sql_value(), SqlValue::Float(2.5));
        assert_eq!(
            "hello".to_sql_value(),
            SqlValue::Text(String::from("hello"))
        );
        assert_eq!(None::<i32>.to_sql_value(), SqlValue::Null);
        assert_eq!(Some(42_i32).to_sql_value(), SqlValue::Int(42));
        assert_eq!(Null.to_sql_value(), SqlValue::Null);
        assert_eq!(vec![1_u8].to_sql_value(), SqlValue::Blob(vec![1]));
    }
}
