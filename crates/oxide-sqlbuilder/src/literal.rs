//! Host values wrapped for rendering.
//!
//! A [`Literal`] is built from any value and only converted when it is
//! rendered, so building one never fails. Conversion failures surface through
//! the [`Builder`](crate::Builder).

use std::any::Any;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::builder::{Builder, Render};
use crate::error::{BuildError, Result};
use crate::value::{CustomValue, Null, SqlValue, ToSqlValue};

/// The bindable kind a literal converts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    /// Signed 64-bit integer.
    Int64,
    /// 64-bit float.
    Float64,
    /// Boolean.
    Bool,
    /// Byte sequence.
    Bytes,
    /// Text.
    String,
    /// Point in time.
    Timestamp,
    /// Logical NULL.
    Null,
    /// Driver-specific value.
    Custom,
}

impl fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int64 => "Int64",
            Self::Float64 => "Float64",
            Self::Bool => "Bool",
            Self::Bytes => "Bytes",
            Self::String => "String",
            Self::Timestamp => "Timestamp",
            Self::Null => "Null",
            Self::Custom => "Custom",
        };
        f.write_str(name)
    }
}

#[derive(Clone)]
enum Raw {
    Value(SqlValue),
    Any {
        value: Rc<dyn Any>,
        type_name: &'static str,
    },
}

/// A wrapped host value destined to become a bound argument or inline text.
#[derive(Clone)]
pub struct Literal {
    raw: Raw,
    placeholder: bool,
}

impl Literal {
    /// Wraps a statically convertible value, rendered as a placeholder.
    #[must_use]
    pub fn new<T: ToSqlValue>(value: T) -> Self {
        Self {
            raw: Raw::Value(value.to_sql_value()),
            placeholder: true,
        }
    }

    /// Wraps a value whose type is only inspected at render time.
    ///
    /// Integers of every width, floats, `bool`, `String`, `&'static str`,
    /// byte vectors, chrono timestamps, [`SqlValue`], [`Null`], `()` and
    /// `Arc<dyn CustomValue>` are accepted. Anything else fails to render
    /// with [`BuildError::UnsupportedLiteral`].
    #[must_use]
    pub fn from_any<T: Any>(value: T) -> Self {
        Self {
            raw: Raw::Any {
                value: Rc::new(value),
                type_name: std::any::type_name::<T>(),
            },
            placeholder: true,
        }
    }

    /// The NULL literal.
    #[must_use]
    pub const fn null() -> Self {
        Self {
            raw: Raw::Value(SqlValue::Null),
            placeholder: true,
        }
    }

    /// Switches to inline rendering: the canonical text is written into the
    /// query instead of a placeholder.
    #[must_use]
    pub const fn inline(mut self) -> Self {
        self.placeholder = false;
        self
    }

    /// Returns true when the literal renders as a placeholder.
    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// Converts the wrapped value to its bindable form.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::UnsupportedLiteral`] for a type with no SQL
    /// mapping and [`BuildError::IntegerOutOfRange`] for an unsigned value
    /// past `i64::MAX`.
    pub fn converted(&self) -> Result<SqlValue> {
        match &self.raw {
            Raw::Value(v) => Ok(v.clone()),
            Raw::Any { value, type_name } => convert_any(value.as_ref(), type_name),
        }
    }

    /// Returns the kind the value converts to.
    ///
    /// # Errors
    ///
    /// Fails as [`converted`](Self::converted) does.
    pub fn kind(&self) -> Result<LiteralKind> {
        self.converted().map(|v| v.kind())
    }

    /// Returns true when the value converts to NULL.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self.converted(), Ok(SqlValue::Null))
    }
}

impl fmt::Debug for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Literal");
        match &self.raw {
            Raw::Value(v) => s.field("value", v),
            Raw::Any { type_name, .. } => s.field("type", type_name),
        };
        s.field("placeholder", &self.placeholder).finish()
    }
}

impl<T: ToSqlValue> From<T> for Literal {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

/// Wraps a value as a placeholder literal.
///
/// ```
/// use oxide_sqlbuilder::lit;
///
/// let one = lit(1);
/// assert!(one.is_placeholder());
/// ```
#[must_use]
pub fn lit<T: ToSqlValue>(value: T) -> Literal {
    Literal::new(value)
}

impl Render for Literal {
    fn render(&self, b: &mut Builder<'_>) {
        match self.converted() {
            Ok(v) if self.placeholder => b.append_value(v),
            Ok(v) => b.append_result(v.checked_inline()),
            Err(e) => b.set_error(e),
        }
    }
}

fn unsigned(v: u64) -> Result<SqlValue> {
    i64::try_from(v)
        .map(SqlValue::Int)
        .map_err(|_| BuildError::IntegerOutOfRange(v))
}

macro_rules! downcast_into {
    ($value:expr, $($ty:ty => |$p:pat_param| $conv:expr),+ $(,)?) => {
        $(
            if let Some($p) = $value.downcast_ref::<$ty>() {
                return $conv;
            }
        )+
    };
}

fn convert_any(value: &dyn Any, type_name: &'static str) -> Result<SqlValue> {
    downcast_into!(value,
        i64 => |v| Ok(SqlValue::Int(*v)),
        i32 => |v| Ok(SqlValue::Int(i64::from(*v))),
        i16 => |v| Ok(SqlValue::Int(i64::from(*v))),
        i8 => |v| Ok(SqlValue::Int(i64::from(*v))),
        isize => |v| i64::try_from(*v)
            .map(SqlValue::Int)
            .map_err(|_| BuildError::UnsupportedLiteral(type_name)),
        u64 => |v| unsigned(*v),
        u32 => |v| Ok(SqlValue::Int(i64::from(*v))),
        u16 => |v| Ok(SqlValue::Int(i64::from(*v))),
        u8 => |v| Ok(SqlValue::Int(i64::from(*v))),
        usize => |v| u64::try_from(*v)
            .map_err(|_| BuildError::UnsupportedLiteral(type_name))
            .and_then(unsigned),
        f64 => |v| Ok(SqlValue::Float(*v)),
        f32 => |v| Ok(SqlValue::Float(f64::from(*v))),
        bool => |v| Ok(SqlValue::Bool(*v)),
        String => |v| Ok(SqlValue::Text(v.clone())),
        &'static str => |v| Ok(SqlValue::Text(String::from(*v))),
        Vec<u8> => |v| Ok(SqlValue::Blob(v.clone())),
        &'static [u8] => |v| Ok(SqlValue::Blob(v.to_vec())),
        DateTime<Utc> => |v| Ok(SqlValue::Timestamp(*v)),
        NaiveDateTime => |v| Ok(SqlValue::Timestamp(v.and_utc())),
        NaiveDate => |v| Ok(v.to_sql_value()),
        SqlValue => |v| Ok(v.clone()),
        Arc<dyn CustomValue> => |v| Ok(SqlValue::Custom(Arc::clone(v))),
        Null => |_null| Ok(SqlValue::Null),
        () => |_unit| Ok(SqlValue::Null),
    );
    Err(BuildError::UnsupportedLiteral(type_name))
}
