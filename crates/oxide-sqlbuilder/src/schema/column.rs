//! Column configurations and bound columns.

use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::subquery::Subquery;
use super::table::Table;
use crate::builder::{Builder, Render};
use crate::error::{BuildError, Result};
use crate::expr::Expr;
use crate::literal::LiteralKind;
use crate::value::{SqlValue, ToSqlValue};

/// The declared type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Integer.
    Int,
    /// Text.
    String,
    /// Date and time.
    Date,
    /// Floating point.
    Float,
    /// Boolean.
    Bool,
    /// Binary.
    Bytes,
}

impl ColumnType {
    /// Returns true when a value of `kind` can be stored in this type.
    ///
    /// `Null` is not decided here; see [`ColumnConfig::accepts`].
    #[must_use]
    pub const fn accepts(self, kind: LiteralKind) -> bool {
        match kind {
            LiteralKind::Custom => true,
            LiteralKind::Null => false,
            LiteralKind::Int64 => matches!(self, Self::Int | Self::Float),
            LiteralKind::Float64 => matches!(self, Self::Float),
            LiteralKind::String => matches!(self, Self::String | Self::Date | Self::Bytes),
            LiteralKind::Timestamp => matches!(self, Self::Date),
            LiteralKind::Bool => matches!(self, Self::Bool),
            LiteralKind::Bytes => matches!(self, Self::Bytes),
        }
    }
}

/// A per-column constraint. The declaration order is the output order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ColumnOption {
    /// PRIMARY KEY.
    PrimaryKey,
    /// Auto-increment (keyword or type substitution, per dialect).
    AutoIncrement,
    /// NOT NULL.
    NotNull,
    /// UNIQUE.
    Unique,
}

/// A column definition that is not attached to any table yet.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnConfig {
    name: String,
    ty: ColumnType,
    options: BTreeSet<ColumnOption>,
    size: Option<u32>,
    sql_type: Option<String>,
    default: Option<SqlValue>,
}

impl ColumnConfig {
    /// Creates a column definition with no options.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        Self {
            name: name.into(),
            ty,
            options: BTreeSet::new(),
            size: None,
            sql_type: None,
            default: None,
        }
    }

    /// Marks the column as PRIMARY KEY.
    #[must_use]
    pub fn primary_key(self) -> Self {
        self.option(ColumnOption::PrimaryKey)
    }

    /// Marks the column as NOT NULL.
    #[must_use]
    pub fn not_null(self) -> Self {
        self.option(ColumnOption::NotNull)
    }

    /// Marks the column as UNIQUE.
    #[must_use]
    pub fn unique(self) -> Self {
        self.option(ColumnOption::Unique)
    }

    /// Marks the column as auto-incrementing.
    #[must_use]
    pub fn auto_increment(self) -> Self {
        self.option(ColumnOption::AutoIncrement)
    }

    /// Adds an option.
    #[must_use]
    pub fn option(mut self, option: ColumnOption) -> Self {
        self.options.insert(option);
        self
    }

    /// Sets the size, e.g. the width of a `VARCHAR`.
    #[must_use]
    pub const fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    /// Overrides the SQL type name for every dialect.
    #[must_use]
    pub fn sql_type(mut self, sql_type: impl Into<String>) -> Self {
        self.sql_type = Some(sql_type.into());
        self
    }

    /// Sets the DEFAULT value, rendered inline.
    #[must_use]
    pub fn default<T: ToSqlValue>(mut self, value: T) -> Self {
        self.default = Some(value.to_sql_value());
        self
    }

    /// Returns the column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn renamed(&self, name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..self.clone()
        }
    }

    /// Returns the declared type.
    #[must_use]
    pub const fn column_type(&self) -> ColumnType {
        self.ty
    }

    /// Returns the options in output order.
    pub fn options(&self) -> impl Iterator<Item = ColumnOption> + '_ {
        self.options.iter().copied()
    }

    /// Returns true when `option` is set.
    #[must_use]
    pub fn has_option(&self, option: ColumnOption) -> bool {
        self.options.contains(&option)
    }

    /// Returns the declared size.
    #[must_use]
    pub const fn declared_size(&self) -> Option<u32> {
        self.size
    }

    /// Returns the SQL type override.
    #[must_use]
    pub fn declared_sql_type(&self) -> Option<&str> {
        self.sql_type.as_deref()
    }

    /// Returns the DEFAULT value.
    #[must_use]
    pub const fn default_value(&self) -> Option<&SqlValue> {
        self.default.as_ref()
    }

    /// Returns true when a value of `kind` may be written to this column.
    #[must_use]
    pub fn accepts(&self, kind: LiteralKind) -> bool {
        match kind {
            LiteralKind::Null => !self.has_option(ColumnOption::NotNull),
            other => self.ty.accepts(other),
        }
    }

    /// Checks that `value` may be written to this column.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::IncompatibleType`] unless `value` fits.
    pub fn check_value(&self, value: &SqlValue) -> Result<()> {
        let kind = value.kind();
        if self.accepts(kind) {
            Ok(())
        } else {
            Err(BuildError::IncompatibleType {
                column: self.name.clone(),
                kind,
            })
        }
    }

    /// Writes `"name" TYPE [options] [DEFAULT value]`.
    pub(crate) fn render_definition(&self, b: &mut Builder<'_>) {
        b.append_identifier(&self.name);
        b.append(" ");
        b.append_result(b.dialect().column_type_to_string(self));
        for option in self.options() {
            match b.dialect().column_option_to_string(option) {
                Ok(keyword) if keyword.is_empty() => {}
                Ok(keyword) => {
                    b.append(" ");
                    b.append(&keyword);
                }
                Err(e) => b.set_error(e),
            }
        }
        if let Some(default) = &self.default {
            b.append(" DEFAULT ");
            b.append_result(default.checked_inline());
        }
    }
}

/// Creates an INTEGER column definition.
#[must_use]
pub fn int_column(name: impl Into<String>) -> ColumnConfig {
    ColumnConfig::new(name, ColumnType::Int)
}

/// Creates a TEXT/VARCHAR column definition.
#[must_use]
pub fn string_column(name: impl Into<String>) -> ColumnConfig {
    ColumnConfig::new(name, ColumnType::String)
}

/// Creates a date/time column definition.
#[must_use]
pub fn date_column(name: impl Into<String>) -> ColumnConfig {
    ColumnConfig::new(name, ColumnType::Date)
}

/// Creates a floating point column definition.
#[must_use]
pub fn float_column(name: impl Into<String>) -> ColumnConfig {
    ColumnConfig::new(name, ColumnType::Float)
}

/// Creates a BOOLEAN column definition.
#[must_use]
pub fn bool_column(name: impl Into<String>) -> ColumnConfig {
    ColumnConfig::new(name, ColumnType::Bool)
}

/// Creates a binary column definition.
#[must_use]
pub fn bytes_column(name: impl Into<String>) -> ColumnConfig {
    ColumnConfig::new(name, ColumnType::Bytes)
}

#[derive(Clone)]
enum Owner {
    Table(Table),
    Subquery(Rc<Subquery>),
}

impl Owner {
    fn name(&self) -> String {
        match self {
            Self::Table(t) => t.name(),
            Self::Subquery(s) => s.alias().to_string(),
        }
    }

    fn is_same(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Table(a), Self::Table(b)) => a.is_same(b),
            (Self::Subquery(a), Self::Subquery(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// A column bound to its owning table or subquery.
///
/// Two `Column`s are the same column only when they share both the owner
/// handle and the configuration instance; equal names are not enough.
#[derive(Clone)]
pub struct Column {
    owner: Owner,
    config: Rc<ColumnConfig>,
}

impl Column {
    pub(crate) const fn bind(table: Table, config: Rc<ColumnConfig>) -> Self {
        Self {
            owner: Owner::Table(table),
            config,
        }
    }

    pub(crate) const fn bind_derived(subquery: Rc<Subquery>, config: Rc<ColumnConfig>) -> Self {
        Self {
            owner: Owner::Subquery(subquery),
            config,
        }
    }

    /// Returns the column name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.config.name()
    }

    /// Returns the column definition.
    #[must_use]
    pub fn config(&self) -> &ColumnConfig {
        &self.config
    }

    pub(crate) const fn config_rc(&self) -> &Rc<ColumnConfig> {
        &self.config
    }

    /// Returns the owning table, or `None` for a subquery column.
    #[must_use]
    pub const fn table(&self) -> Option<&Table> {
        match &self.owner {
            Owner::Table(t) => Some(t),
            Owner::Subquery(_) => None,
        }
    }

    /// Returns the owning subquery, if any.
    #[must_use]
    pub fn subquery(&self) -> Option<&Subquery> {
        match &self.owner {
            Owner::Subquery(s) => Some(s.as_ref()),
            Owner::Table(_) => None,
        }
    }

    /// Returns true when both handles denote the same column.
    #[must_use]
    pub fn is_same(&self, other: &Self) -> bool {
        self.owner.is_same(&other.owner) && Rc::ptr_eq(&self.config, &other.config)
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Column({}.{})", self.owner.name(), self.name())
    }
}

impl Render for Column {
    fn render(&self, b: &mut Builder<'_>) {
        b.append_identifier(&self.owner.name());
        b.append(".");
        b.append_identifier(self.name());
    }
}

/// An expression renamed with `AS`.
///
/// Renders as the quoted alias, except in a SELECT column list where the
/// statement writes `<source> AS <alias>`.
#[derive(Debug, Clone)]
pub struct AliasColumn {
    source: Box<Result<Expr>>,
    alias: String,
}

impl AliasColumn {
    pub(crate) fn new(source: Result<Expr>, alias: impl Into<String>) -> Self {
        Self {
            source: Box::new(source),
            alias: alias.into(),
        }
    }

    /// Returns the alias.
    #[must_use]
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Returns the aliased expression.
    ///
    /// # Errors
    ///
    /// Returns the lookup error the source carried when it was built.
    pub fn source(&self) -> std::result::Result<&Expr, &BuildError> {
        (*self.source).as_ref()
    }

    pub(crate) fn render_projection(&self, b: &mut Builder<'_>) {
        b.append_item(&*self.source);
        b.append(" AS ");
        b.append_identifier(&self.alias);
    }
}

impl Render for AliasColumn {
    fn render(&self, b: &mut Builder<'_>) {
        if let Err(e) = &*self.source {
            b.set_error(e.clone());
            return;
        }
        b.append_identifier(&self.alias);
    }
}
