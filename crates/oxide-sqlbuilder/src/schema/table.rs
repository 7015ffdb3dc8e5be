//! Natural tables, joins and the handle that treats both alike.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::column::{Column, ColumnConfig};
use super::subquery::Subquery;
use crate::builder::{Builder, Render};
use crate::condition::Condition;
use crate::error::{BuildError, Result};

/// Table-level options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOption {
    #[serde(default)]
    unique: Vec<Vec<String>>,
}

impl TableOption {
    /// Creates empty table options.
    #[must_use]
    pub const fn new() -> Self {
        Self { unique: Vec::new() }
    }

    /// Adds a composite UNIQUE constraint over `columns`.
    #[must_use]
    pub fn unique<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unique
            .push(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Returns the composite UNIQUE column sets.
    #[must_use]
    pub fn unique_sets(&self) -> &[Vec<String>] {
        &self.unique
    }
}

struct TableInner {
    name: RefCell<String>,
    columns: RefCell<Vec<Rc<ColumnConfig>>>,
    options: TableOption,
}

/// A natural table: a name and an ordered column list.
///
/// `Table` is a shared handle. Cloning it yields the same table, and the
/// schema changes only through
/// [`AlterTable::apply_to_table`](crate::AlterTable::apply_to_table).
#[derive(Clone)]
pub struct Table(Rc<TableInner>);

impl Table {
    /// Creates a table from column definitions.
    ///
    /// # Errors
    ///
    /// Fails when `columns` is empty or a column name repeats.
    pub fn new<I>(name: impl Into<String>, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = ColumnConfig>,
    {
        Self::with_options(name, TableOption::new(), columns)
    }

    /// Creates a table with table-level options.
    ///
    /// # Errors
    ///
    /// Fails when `columns` is empty or a column name repeats.
    pub fn with_options<I>(name: impl Into<String>, options: TableOption, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = ColumnConfig>,
    {
        let name = name.into();
        let columns: Vec<Rc<ColumnConfig>> = columns.into_iter().map(Rc::new).collect();
        validate_columns(&name, &columns)?;
        Ok(Self(Rc::new(TableInner {
            name: RefCell::new(name),
            columns: RefCell::new(columns),
            options,
        })))
    }

    /// Returns the current table name.
    #[must_use]
    pub fn name(&self) -> String {
        self.0.name.borrow().clone()
    }

    /// Returns the table options.
    #[must_use]
    pub fn options(&self) -> &TableOption {
        &self.0.options
    }

    /// Returns the columns in declaration order.
    #[must_use]
    pub fn columns(&self) -> Vec<Column> {
        self.0
            .columns
            .borrow()
            .iter()
            .map(|cfg| Column::bind(self.clone(), Rc::clone(cfg)))
            .collect()
    }

    /// Looks up a column by name.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::ColumnNotFound`] when no column has that name.
    pub fn c(&self, name: &str) -> Result<Column> {
        self.find(name).ok_or_else(|| BuildError::ColumnNotFound {
            table: self.name(),
            column: name.to_string(),
        })
    }

    fn find(&self, name: &str) -> Option<Column> {
        self.0
            .columns
            .borrow()
            .iter()
            .find(|cfg| cfg.name() == name)
            .map(|cfg| Column::bind(self.clone(), Rc::clone(cfg)))
    }

    /// Returns true when both handles denote the same table.
    #[must_use]
    pub fn is_same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Returns true when `column` is currently one of this table's columns.
    #[must_use]
    pub fn owns(&self, column: &Column) -> bool {
        column.table().is_some_and(|t| self.is_same(t))
            && self
                .0
                .columns
                .borrow()
                .iter()
                .any(|cfg| Rc::ptr_eq(cfg, column.config_rc()))
    }

    pub(crate) fn configs(&self) -> Vec<Rc<ColumnConfig>> {
        self.0.columns.borrow().clone()
    }

    /// Replaces name and columns in one step.
    pub(crate) fn replace_schema(&self, name: String, columns: Vec<Rc<ColumnConfig>>) {
        *self.0.name.borrow_mut() = name;
        *self.0.columns.borrow_mut() = columns;
    }

    /// `self INNER JOIN right ON on`.
    #[must_use]
    pub fn inner_join(&self, right: impl Into<TableRef>, on: Condition) -> TableRef {
        TableRef::from(self).inner_join(right, on)
    }

    /// `self LEFT OUTER JOIN right ON on`.
    #[must_use]
    pub fn left_outer_join(&self, right: impl Into<TableRef>, on: Condition) -> TableRef {
        TableRef::from(self).left_outer_join(right, on)
    }

    /// `self RIGHT OUTER JOIN right ON on`.
    #[must_use]
    pub fn right_outer_join(&self, right: impl Into<TableRef>, on: Condition) -> TableRef {
        TableRef::from(self).right_outer_join(right, on)
    }

    /// `self FULL OUTER JOIN right ON on`.
    #[must_use]
    pub fn full_outer_join(&self, right: impl Into<TableRef>, on: Condition) -> TableRef {
        TableRef::from(self).full_outer_join(right, on)
    }
}

/// Checks a column list for a table named `table`.
///
/// # Errors
///
/// [`BuildError::EmptyTable`] for no columns and
/// [`BuildError::DuplicateDefinition`] when a name repeats.
pub fn validate_columns(table: &str, columns: &[Rc<ColumnConfig>]) -> Result<()> {
    if columns.is_empty() {
        return Err(BuildError::EmptyTable(table.to_string()));
    }
    let mut seen = HashSet::new();
    for cfg in columns {
        if !seen.insert(cfg.name()) {
            return Err(BuildError::DuplicateDefinition {
                table: table.to_string(),
                column: cfg.name().to_string(),
            });
        }
    }
    Ok(())
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns: Vec<String> = self
            .0
            .columns
            .borrow()
            .iter()
            .map(|cfg| cfg.name().to_string())
            .collect();
        f.debug_struct("Table")
            .field("name", &*self.0.name.borrow())
            .field("columns", &columns)
            .finish()
    }
}

impl Render for Table {
    fn render(&self, b: &mut Builder<'_>) {
        b.append_identifier(&self.0.name.borrow());
    }
}

/// Join kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKind {
    /// INNER JOIN.
    Inner,
    /// LEFT OUTER JOIN.
    LeftOuter,
    /// RIGHT OUTER JOIN.
    RightOuter,
    /// FULL OUTER JOIN.
    FullOuter,
}

impl JoinKind {
    /// Returns the SQL keyword for the join kind.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::LeftOuter => "LEFT OUTER JOIN",
            Self::RightOuter => "RIGHT OUTER JOIN",
            Self::FullOuter => "FULL OUTER JOIN",
        }
    }
}

/// Two tables combined under a join kind and an ON condition.
#[derive(Debug)]
pub struct Join {
    kind: JoinKind,
    left: TableRef,
    right: TableRef,
    on: Condition,
}

impl Join {
    /// Returns the join kind.
    #[must_use]
    pub const fn kind(&self) -> JoinKind {
        self.kind
    }

    /// Returns the left side.
    #[must_use]
    pub const fn left(&self) -> &TableRef {
        &self.left
    }

    /// Returns the right side.
    #[must_use]
    pub const fn right(&self) -> &TableRef {
        &self.right
    }

    /// Returns the ON condition.
    #[must_use]
    pub const fn on(&self) -> &Condition {
        &self.on
    }
}

/// Anything that can stand in a FROM clause: a natural table, a join or a
/// subquery.
#[derive(Debug, Clone)]
pub enum TableRef {
    /// A natural table.
    Natural(Table),
    /// A join of two table references.
    Joined(Rc<Join>),
    /// A SELECT under an alias.
    Subquery(Rc<Subquery>),
}

impl TableRef {
    /// Looks up a column by name.
    ///
    /// On a join the left side is searched, then the right side.
    ///
    /// # Errors
    ///
    /// [`BuildError::ColumnNotFound`] when no side has the column,
    /// [`BuildError::DuplicateColumn`] when both sides do.
    pub fn c(&self, name: &str) -> Result<Column> {
        self.find(name)?.ok_or_else(|| BuildError::ColumnNotFound {
            table: self.describe(),
            column: name.to_string(),
        })
    }

    fn find(&self, name: &str) -> Result<Option<Column>> {
        match self {
            Self::Natural(t) => Ok(t.find(name)),
            Self::Subquery(s) => Ok(s.find(name)),
            Self::Joined(j) => match (j.left.find(name)?, j.right.find(name)?) {
                (Some(_), Some(_)) => Err(BuildError::DuplicateColumn(name.to_string())),
                (Some(c), None) | (None, Some(c)) => Ok(Some(c)),
                (None, None) => Ok(None),
            },
        }
    }

    /// Returns every column, left side first on a join.
    #[must_use]
    pub fn columns(&self) -> Vec<Column> {
        match self {
            Self::Natural(t) => t.columns(),
            Self::Subquery(s) => s.columns(),
            Self::Joined(j) => {
                let mut columns = j.left.columns();
                columns.extend(j.right.columns());
                columns
            }
        }
    }

    /// Returns the natural table `statement` operates on.
    ///
    /// # Errors
    ///
    /// [`BuildError::JoinedTarget`] for a join and
    /// [`BuildError::SubqueryTarget`] for a subquery.
    pub const fn natural(&self, statement: &'static str) -> Result<&Table> {
        match self {
            Self::Natural(t) => Ok(t),
            Self::Joined(_) => Err(BuildError::JoinedTarget(statement)),
            Self::Subquery(_) => Err(BuildError::SubqueryTarget(statement)),
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Natural(t) => t.name(),
            Self::Subquery(s) => s.alias().to_string(),
            Self::Joined(j) => format!(
                "{} {} {}",
                j.left.describe(),
                j.kind.as_sql(),
                j.right.describe()
            ),
        }
    }

    fn join(self, kind: JoinKind, right: impl Into<Self>, on: Condition) -> Self {
        Self::Joined(Rc::new(Join {
            kind,
            left: self,
            right: right.into(),
            on,
        }))
    }

    /// `self INNER JOIN right ON on`.
    #[must_use]
    pub fn inner_join(self, right: impl Into<Self>, on: Condition) -> Self {
        self.join(JoinKind::Inner, right, on)
    }

    /// `self LEFT OUTER JOIN right ON on`.
    #[must_use]
    pub fn left_outer_join(self, right: impl Into<Self>, on: Condition) -> Self {
        self.join(JoinKind::LeftOuter, right, on)
    }

    /// `self RIGHT OUTER JOIN right ON on`.
    #[must_use]
    pub fn right_outer_join(self, right: impl Into<Self>, on: Condition) -> Self {
        self.join(JoinKind::RightOuter, right, on)
    }

    /// `self FULL OUTER JOIN right ON on`.
    #[must_use]
    pub fn full_outer_join(self, right: impl Into<Self>, on: Condition) -> Self {
        self.join(JoinKind::FullOuter, right, on)
    }
}

impl From<Table> for TableRef {
    fn from(table: Table) -> Self {
        Self::Natural(table)
    }
}

impl From<&Table> for TableRef {
    fn from(table: &Table) -> Self {
        Self::Natural(table.clone())
    }
}

impl From<&TableRef> for TableRef {
    fn from(table: &TableRef) -> Self {
        table.clone()
    }
}

impl Render for TableRef {
    fn render(&self, b: &mut Builder<'_>) {
        match self {
            Self::Natural(t) => b.append_item(t),
            Self::Subquery(s) => b.append_item(&**s),
            Self::Joined(j) => {
                if matches!(j.left, Self::Subquery(_)) || matches!(j.right, Self::Subquery(_)) {
                    return b.set_error(BuildError::SubqueryJoin);
                }
                b.append_item(&j.left);
                b.append(" ");
                b.append(j.kind.as_sql());
                b.append(" ");
                if matches!(j.right, Self::Joined(_)) {
                    b.append("( ");
                    b.append_item(&j.right);
                    b.append(" )");
                } else {
                    b.append_item(&j.right);
                }
                b.append(" ON ");
                b.append_item(&j.on);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::SqliteDialect;
    use crate::expr::ExprOps;
    use crate::schema::{int_column, string_column};

    fn render(node: &impl Render) -> Result<(String, Vec<crate::SqlValue>)> {
        let mut b = Builder::new(&SqliteDialect);
        b.append_item(node);
        b.finish()
    }

    #[test]
    fn test_table_requires_columns() {
        assert_eq!(
            Table::new("EMPTY", Vec::<ColumnConfig>::new()).unwrap_err(),
            BuildError::EmptyTable(String::from("EMPTY"))
        );
    }

    #[test]
    fn test_table_rejects_duplicate_names() {
        let err = Table::new("T", [int_column("id"), string_column("id")]).unwrap_err();
        assert_eq!(
            err,
            BuildError::DuplicateDefinition {
                table: String::from("T"),
                column: String::from("id"),
            }
        );
    }

    #[test]
    fn test_column_lookup() {
        let t = Table::new("T", [int_column("id"), string_column("name")]).unwrap();
        let id = t.c("id").unwrap();
        assert_eq!(id.name(), "id");
        assert!(id.table().is_some_and(|owner| owner.is_same(&t)));
        assert!(t.owns(&id));
        assert!(id.is_same(&t.c("id").unwrap()));
        assert_eq!(
            t.c("nope").unwrap_err(),
            BuildError::ColumnNotFound {
                table: String::from("T"),
                column: String::from("nope"),
            }
        );
    }

    #[test]
    fn test_identity_not_structural() {
        let a = Table::new("T", [int_column("id")]).unwrap();
        let b = Table::new("T", [int_column("id")]).unwrap();
        assert!(!a.is_same(&b));
        assert!(!b.owns(&a.c("id").unwrap()));
    }

    #[test]
    fn test_render_join() {
        let a = Table::new("A", [int_column("id"), int_column("b_id")]).unwrap();
        let b = Table::new("B", [int_column("id")]).unwrap();
        let joined = a.left_outer_join(&b, a.c("b_id").eq(b.c("id")));
        let (sql, args) = render(&joined).unwrap();
        assert_eq!(sql, "\"A\" LEFT OUTER JOIN \"B\" ON \"A\".\"b_id\"=\"B\".\"id\"");
        assert!(args.is_empty());
    }

    #[test]
    fn test_render_nested_right_join() {
        let a = Table::new("A", [int_column("a")]).unwrap();
        let b = Table::new("B", [int_column("b")]).unwrap();
        let c = Table::new("C", [int_column("c")]).unwrap();
        let bc = b.inner_join(&c, b.c("b").eq(c.c("c")));
        let abc = a.inner_join(bc, a.c("a").eq(1));
        let (sql, args) = render(&abc).unwrap();
        assert_eq!(
            sql,
            "\"A\" INNER JOIN ( \"B\" INNER JOIN \"C\" ON \"B\".\"b\"=\"C\".\"c\" ) ON \"A\".\"a\"=?"
        );
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn test_joined_columns_order() {
        let a = Table::new("A", [int_column("x"), int_column("y")]).unwrap();
        let b = Table::new("B", [int_column("z")]).unwrap();
        let joined = a.inner_join(&b, a.c("x").eq(b.c("z")));
        let names: Vec<String> = joined
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(names, vec!["x", "y", "z"]);
        assert!(matches!(
            joined.natural("DELETE"),
            Err(BuildError::JoinedTarget("DELETE"))
        ));
    }

    #[test]
    fn test_subquery_rejected_as_join_side() {
        let a = Table::new("A", [int_column("id")]).unwrap();
        let b = Table::new("B", [int_column("id")]).unwrap();
        let s = crate::Select::new(&b).to_subquery("s");
        let left = a.inner_join(&s, a.c("id").eq(s.c("id")));
        assert_eq!(render(&left).unwrap_err(), BuildError::SubqueryJoin);
        let right = s.clone().left_outer_join(&a, s.c("id").eq(a.c("id")));
        assert_eq!(render(&right).unwrap_err(), BuildError::SubqueryJoin);

        assert_eq!(
            left.c("id").unwrap_err(),
            BuildError::DuplicateColumn(String::from("id"))
        );
        assert_eq!(s.natural("UPDATE").unwrap_err(), BuildError::SubqueryTarget("UPDATE"));
    }
}
