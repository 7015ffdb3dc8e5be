//! A SELECT used as a table in another statement's FROM clause.

use std::fmt;
use std::rc::Rc;

use super::column::{Column, ColumnConfig, ColumnType};
use crate::builder::{Builder, Render};
use crate::error::BuildError;
use crate::expr::Expr;
use crate::statement::Select;

/// `( SELECT ... ) AS "alias"`.
///
/// The visible columns are the inner projection: plain columns keep their
/// name, aliased expressions are visible under the alias, and `*` (or an
/// empty projection) exposes every column of the inner FROM. Columns looked
/// up here render qualified by the alias.
pub struct Subquery {
    select: Select,
    alias: String,
    columns: Vec<Rc<ColumnConfig>>,
}

impl Subquery {
    pub(crate) fn new(select: Select, alias: String) -> Self {
        let columns = projected_configs(&select);
        Self {
            select,
            alias,
            columns,
        }
    }

    /// Returns the alias.
    #[must_use]
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Returns the inner SELECT.
    #[must_use]
    pub const fn select(&self) -> &Select {
        &self.select
    }

    pub(crate) fn find(self: &Rc<Self>, name: &str) -> Option<Column> {
        self.columns
            .iter()
            .find(|cfg| cfg.name() == name)
            .map(|cfg| Column::bind_derived(Rc::clone(self), Rc::clone(cfg)))
    }

    pub(crate) fn columns(self: &Rc<Self>) -> Vec<Column> {
        self.columns
            .iter()
            .map(|cfg| Column::bind_derived(Rc::clone(self), Rc::clone(cfg)))
            .collect()
    }
}

fn projected_configs(select: &Select) -> Vec<Rc<ColumnConfig>> {
    let projection = select.projection();
    let source_configs = || {
        select
            .source()
            .columns()
            .iter()
            .map(|c| Rc::clone(c.config_rc()))
            .collect::<Vec<_>>()
    };
    if projection.is_empty() {
        return source_configs();
    }
    let mut configs = vec![];
    for expr in projection {
        match expr {
            Ok(Expr::Star) => configs.extend(source_configs()),
            Ok(Expr::Column(c)) => configs.push(Rc::clone(c.config_rc())),
            Ok(Expr::Alias(a)) => {
                let config = match a.source() {
                    Ok(Expr::Column(c)) => c.config().renamed(a.alias()),
                    _ => ColumnConfig::new(a.alias(), ColumnType::String),
                };
                configs.push(Rc::new(config));
            }
            // Unnamed expressions cannot be referenced from outside.
            Ok(Expr::Func(_)) | Err(_) => {}
        }
    }
    configs
}

impl fmt::Debug for Subquery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns: Vec<&str> = self.columns.iter().map(|cfg| cfg.name()).collect();
        f.debug_struct("Subquery")
            .field("alias", &self.alias)
            .field("columns", &columns)
            .finish_non_exhaustive()
    }
}

impl Render for Subquery {
    fn render(&self, b: &mut Builder<'_>) {
        if self.alias.is_empty() {
            return b.set_error(BuildError::MissingClause("a subquery needs an alias"));
        }
        b.append("( ");
        b.append_item(&self.select);
        b.append(" ) AS ");
        b.append_identifier(&self.alias);
    }
}
