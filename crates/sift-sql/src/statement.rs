//! `SELECT` statements, joins and unions.

use std::slice;

use crate::expr::{ColumnRef, Expr};

/// Something a statement selects from or joins to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSource {
    /// A named table, optionally aliased.
    Table {
        /// Table name.
        name: String,
        /// Alias, if any.
        alias: Option<String>,
    },
    /// A named derived table: `(statement) AS alias`.
    Derived {
        /// The sub-query.
        query: Box<Statement>,
        /// Alias the sub-query is referenced by.
        alias: String,
    },
}

impl TableSource {
    /// Creates an unaliased table source.
    pub fn table(name: impl Into<String>) -> Self {
        Self::Table {
            name: name.into(),
            alias: None,
        }
    }

    /// Returns the name columns of this source are qualified with.
    pub fn reference_name(&self) -> &str {
        match self {
            Self::Table {
                alias: Some(alias), ..
            } => alias,
            Self::Table { name, .. } => name,
            Self::Derived { alias, .. } => alias,
        }
    }
}

/// Join flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    /// `INNER JOIN`
    Inner,
    /// `LEFT OUTER JOIN`
    LeftOuter,
}

impl JoinKind {
    /// Returns the SQL spelling of the join.
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::LeftOuter => "LEFT OUTER JOIN",
        }
    }
}

/// A join clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    /// Join flavour.
    pub kind: JoinKind,
    /// Joined source.
    pub source: TableSource,
    /// Join condition.
    pub on: Expr,
}

/// A single `SELECT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Select {
    /// Projected columns; empty selects every column of the `FROM` source.
    pub columns: Vec<ColumnRef>,
    /// Primary source.
    pub from: TableSource,
    /// Joins, in order.
    pub joins: Vec<Join>,
    /// `WHERE` predicate.
    pub filter: Option<Expr>,
}

impl Select {
    /// Creates `SELECT * FROM table`.
    pub fn from_table(name: impl Into<String>) -> Self {
        Self::from_source(TableSource::table(name))
    }

    /// Creates `SELECT * FROM source`.
    pub fn from_source(source: TableSource) -> Self {
        Self {
            columns: Vec::new(),
            from: source,
            joins: Vec::new(),
            filter: None,
        }
    }

    /// Replaces the projected columns.
    pub fn columns(mut self, columns: impl IntoIterator<Item = ColumnRef>) -> Self {
        self.columns = columns.into_iter().collect();
        self
    }

    /// ANDs a predicate into the `WHERE` clause.
    pub fn and_where(mut self, predicate: Expr) -> Self {
        let combined = match self.filter.take() {
            Some(existing) => Expr::and([existing, predicate]),
            None => Expr::and([predicate]),
        };
        self.filter = (combined != Expr::TRUE).then_some(combined);
        self
    }

    /// Appends a join.
    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }
}

/// A complete query: one `SELECT`, or the `UNION` of several.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// A single select.
    Select(Select),
    /// Union of selects, duplicates removed.
    Union(Vec<Select>),
}

impl Statement {
    /// Returns the selects making up this statement.
    pub fn selects(&self) -> &[Select] {
        match self {
            Self::Select(select) => slice::from_ref(select),
            Self::Union(selects) => selects,
        }
    }

    /// Replaces the projected columns of every select.
    pub fn project(self, columns: &[ColumnRef]) -> Self {
        let project = |select: Select| select.columns(columns.iter().cloned());
        match self {
            Self::Select(select) => Self::Select(project(select)),
            Self::Union(selects) => Self::Union(selects.into_iter().map(project).collect()),
        }
    }
}

impl From<Select> for Statement {
    fn from(select: Select) -> Self {
        Self::Select(select)
    }
}
