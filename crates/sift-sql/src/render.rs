//! SQL text rendering.
//!
//! Statements render to SQL text plus the ordered list of values bound to its placeholders.
//! `Display` renders the same text with values inlined as literals, for diagnostics.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    expr::{Expr, SqlValue},
    statement::{Join, Select, Statement, TableSource},
};

/// Placeholder style for bound values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Placeholder {
    /// Numbered placeholders (`$1`, `$2`, ...), as used by PostgreSQL.
    #[default]
    Dollar,
    /// Positional placeholders (`?`), as used by SQLite and MySQL.
    Question,
}

impl FromStr for Placeholder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dollar" | "$" => Ok(Self::Dollar),
            "question" | "?" => Ok(Self::Question),
            _ => Err(format!(
                "unknown placeholder style '{s}' (expected dollar or question)"
            )),
        }
    }
}

/// SQL text and the values bound to its placeholders, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedSql {
    /// SQL text.
    pub sql: String,
    /// Bound values; the n-th placeholder binds `params[n - 1]`.
    pub params: Vec<SqlValue>,
}

/// How values are written.
#[derive(Debug, Clone, Copy)]
enum ValueMode {
    /// Bind each value to a placeholder; numbering starts after `offset`.
    Bind {
        /// Placeholder style.
        placeholder: Placeholder,
        /// Number of placeholders already used by the enclosing statement.
        offset: usize,
    },
    /// Write values as SQL literals.
    Inline,
}

/// Accumulates SQL text and bound values.
struct SqlWriter {
    /// SQL text written so far.
    sql: String,
    /// Values bound so far.
    params: Vec<SqlValue>,
    /// How values are written.
    mode: ValueMode,
}

impl SqlWriter {
    /// Creates an empty writer.
    fn new(mode: ValueMode) -> Self {
        Self {
            sql: String::new(),
            params: Vec::new(),
            mode,
        }
    }

    /// Consumes the writer.
    fn finish(self) -> RenderedSql {
        RenderedSql {
            sql: self.sql,
            params: self.params,
        }
    }

    /// Appends raw SQL text.
    fn push(&mut self, text: &str) {
        self.sql.push_str(text);
    }

    /// Appends a value as a placeholder or literal.
    fn push_value(&mut self, value: &SqlValue) {
        match self.mode {
            ValueMode::Bind {
                placeholder: Placeholder::Dollar,
                offset,
            } => {
                self.params.push(value.clone());
                let index = offset + self.params.len();
                self.sql.push_str(&format!("${index}"));
            }
            ValueMode::Bind {
                placeholder: Placeholder::Question,
                ..
            } => {
                self.params.push(value.clone());
                self.sql.push('?');
            }
            ValueMode::Inline => self.sql.push_str(&value.to_string()),
        }
    }

    /// Writes a statement.
    fn write_statement(&mut self, statement: &Statement) {
        for (i, select) in statement.selects().iter().enumerate() {
            if i > 0 {
                self.push(" UNION ");
            }
            self.write_select(select);
        }
    }

    /// Writes a single select.
    fn write_select(&mut self, select: &Select) {
        self.push("SELECT ");
        if select.columns.is_empty() {
            if select.joins.is_empty() {
                self.push("*");
            } else {
                // Joined sources must not widen the projection.
                let star = format!("{}.*", select.from.reference_name());
                self.push(&star);
            }
        } else {
            let columns: Vec<String> = select.columns.iter().map(ToString::to_string).collect();
            self.push(&columns.join(", "));
        }

        self.push(" FROM ");
        self.write_source(&select.from);

        for join in &select.joins {
            self.write_join(join);
        }

        if let Some(filter) = &select.filter {
            self.push(" WHERE ");
            self.write_expr(filter);
        }
    }

    /// Writes a table or derived table.
    fn write_source(&mut self, source: &TableSource) {
        match source {
            TableSource::Table { name, alias } => {
                self.push(name);
                if let Some(alias) = alias {
                    self.push(" AS ");
                    self.push(alias);
                }
            }
            TableSource::Derived { query, alias } => {
                self.push("(");
                self.write_statement(query);
                self.push(") AS ");
                self.push(alias);
            }
        }
    }

    /// Writes a join clause.
    fn write_join(&mut self, join: &Join) {
        self.push(" ");
        self.push(join.kind.as_sql());
        self.push(" ");
        self.write_source(&join.source);
        self.push(" ON ");
        self.write_expr(&join.on);
    }

    /// Writes an expression.
    fn write_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(true) => self.push("TRUE"),
            Expr::Literal(false) => self.push("FALSE"),
            Expr::Column(column) => self.push(&column.to_string()),
            Expr::CastText(inner) => {
                self.push("CAST(");
                self.write_expr(inner);
                self.push(" AS TEXT)");
            }
            Expr::Value(value) => self.push_value(value),
            Expr::Compare { left, op, right } => {
                self.write_expr(left);
                self.push(" ");
                self.push(op.as_sql());
                self.push(" ");
                self.write_expr(right);
            }
            Expr::Like {
                expr,
                pattern,
                negated,
            } => {
                self.write_expr(expr);
                self.push(if *negated { " NOT LIKE " } else { " LIKE " });
                self.push_value(&SqlValue::Text(pattern.clone()));
                self.push(" ESCAPE '\\'");
            }
            Expr::InList {
                expr,
                values,
                negated,
            } => {
                self.write_expr(expr);
                self.push(if *negated { " NOT IN (" } else { " IN (" });
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.push_value(value);
                }
                self.push(")");
            }
            Expr::IsNull { expr, negated } => {
                self.write_expr(expr);
                self.push(if *negated { " IS NOT NULL" } else { " IS NULL" });
            }
            Expr::And(exprs) => self.write_junction(exprs, " AND "),
            Expr::Or(exprs) => self.write_junction(exprs, " OR "),
            Expr::Not(inner) => {
                self.push("NOT (");
                self.write_expr(inner);
                self.push(")");
            }
        }
    }

    /// Writes operands separated by `AND`/`OR`, parenthesizing nested junctions.
    fn write_junction(&mut self, exprs: &[Expr], separator: &str) {
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                self.push(separator);
            }
            if matches!(expr, Expr::And(_) | Expr::Or(_)) {
                self.push("(");
                self.write_expr(expr);
                self.push(")");
            } else {
                self.write_expr(expr);
            }
        }
    }
}

impl Statement {
    /// Renders the statement with bound values.
    pub fn to_sql(&self, placeholder: Placeholder) -> RenderedSql {
        self.to_sql_with_offset(placeholder, 0)
    }

    /// Renders the statement with numbered placeholders starting after `offset`.
    ///
    /// Useful when the statement is embedded in SQL that already uses placeholders.
    pub fn to_sql_with_offset(&self, placeholder: Placeholder, offset: usize) -> RenderedSql {
        let mut writer = SqlWriter::new(ValueMode::Bind {
            placeholder,
            offset,
        });
        writer.write_statement(self);
        writer.finish()
    }
}

impl Expr {
    /// Renders the expression with bound values.
    pub fn to_sql(&self, placeholder: Placeholder) -> RenderedSql {
        let mut writer = SqlWriter::new(ValueMode::Bind {
            placeholder,
            offset: 0,
        });
        writer.write_expr(self);
        writer.finish()
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut writer = SqlWriter::new(ValueMode::Inline);
        writer.write_statement(self);
        f.write_str(&writer.sql)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut writer = SqlWriter::new(ValueMode::Inline);
        writer.write_expr(self);
        f.write_str(&writer.sql)
    }
}
