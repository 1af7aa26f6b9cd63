//! Boolean and scalar SQL expressions.

use std::fmt;

use serde::Serialize;

/// A value bound to a statement parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    /// Text value.
    Text(String),
    /// Integer value.
    Integer(i64),
    /// Boolean value.
    Bool(bool),
}

impl fmt::Display for SqlValue {
    /// Formats the value as an inline SQL literal.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "'{}'", text.replace('\'', "''")),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Bool(true) => write!(f, "TRUE"),
            Self::Bool(false) => write!(f, "FALSE"),
        }
    }
}

/// A column, optionally qualified by its table or alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ColumnRef {
    /// Table name or alias.
    pub table: Option<String>,
    /// Column name.
    pub column: String,
}

impl ColumnRef {
    /// Creates a table-qualified column reference.
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            column: column.into(),
        }
    }

    /// Creates an unqualified column reference.
    pub fn bare(column: impl Into<String>) -> Self {
        Self {
            table: None,
            column: column.into(),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.table {
            Some(table) => write!(f, "{table}.{}", self.column),
            None => write!(f, "{}", self.column),
        }
    }
}

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `=`
    Eq,
    /// `<>`
    NotEq,
}

impl CompareOp {
    /// Returns the SQL spelling of the operator.
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "<>",
        }
    }
}

/// A SQL expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// `TRUE` or `FALSE`.
    Literal(bool),

    /// A column reference.
    Column(ColumnRef),

    /// `CAST(expr AS TEXT)`.
    CastText(Box<Self>),

    /// A bound parameter.
    Value(SqlValue),

    /// Binary comparison.
    Compare {
        /// Left operand.
        left: Box<Self>,
        /// Operator.
        op: CompareOp,
        /// Right operand.
        right: Box<Self>,
    },

    /// `expr [NOT] LIKE pattern ESCAPE '\'`.
    Like {
        /// Matched operand.
        expr: Box<Self>,
        /// Pattern, bound as a parameter.
        pattern: String,
        /// True for `NOT LIKE`.
        negated: bool,
    },

    /// `expr [NOT] IN (values...)`.
    InList {
        /// Matched operand.
        expr: Box<Self>,
        /// Values, each bound as a parameter.
        values: Vec<SqlValue>,
        /// True for `NOT IN`.
        negated: bool,
    },

    /// `expr IS [NOT] NULL`.
    IsNull {
        /// Tested operand.
        expr: Box<Self>,
        /// True for `IS NOT NULL`.
        negated: bool,
    },

    /// Conjunction.
    And(Vec<Self>),

    /// Disjunction.
    Or(Vec<Self>),

    /// `NOT (expr)`.
    Not(Box<Self>),
}

impl Expr {
    /// The always-true predicate.
    pub const TRUE: Self = Self::Literal(true);

    /// The always-false predicate.
    pub const FALSE: Self = Self::Literal(false);

    /// Creates a column expression.
    pub fn column(column: ColumnRef) -> Self {
        Self::Column(column)
    }

    /// Creates a bound text value.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Value(SqlValue::Text(value.into()))
    }

    /// Creates a bound value.
    pub fn value(value: SqlValue) -> Self {
        Self::Value(value)
    }

    /// Wraps the expression in `CAST(... AS TEXT)`.
    pub fn cast_text(self) -> Self {
        Self::CastText(Box::new(self))
    }

    /// `self = other`.
    pub fn equals(self, other: Self) -> Self {
        Self::Compare {
            left: Box::new(self),
            op: CompareOp::Eq,
            right: Box::new(other),
        }
    }

    /// `self LIKE 'prefix%'`, with LIKE wildcards in `prefix` escaped.
    pub fn starts_with(self, prefix: &str) -> Self {
        Self::Like {
            expr: Box::new(self),
            pattern: format!("{}%", escape_like(prefix)),
            negated: false,
        }
    }

    /// `self IN (values...)`.
    pub fn in_list(self, values: Vec<SqlValue>) -> Self {
        Self::InList {
            expr: Box::new(self),
            values,
            negated: false,
        }
    }

    /// `self IS NULL`.
    pub fn is_null(self) -> Self {
        Self::IsNull {
            expr: Box::new(self),
            negated: false,
        }
    }

    /// Combines predicates with AND.
    ///
    /// Nested conjunctions are flattened and `TRUE` operands dropped. An empty conjunction
    /// is `TRUE`. `FALSE` operands are kept so the unsatisfiable term stays visible.
    pub fn and(exprs: impl IntoIterator<Item = Self>) -> Self {
        let mut flattened: Vec<Self> = Vec::new();
        for expr in exprs {
            match expr {
                Self::And(inner) => flattened.extend(inner),
                Self::Literal(true) => {}
                other => flattened.push(other),
            }
        }

        match flattened.len() {
            0 => Self::TRUE,
            1 => flattened.remove(0),
            _ => Self::And(flattened),
        }
    }

    /// Combines predicates with OR.
    ///
    /// Nested disjunctions are flattened and `FALSE` operands dropped. An empty disjunction
    /// is `FALSE`.
    pub fn or(exprs: impl IntoIterator<Item = Self>) -> Self {
        let mut flattened: Vec<Self> = Vec::new();
        for expr in exprs {
            match expr {
                Self::Or(inner) => flattened.extend(inner),
                Self::Literal(false) => {}
                other => flattened.push(other),
            }
        }

        match flattened.len() {
            0 => Self::FALSE,
            1 => flattened.remove(0),
            _ => Self::Or(flattened),
        }
    }

    /// Returns the logical negation.
    ///
    /// Comparison-like nodes flip their operator (`=` to `<>`, `LIKE` to `NOT LIKE`, `IN` to
    /// `NOT IN`, `IS NULL` to `IS NOT NULL`); literals flip their value; anything else is
    /// wrapped in `NOT (...)`.
    pub fn negate(self) -> Self {
        match self {
            Self::Literal(value) => Self::Literal(!value),
            Self::Compare { left, op, right } => Self::Compare {
                left,
                op: match op {
                    CompareOp::Eq => CompareOp::NotEq,
                    CompareOp::NotEq => CompareOp::Eq,
                },
                right,
            },
            Self::Like {
                expr,
                pattern,
                negated,
            } => Self::Like {
                expr,
                pattern,
                negated: !negated,
            },
            Self::InList {
                expr,
                values,
                negated,
            } => Self::InList {
                expr,
                values,
                negated: !negated,
            },
            Self::IsNull { expr, negated } => Self::IsNull {
                expr,
                negated: !negated,
            },
            Self::Not(inner) => *inner,
            other => Self::Not(Box::new(other)),
        }
    }
}

/// Escapes the LIKE wildcards `%` and `_`, and the escape character `\` itself.
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
