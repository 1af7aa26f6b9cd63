//! Clause generators for common column kinds.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sift_query::Node;

use crate::{
    clause::ClauseGenerator,
    expr::{ColumnRef, Expr, SqlValue},
};

/// How values are matched against a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Free text: exact equality, prefix match via `LIKE`.
    #[default]
    Text,
    /// Keys and codes: integer equality when the value is numeric, text match otherwise.
    Identifier,
    /// Truth values: `yes`, `y`, `true`, `1` and `no`, `n`, `false`, `0`.
    Boolean,
    /// Dates and timestamps, matched on their text form (`2024-05` matches May 2024).
    Date,
}

impl ColumnKind {
    /// All kinds, in declaration order.
    pub const ALL: [Self; 4] = [Self::Text, Self::Identifier, Self::Boolean, Self::Date];

    /// Returns the configuration name of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Identifier => "identifier",
            Self::Boolean => "boolean",
            Self::Date => "date",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|kind| kind.as_str()).collect();
                format!("unknown column kind '{s}' (expected {})", known.join(", "))
            })
    }
}

/// Coerces a query word to a boolean.
///
/// Matching is case-insensitive. Words that are neither truthy nor falsy yield `None`.
pub fn coerce_bool(word: &str) -> Option<bool> {
    match word.to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Some(true),
        "no" | "n" | "false" | "0" => Some(false),
        _ => None,
    }
}

/// Generates predicates for one column according to its [`ColumnKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnClause {
    /// Matched column.
    column: ColumnRef,
    /// Matching rules.
    kind: ColumnKind,
}

impl ColumnClause {
    /// Creates a generator for `column`.
    pub fn new(column: ColumnRef, kind: ColumnKind) -> Self {
        Self { column, kind }
    }

    /// The matched column.
    pub fn column(&self) -> &ColumnRef {
        &self.column
    }

    /// The column kind.
    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    /// The column as an expression.
    fn expr(&self) -> Expr {
        Expr::column(self.column.clone())
    }

    /// The column's text form, for kinds that are not stored as text.
    fn text_expr(&self) -> Expr {
        match self.kind {
            ColumnKind::Identifier | ColumnKind::Date => self.expr().cast_text(),
            ColumnKind::Text | ColumnKind::Boolean => self.expr(),
        }
    }

    /// Predicate for an exact word.
    fn exact(&self, word: &str) -> Option<Expr> {
        match self.kind {
            ColumnKind::Text => Some(self.expr().equals(Expr::text(word))),
            ColumnKind::Identifier => Some(match word.parse::<i64>() {
                Ok(number) => self.expr().equals(Expr::value(SqlValue::Integer(number))),
                Err(_) => self.text_expr().equals(Expr::text(word)),
            }),
            ColumnKind::Boolean => {
                coerce_bool(word).map(|value| self.expr().equals(Expr::value(SqlValue::Bool(value))))
            }
            ColumnKind::Date => Some(self.text_expr().equals(Expr::text(word))),
        }
    }

    /// Predicate for a text prefix.
    fn prefix(&self, prefix: &str) -> Option<Expr> {
        match self.kind {
            ColumnKind::Boolean => None,
            _ => Some(self.text_expr().starts_with(prefix)),
        }
    }

    /// Predicate for any of several exact words.
    fn any_of(&self, words: &[&str]) -> Option<Expr> {
        let values = match self.kind {
            ColumnKind::Text | ColumnKind::Date => words
                .iter()
                .map(|word| SqlValue::Text((*word).to_string()))
                .collect(),
            ColumnKind::Identifier => {
                let numbers: Result<Vec<i64>, _> = words.iter().map(|w| w.parse::<i64>()).collect();
                match numbers {
                    Ok(numbers) => {
                        let values = numbers.into_iter().map(SqlValue::Integer).collect();
                        return Some(self.expr().in_list(values));
                    }
                    Err(_) => words
                        .iter()
                        .map(|word| SqlValue::Text((*word).to_string()))
                        .collect(),
                }
            }
            ColumnKind::Boolean => {
                let flags: Option<Vec<bool>> = words.iter().map(|w| coerce_bool(w)).collect();
                flags?.into_iter().map(SqlValue::Bool).collect()
            }
        };
        Some(self.text_expr().in_list(values))
    }
}

impl ClauseGenerator for ColumnClause {
    fn clause(&self, value: &Node) -> Option<Expr> {
        match value {
            Node::Word(word) => self.exact(word),
            Node::PrefixWord(prefix) => self.prefix(prefix),
            Node::Phrase(words) if !words.is_empty() => self.prefix(&value.phrase_text()?),
            Node::ValueGroup(values) => {
                let words: Option<Vec<&str>> = values
                    .iter()
                    .map(|value| match value {
                        Node::Word(word) => Some(word.as_str()),
                        _ => None,
                    })
                    .collect();
                match words?.as_slice() {
                    [] => None,
                    words => self.any_of(words),
                }
            }
            _ => None,
        }
    }
}
