//! Query abstract syntax tree.
//!
//! Represents a parsed query before it is rendered by one of the backends.

use std::fmt;

/// A node of the parsed query.
///
/// The parser guarantees the shape invariants documented on each variant; backends rely on
/// them but still handle every variant exhaustively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A bare term.
    Word(String),

    /// A term followed by `*`: matches values starting with the text.
    PrefixWord(String),

    /// Quoted, ordered sequence of `Word`/`PrefixWord` nodes.
    Phrase(Vec<Self>),

    /// Parenthesized `|`-separated values on the right of a key. Never empty.
    ValueGroup(Vec<Self>),

    /// Key/value term (`key:value`).
    KvTerm {
        /// The key, normally a `Word`.
        key: Box<Self>,
        /// One of `Word`, `PrefixWord`, `Phrase`, `ValueGroup`.
        value: Box<Self>,
    },

    /// Negation of exactly one positive term.
    Negation(Box<Self>),

    /// Parenthesized sub-query. Holds a `Query` node.
    Group(Box<Self>),

    /// Implicit AND over adjacent terms. Never empty inside a `Query`.
    AndExpression(Vec<Self>),

    /// `|`-separated list of `AndExpression` nodes; the root of every parse.
    Query(Vec<Self>),
}

impl Node {
    /// Creates a `Word` node.
    pub fn word(text: impl Into<String>) -> Self {
        Self::Word(text.into())
    }

    /// Creates a `PrefixWord` node.
    pub fn prefix(text: impl Into<String>) -> Self {
        Self::PrefixWord(text.into())
    }

    /// Creates a `KvTerm` node.
    pub fn kv(key: Self, value: Self) -> Self {
        Self::KvTerm {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// Creates a `Negation` node.
    pub fn not(term: Self) -> Self {
        Self::Negation(Box::new(term))
    }

    /// Creates a `Group` node around a query.
    pub fn group(query: Self) -> Self {
        Self::Group(Box::new(query))
    }

    /// Returns the literal text of a `Word` or `PrefixWord`.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Word(text) | Self::PrefixWord(text) => Some(text),
            _ => None,
        }
    }

    /// Returns true for terms that place no constraint at all.
    ///
    /// These are the empty phrase (`""`) and the group over an empty query (`()`). Both
    /// backends treat a vacuous term as always matching, and its negation as never matching.
    pub fn is_vacuous(&self) -> bool {
        match self {
            Self::Phrase(words) => words.is_empty(),
            Self::Group(query) => matches!(query.as_ref(), Self::Query(ands) if ands.is_empty()),
            _ => false,
        }
    }

    /// Joins the words of a phrase with single spaces, dropping prefix markers.
    pub fn phrase_text(&self) -> Option<String> {
        let Self::Phrase(words) = self else {
            return None;
        };
        let parts: Vec<&str> = words.iter().filter_map(Self::text).collect();
        Some(parts.join(" "))
    }

    /// Formats the node as a tree structure with the given indentation level.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Self::Word(text) => writeln!(f, "{prefix}Word({text:?})"),
            Self::PrefixWord(text) => writeln!(f, "{prefix}PrefixWord({text:?})"),
            Self::Phrase(words) => Self::fmt_children(f, &prefix, "Phrase", words, indent),
            Self::ValueGroup(values) => {
                Self::fmt_children(f, &prefix, "ValueGroup", values, indent)
            }
            Self::KvTerm { key, value } => {
                writeln!(f, "{prefix}KvTerm")?;
                key.fmt_tree(f, indent + 1)?;
                value.fmt_tree(f, indent + 1)
            }
            Self::Negation(term) => {
                writeln!(f, "{prefix}Negation")?;
                term.fmt_tree(f, indent + 1)
            }
            Self::Group(query) => {
                writeln!(f, "{prefix}Group")?;
                query.fmt_tree(f, indent + 1)
            }
            Self::AndExpression(terms) => {
                Self::fmt_children(f, &prefix, "AndExpression", terms, indent)
            }
            Self::Query(ands) => Self::fmt_children(f, &prefix, "Query", ands, indent),
        }
    }

    /// Writes a labelled node followed by its children one level deeper.
    fn fmt_children(
        f: &mut fmt::Formatter<'_>,
        prefix: &str,
        label: &str,
        children: &[Self],
        indent: usize,
    ) -> fmt::Result {
        writeln!(f, "{prefix}{label}")?;
        for child in children {
            child.fmt_tree(f, indent + 1)?;
        }
        Ok(())
    }

    /// Formats the node back into query syntax.
    ///
    /// Parsing the output yields a tree equal to `self`.
    pub fn to_query_string(&self) -> String {
        match self {
            Self::Word(text) => text.clone(),
            Self::PrefixWord(text) => format!("{text}*"),
            Self::Phrase(words) => {
                let parts: Vec<String> = words.iter().map(Self::to_query_string).collect();
                format!("\"{}\"", parts.join(" "))
            }
            Self::ValueGroup(values) => {
                let parts: Vec<String> = values.iter().map(Self::to_query_string).collect();
                format!("({})", parts.join("|"))
            }
            Self::KvTerm { key, value } => {
                format!("{}:{}", key.to_query_string(), value.to_query_string())
            }
            Self::Negation(term) => format!("-{}", term.to_query_string()),
            Self::Group(query) => format!("({})", query.to_query_string()),
            Self::AndExpression(terms) => {
                let parts: Vec<String> = terms.iter().map(Self::to_query_string).collect();
                parts.join(" ")
            }
            Self::Query(ands) => {
                let parts: Vec<String> = ands.iter().map(Self::to_query_string).collect();
                parts.join(" | ")
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}
