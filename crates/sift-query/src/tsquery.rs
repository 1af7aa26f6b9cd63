//! Text-search backend.
//!
//! Renders a query AST in PostgreSQL `tsquery` operator syntax: `&` (AND), `|` (OR),
//! `!` (NOT), `<->` (followed-by) and `:*` (prefix).

use std::mem;

use crate::{ast::Node, error::ParseError, parser::parse};

/// Result of rendering one node.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Rendered {
    /// A tsquery fragment, and whether it is a single operand.
    Text {
        /// The fragment.
        text: String,
        /// True when the fragment is one lexeme (no operators at its top level).
        atomic: bool,
    },
    /// The node places no constraint.
    Everything,
    /// The node can never match.
    Nothing,
}

impl Rendered {
    /// Creates a single-operand fragment.
    fn atom(text: String) -> Self {
        Self::Text { text, atomic: true }
    }

    /// Creates a fragment with operators at its top level.
    fn compound(text: String) -> Self {
        Self::Text {
            text,
            atomic: false,
        }
    }

    /// Joins lexemes with the followed-by operator.
    fn followed_by(parts: Vec<String>) -> Self {
        if parts.len() == 1 {
            Self::atom(parts.into_iter().collect())
        } else {
            Self::compound(parts.join(" <-> "))
        }
    }
}

/// Outcome of rendering a query for text search.
///
/// PostgreSQL has no tsquery literal for "everything" or "nothing", so queries that place
/// no constraint, or can never match, are reported as such instead of as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSearch {
    /// A tsquery expression.
    Query(String),
    /// The query places no constraint; every document matches.
    Everything,
    /// The query can never match.
    Nothing,
}

impl TextSearch {
    /// Returns the tsquery expression, if the query renders to one.
    pub fn tsquery(&self) -> Option<&str> {
        match self {
            Self::Query(text) => Some(text),
            Self::Everything | Self::Nothing => None,
        }
    }
}

/// Renders query trees as tsquery expressions.
///
/// The visitor holds no state; one instance can be shared freely across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct TsQueryVisitor;

impl TsQueryVisitor {
    /// Creates a visitor.
    pub fn new() -> Self {
        Self
    }

    /// Renders a node for text search.
    pub fn visit(&self, node: &Node) -> TextSearch {
        match self.render(node) {
            Rendered::Text { text, .. } => TextSearch::Query(text),
            Rendered::Everything => TextSearch::Everything,
            Rendered::Nothing => TextSearch::Nothing,
        }
    }

    /// Renders a node.
    fn render(&self, node: &Node) -> Rendered {
        match node {
            Node::Word(text) => Rendered::followed_by(word_lexemes(text)),
            Node::PrefixWord(text) => {
                let mut lexemes = word_lexemes(text);
                if let Some(last) = lexemes.last_mut() {
                    last.push_str(":*");
                }
                Rendered::followed_by(lexemes)
            }
            Node::Phrase(words) => self.render_phrase(words),
            Node::ValueGroup(values) => self.render_value_group(values),
            Node::KvTerm { key, value } => self.render_kv(key, value),
            Node::Negation(term) => self.render_negation(term),
            Node::Group(query) => match self.render(query) {
                Rendered::Text { text, .. } => Rendered::atom(format!("({text})")),
                other => other,
            },
            Node::AndExpression(terms) => self.render_and(terms),
            Node::Query(ands) => self.render_query(ands),
        }
    }

    /// Renders a phrase as its words joined by `<->`.
    fn render_phrase(&self, words: &[Node]) -> Rendered {
        let parts: Vec<String> = words
            .iter()
            .filter_map(|word| match self.render(word) {
                Rendered::Text { text, .. } => Some(text),
                _ => None,
            })
            .collect();
        if parts.is_empty() {
            return Rendered::Everything;
        }
        Rendered::followed_by(parts)
    }

    /// Renders a value group as a parenthesized alternation.
    fn render_value_group(&self, values: &[Node]) -> Rendered {
        let parts: Vec<String> = values
            .iter()
            .filter_map(|value| match self.render(value) {
                Rendered::Text { text, .. } => Some(text),
                _ => None,
            })
            .collect();
        if parts.is_empty() {
            return Rendered::Nothing;
        }
        Rendered::atom(format!("({})", parts.join(" | ")))
    }

    /// Renders `key:value` as the key followed by the value.
    fn render_kv(&self, key: &Node, value: &Node) -> Rendered {
        let key = match key {
            Node::Word(text) => key_tokens(text).join(" <-> "),
            other => match self.render(other) {
                Rendered::Text { text, .. } => text,
                Rendered::Everything | Rendered::Nothing => String::new(),
            },
        };
        match self.render(value) {
            Rendered::Text { text, .. } if !key.is_empty() => {
                Rendered::compound(format!("{key} <-> {text}"))
            }
            Rendered::Text { text, atomic } => Rendered::Text { text, atomic },
            other => other,
        }
    }

    /// Renders a negation.
    ///
    /// `!` binds to a single operand, so phrases, key/value terms and any operand spanning
    /// several lexemes are parenthesized.
    fn render_negation(&self, term: &Node) -> Rendered {
        let force_parens = matches!(term, Node::Phrase(_) | Node::KvTerm { .. });
        match self.render(term) {
            Rendered::Text { text, atomic: true } if !force_parens => {
                Rendered::atom(format!("!{text}"))
            }
            Rendered::Text { text, .. } => Rendered::atom(format!("!({text})")),
            Rendered::Everything => Rendered::Nothing,
            Rendered::Nothing => Rendered::Everything,
        }
    }

    /// Renders an and-expression as its terms joined by `&`.
    fn render_and(&self, terms: &[Node]) -> Rendered {
        let mut parts = Vec::with_capacity(terms.len());
        for term in terms {
            match self.render(term) {
                Rendered::Text { text, .. } => parts.push(text),
                Rendered::Everything => {}
                Rendered::Nothing => return Rendered::Nothing,
            }
        }
        match parts.len() {
            0 => Rendered::Everything,
            1 => Rendered::compound(parts.into_iter().collect()),
            _ => Rendered::compound(parts.join(" & ")),
        }
    }

    /// Renders a query as its and-expressions joined by `|`.
    fn render_query(&self, ands: &[Node]) -> Rendered {
        let mut parts = Vec::with_capacity(ands.len());
        for and in ands {
            match self.render(and) {
                Rendered::Text { text, .. } => parts.push(text),
                Rendered::Everything => return Rendered::Everything,
                Rendered::Nothing => {}
            }
        }
        if parts.is_empty() {
            // An empty query constrains nothing; a query whose branches all fail matches nothing.
            return if ands.is_empty() {
                Rendered::Everything
            } else {
                Rendered::Nothing
            };
        }
        Rendered::compound(parts.join(" | "))
    }
}

/// Splits a word into tsquery lexemes.
///
/// Underscores separate sub-words, which the text-search parser would otherwise split on
/// its own; `'` is replaced by `"` so it cannot terminate a quoted tsquery literal.
fn word_lexemes(text: &str) -> Vec<String> {
    let escaped = text.replace('\'', "\"");
    let parts: Vec<String> = escaped
        .split('_')
        .filter(|part| !part.is_empty())
        .map(String::from)
        .collect();
    if parts.is_empty() {
        vec![escaped]
    } else {
        parts
    }
}

/// Splits a field key into lowercase lexemes.
///
/// Both `_` and lower-to-upper case transitions separate words, so `product_tag`,
/// `productTag` and `ProductTag` all yield `["product", "tag"]`.
pub fn key_tokens(key: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for ch in key.replace('\'', "\"").chars() {
        if ch == '_' {
            if !current.is_empty() {
                tokens.push(mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower && !current.is_empty() {
            tokens.push(mem::take(&mut current));
        }
        prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        current.extend(ch.to_lowercase());
    }

    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Parses a query string and renders it for text search.
pub fn compile_to_text_search(input: &str) -> Result<TextSearch, ParseError> {
    let query = parse(input)?;
    Ok(TsQueryVisitor::new().visit(&query))
}
