//! Error type for query parsing.
//!
//! [`ParseError`] is the only error the compiler produces. Lexing is total and both backends
//! are infallible over a parsed tree, so every failure is a grammar violation found here.

use std::{error::Error, fmt};

/// Message used when a key/value term has an empty phrase or empty value group.
pub(crate) const EMPTY_KV_VALUE: &str = "Value term in KVTerm can not be empty";

/// Parse error with position information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Error message, naming the expected and the actual token where applicable.
    pub message: String,
    /// Index of the offending token in the lexeme stream.
    pub token_index: usize,
    /// Byte offset of the offending token in the query string.
    pub position: usize,
    /// The original query string, once attached.
    pub query: Option<String>,
}

impl ParseError {
    /// Creates a new parse error.
    pub fn new(message: impl Into<String>, token_index: usize, position: usize) -> Self {
        Self {
            message: message.into(),
            token_index,
            position,
            query: None,
        }
    }

    /// Sets the query string for this error.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Returns the error message without context.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns a suggestion for common errors.
    pub fn suggestion(&self) -> Option<&'static str> {
        let message = self.message.as_str();
        if message.contains("expected '\"'") {
            Some("Add a closing quote (\") to complete the phrase")
        } else if message.contains("expected ')'") {
            Some("Add a closing parenthesis ) to match the opening one")
        } else if message.contains("found ')'") {
            Some("Remove the ) or add a matching ( before it")
        } else if message == EMPTY_KV_VALUE {
            Some("Give the field a value, e.g. 'tag:urgent' or 'tag:(a|b)'")
        } else if message.contains("'|'") {
            Some("'|' requires terms on both sides, e.g. 'active | pending'")
        } else {
            None
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "query syntax error: {}", self.message)?;

        if let Some(query) = &self.query {
            let column = query
                .char_indices()
                .take_while(|&(offset, _)| offset < self.position)
                .count();
            write!(f, "\n  {query}\n  {}^", " ".repeat(column))?;
        } else {
            write!(f, " (at token {})", self.token_index)?;
        }

        if let Some(suggestion) = self.suggestion() {
            write!(f, "\nhint: {suggestion}")?;
        }

        Ok(())
    }
}

impl Error for ParseError {}
