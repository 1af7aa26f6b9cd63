//! Search-box query language for sift.
//!
//! This crate parses the small query language end users type into a search box and
//! renders it as a PostgreSQL text-search expression:
//!
//! - **Words**: `rust` - terms that must appear
//! - **Prefixes**: `stat*` - terms that start with the given text
//! - **Phrases**: `"core link"` - adjacent words, in order
//! - **Fields**: `status:active` - match a value against a specific field
//! - **Alternatives**: `status:(active|terminated)` - any of several values for one field
//! - **Negation**: `-tag:test` - the next term must NOT match
//! - **Grouping**: `(a b) | (c d)` - precedence control and top-level OR
//!
//! The relational backend lives in the `sift-sql` crate and consumes the same [`Node`] tree.
//!
//! # Example
//!
//! ```
//! use sift_query::compile_to_text_search;
//!
//! let search = compile_to_text_search("status:(active|terminated) -tag:test \"core link\"").unwrap();
//! assert_eq!(
//!     search.tsquery(),
//!     Some("status <-> (active | terminated) & !(tag <-> test) & core <-> link")
//! );
//! ```

#![warn(missing_docs)]

mod ast;
mod error;
mod lexer;
mod parser;
mod tsquery;

pub use ast::Node;
pub use error::ParseError;
pub use lexer::{Lexeme, Token, tokenize};
pub use parser::{parse, parse_lexemes};
pub use tsquery::{TextSearch, TsQueryVisitor, compile_to_text_search, key_tokens};
