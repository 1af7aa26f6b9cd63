//! Query parser.
//!
//! Parses a lexeme stream into a query AST using recursive descent with one token of
//! lookahead.
//!
//! # Grammar
//!
//! ```text
//! query          → and_expression ("|" and_expression)*
//! and_expression → term*
//! term           → "-"? positive_term
//! positive_term  → group | value | kv_term
//! group          → "(" query ")"
//! kv_term        → value ":" (value | value_group)
//! value          → phrase | search_word
//! phrase         → '"' search_word* '"'
//! search_word    → WORD "*"?
//! value_group    → "(" value ("|" value)* ")"
//! ```
//!
//! # Precedence (highest to lowest)
//!
//! 1. Grouping: `(...)`, phrases `"..."`
//! 2. Key/value: `key:value`
//! 3. Negation: `-` (binds to exactly one term)
//! 4. AND (implicit, between adjacent terms)
//! 5. OR (`|`)

use crate::{
    ast::Node,
    error::{EMPTY_KV_VALUE, ParseError},
    lexer::{Lexeme, Token, tokenize},
};

/// Recursive descent parser for query expressions.
struct Parser {
    /// Lexeme stream to parse; always terminated by `End`.
    lexemes: Vec<Lexeme>,
    /// Current position in the lexeme stream.
    position: usize,
}

impl Parser {
    /// Creates a new parser from a lexeme stream.
    fn new(mut lexemes: Vec<Lexeme>) -> Self {
        if lexemes.last().map(|l| &l.token) != Some(&Token::End) {
            let offset = lexemes.last().map_or(0, |l| l.offset);
            lexemes.push(Lexeme {
                token: Token::End,
                offset,
            });
        }
        Self {
            lexemes,
            position: 0,
        }
    }

    /// Parses the whole stream into a `Query` node.
    fn parse(mut self) -> Result<Node, ParseError> {
        let query = self.parse_query()?;
        self.expect(&Token::End)?;
        Ok(query)
    }

    /// Parses: query → and_expression ("|" and_expression)*
    fn parse_query(&mut self) -> Result<Node, ParseError> {
        let mut ands = Vec::new();

        match self.parse_and_expression()? {
            Some(and) => ands.push(and),
            None if self.check(&Token::Or) => {
                return Err(self.error("expected term before '|'"));
            }
            None => return Ok(Node::Query(ands)),
        }

        while self.check(&Token::Or) {
            self.advance(); // consume |
            match self.parse_and_expression()? {
                Some(and) => ands.push(and),
                None => return Err(self.unexpected("term after '|'")),
            }
        }

        Ok(Node::Query(ands))
    }

    /// Parses: and_expression → term*
    ///
    /// Returns `None` when no term starts at the current token.
    fn parse_and_expression(&mut self) -> Result<Option<Node>, ParseError> {
        let mut terms = Vec::new();

        while let Some(term) = self.parse_term()? {
            terms.push(term);
        }

        if terms.is_empty() {
            Ok(None)
        } else {
            Ok(Some(Node::AndExpression(terms)))
        }
    }

    /// Parses: term → "-"? positive_term
    fn parse_term(&mut self) -> Result<Option<Node>, ParseError> {
        if !self.check(&Token::Neg) {
            return self.parse_positive_term();
        }

        self.advance(); // consume -
        match self.parse_positive_term()? {
            Some(term) => Ok(Some(Node::not(term))),
            None => Err(self.unexpected("term after '-'")),
        }
    }

    /// Parses: positive_term → group | value | kv_term
    ///
    /// Returns `None` for tokens that cannot start a term; the caller decides whether that is
    /// the end of an expression or an error.
    fn parse_positive_term(&mut self) -> Result<Option<Node>, ParseError> {
        match self.peek() {
            Token::LParen => self.parse_group().map(Some),
            Token::Word(_) | Token::Quote => {
                let value = self.parse_value()?;
                if self.check(&Token::Colon) {
                    self.advance(); // consume :
                    let kv_value = self.parse_kv_value()?;
                    return Ok(Some(Node::kv(value, kv_value)));
                }
                Ok(Some(value))
            }
            _ => Ok(None),
        }
    }

    /// Parses: group → "(" query ")"
    fn parse_group(&mut self) -> Result<Node, ParseError> {
        self.advance(); // consume (
        let query = self.parse_query()?;
        self.expect(&Token::RParen)?;
        Ok(Node::group(query))
    }

    /// Parses the right side of a key/value term: value | value_group.
    fn parse_kv_value(&mut self) -> Result<Node, ParseError> {
        let value = match self.peek() {
            Token::LParen => self.parse_value_group()?,
            Token::Word(_) | Token::Quote => self.parse_nonempty_value()?,
            _ => return Err(self.unexpected("value after ':'")),
        };
        Ok(value)
    }

    /// Parses: value_group → "(" value ("|" value)* ")"
    fn parse_value_group(&mut self) -> Result<Node, ParseError> {
        self.advance(); // consume (
        let mut values = Vec::new();

        loop {
            match self.peek() {
                Token::Word(_) | Token::Quote => values.push(self.parse_nonempty_value()?),
                _ if values.is_empty() => return Err(self.error(EMPTY_KV_VALUE)),
                _ => return Err(self.unexpected("value after '|'")),
            }

            if !self.check(&Token::Or) {
                break;
            }
            self.advance(); // consume |
        }

        self.expect(&Token::RParen)?;
        Ok(Node::ValueGroup(values))
    }

    /// Parses a value that may appear on the right of a key; empty phrases are rejected.
    fn parse_nonempty_value(&mut self) -> Result<Node, ParseError> {
        let start = self.position;
        let value = self.parse_value()?;
        if value.is_vacuous() {
            let offset = self.lexemes[start].offset;
            return Err(ParseError::new(EMPTY_KV_VALUE, start, offset));
        }
        Ok(value)
    }

    /// Parses: value → phrase | search_word
    fn parse_value(&mut self) -> Result<Node, ParseError> {
        if self.check(&Token::Quote) {
            self.parse_phrase()
        } else {
            self.parse_search_word()
        }
    }

    /// Parses: phrase → '"' search_word* '"'
    fn parse_phrase(&mut self) -> Result<Node, ParseError> {
        self.advance(); // consume opening quote
        let mut words = Vec::new();

        while matches!(self.peek(), Token::Word(_)) {
            words.push(self.parse_search_word()?);
        }

        self.expect(&Token::Quote)?;
        Ok(Node::Phrase(words))
    }

    /// Parses: search_word → WORD "*"?
    fn parse_search_word(&mut self) -> Result<Node, ParseError> {
        let Token::Word(text) = self.peek().clone() else {
            return Err(self.unexpected("word"));
        };
        self.advance();

        if self.check(&Token::Asterisk) {
            self.advance(); // consume *
            return Ok(Node::PrefixWord(text));
        }
        Ok(Node::Word(text))
    }

    /// Returns the current token without consuming it.
    fn peek(&self) -> &Token {
        &self.lexemes[self.position].token
    }

    /// Checks if the current token equals the given token.
    fn check(&self, token: &Token) -> bool {
        self.peek() == token
    }

    /// Advances to the next token; never moves past `End`.
    fn advance(&mut self) {
        if self.position + 1 < self.lexemes.len() {
            self.position += 1;
        }
    }

    /// Consumes the given token or fails naming what was found instead.
    fn expect(&mut self, token: &Token) -> Result<(), ParseError> {
        if !self.check(token) {
            return Err(self.unexpected(&token.to_string()));
        }
        self.advance();
        Ok(())
    }

    /// Builds an "expected X, found Y" error at the current token.
    fn unexpected(&self, expected: &str) -> ParseError {
        self.error(format!("expected {expected}, found {}", self.peek()))
    }

    /// Builds an error at the current token.
    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.position, self.lexemes[self.position].offset)
    }
}

/// Parses a lexeme stream into a `Query` node.
///
/// A stream that does not end with [`Token::End`] is treated as if it did.
pub fn parse_lexemes(lexemes: Vec<Lexeme>) -> Result<Node, ParseError> {
    Parser::new(lexemes).parse()
}

/// Parses a query string into a `Query` node.
///
/// Empty input parses to a `Query` with no and-expressions. Errors carry the query string
/// so they can be displayed with a position indicator.
pub fn parse(input: &str) -> Result<Node, ParseError> {
    parse_lexemes(tokenize(input)).map_err(|err| err.with_query(input))
}
