//! Query lexer (tokenizer).
//!
//! Converts a query string into a flat stream of lexemes for the parser. The lexer is total:
//! every input produces a stream, and every stream ends with exactly one [`Token::End`].

use std::{fmt, iter::Peekable, str::CharIndices};

/// A token in the query language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A run of non-boundary characters.
    Word(String),

    /// Alternation operator (`|`).
    Or,

    /// Negation prefix (`-`).
    Neg,

    /// Prefix-match suffix (`*`).
    Asterisk,

    /// Left parenthesis.
    LParen,

    /// Right parenthesis.
    RParen,

    /// Key/value separator (`:`).
    Colon,

    /// Phrase delimiter (`"`).
    Quote,

    /// End-of-input sentinel.
    End,
}

impl Token {
    /// Maps an operator character to its token.
    fn operator(ch: char) -> Option<Self> {
        match ch {
            '|' => Some(Self::Or),
            '-' => Some(Self::Neg),
            '*' => Some(Self::Asterisk),
            '(' => Some(Self::LParen),
            ')' => Some(Self::RParen),
            ':' => Some(Self::Colon),
            '"' => Some(Self::Quote),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Word(text) => write!(f, "word '{text}'"),
            Self::Or => write!(f, "'|'"),
            Self::Neg => write!(f, "'-'"),
            Self::Asterisk => write!(f, "'*'"),
            Self::LParen => write!(f, "'('"),
            Self::RParen => write!(f, "')'"),
            Self::Colon => write!(f, "':'"),
            Self::Quote => write!(f, "'\"'"),
            Self::End => write!(f, "end of query"),
        }
    }
}

/// A token together with the byte offset where it starts in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    /// The token.
    pub token: Token,
    /// Byte offset of the token in the query string.
    pub offset: usize,
}

/// Returns true for characters that end a word.
///
/// Operators end a word and are emitted; the remaining boundary characters are dropped.
fn is_boundary(ch: char) -> bool {
    Token::operator(ch).is_some() || matches!(ch, '<' | '>' | '!' | '\\') || ch.is_whitespace()
}

/// Tokenizes a query string.
struct Lexer<'a> {
    /// The original input string.
    input: &'a str,
    /// Character iterator with one-character lookahead.
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    /// Tokenizes the entire input, terminating the stream with `End`.
    fn tokenize(mut self) -> Vec<Lexeme> {
        let mut lexemes = Vec::new();

        while let Some(lexeme) = self.next_lexeme() {
            lexemes.push(lexeme);
        }

        lexemes.push(Lexeme {
            token: Token::End,
            offset: self.input.len(),
        });
        lexemes
    }

    /// Returns the next lexeme, or None at end of input.
    fn next_lexeme(&mut self) -> Option<Lexeme> {
        loop {
            let &(offset, ch) = self.chars.peek()?;

            if let Some(token) = Token::operator(ch) {
                self.chars.next();
                return Some(Lexeme { token, offset });
            }

            if is_boundary(ch) {
                self.chars.next();
                continue;
            }

            return Some(self.read_word(offset));
        }
    }

    /// Reads a run of non-boundary characters starting at `start`.
    fn read_word(&mut self, start: usize) -> Lexeme {
        let mut end = start;

        while let Some(&(offset, ch)) = self.chars.peek() {
            if is_boundary(ch) {
                break;
            }
            end = offset + ch.len_utf8();
            self.chars.next();
        }

        Lexeme {
            token: Token::Word(self.input[start..end].to_string()),
            offset: start,
        }
    }
}

/// Tokenizes a query string into lexemes.
///
/// The returned stream is never empty and always ends with a single [`Token::End`].
pub fn tokenize(input: &str) -> Vec<Lexeme> {
    Lexer::new(input).tokenize()
}
