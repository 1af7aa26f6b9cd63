//! Terminal styling and shared output helpers.
//!
//! Styling is applied only when stdout is a terminal and `NO_COLOR` is unset, so piped
//! output is plain text.

use std::{
    env,
    io::{self, IsTerminal},
};

use sift_query::ParseError;
use syntect::{
    easy::HighlightLines,
    highlighting::Style,
    parsing::SyntaxSet,
    util::{LinesWithEndings, as_24_bit_terminal_escaped},
};
use two_face::{
    syntax::extra_newlines as extra_syntaxes,
    theme::{EmbeddedLazyThemeSet, EmbeddedThemeName, extra as extra_themes},
};

/// ANSI escape codes.
mod colors {
    /// Bold text.
    pub const BOLD: &str = "\x1b[1m";
    /// Cyan text (headers).
    pub const CYAN: &str = "\x1b[36m";
    /// Yellow text (warnings).
    pub const YELLOW: &str = "\x1b[33m";
    /// Dim text.
    pub const DIM: &str = "\x1b[2m";
    /// Reset all formatting.
    pub const RESET: &str = "\x1b[0m";
}

/// Whether styled output should be produced.
pub fn color_enabled() -> bool {
    io::stdout().is_terminal() && env::var_os("NO_COLOR").is_none()
}

/// Wraps `text` in escape codes when styling is enabled.
fn styled(codes: &[&str], text: &str) -> String {
    if color_enabled() {
        format!("{}{text}{}", codes.concat(), colors::RESET)
    } else {
        text.to_string()
    }
}

/// Formats a header (bold cyan).
pub fn header(text: &str) -> String {
    styled(&[colors::BOLD, colors::CYAN], text)
}

/// Formats a subheader (bold).
pub fn subheader(text: &str) -> String {
    styled(&[colors::BOLD], text)
}

/// Formats less important text (dim).
pub fn dim(text: &str) -> String {
    styled(&[colors::DIM], text)
}

/// Formats a warning (yellow).
pub fn warning(text: &str) -> String {
    styled(&[colors::YELLOW], text)
}

/// Syntax highlighter for SQL and TOML output.
pub struct Highlighter {
    /// Language definitions.
    syntax_set: SyntaxSet,
    /// Color themes.
    theme_set: EmbeddedLazyThemeSet,
    /// Theme in use.
    theme: EmbeddedThemeName,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    /// Creates a highlighter with the Dracula theme.
    pub fn new() -> Self {
        Self {
            syntax_set: extra_syntaxes(),
            theme_set: extra_themes(),
            theme: EmbeddedThemeName::Dracula,
        }
    }

    /// Highlights `content` for a terminal, or returns it unchanged when styling is off.
    ///
    /// `syntax_name` is a file extension or syntax name such as `sql` or `toml`.
    pub fn highlight(&self, content: &str, syntax_name: &str) -> String {
        if !color_enabled() {
            return content.to_string();
        }
        self.highlight_ansi(content, syntax_name)
    }

    /// Highlights `content` with 24-bit ANSI escapes.
    fn highlight_ansi(&self, content: &str, syntax_name: &str) -> String {
        let syntax = self
            .syntax_set
            .find_syntax_by_extension(syntax_name)
            .or_else(|| self.syntax_set.find_syntax_by_name(syntax_name))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self.theme_set.get(self.theme);
        let mut highlighter = HighlightLines::new(syntax, theme);

        let mut output = String::new();
        for line in LinesWithEndings::from(content) {
            let ranges: Vec<(Style, &str)> = highlighter
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_else(|_| vec![(Style::default(), line)]);
            output.push_str(&as_24_bit_terminal_escaped(&ranges[..], false));
        }
        output.push_str(colors::RESET);
        output
    }
}

/// Reports a query syntax error on stderr.
pub fn report_parse_error(err: &ParseError) {
    eprintln!("error: invalid search syntax");
    eprintln!("{err}");
}
