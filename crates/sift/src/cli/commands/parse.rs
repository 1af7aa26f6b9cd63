//! Implementation of `sift parse`.

use std::process::ExitCode;

use sift_query::{Token, parse, tokenize};

use crate::cli::{
    args::ParseCommand,
    output::{dim, report_parse_error, subheader},
};

/// Prints the token stream, syntax tree and normalized form of a query.
pub fn run(cmd: &ParseCommand) -> ExitCode {
    if cmd.tokens {
        println!("{}", subheader("Tokens:"));
        for lexeme in tokenize(&cmd.query) {
            let offset = dim(&format!("@{}", lexeme.offset));
            match lexeme.token {
                Token::Word(ref text) => println!("  {offset} Word({text:?})"),
                ref token => println!("  {offset} {token}"),
            }
        }
        println!();
    }

    let query = match parse(&cmd.query) {
        Ok(query) => query,
        Err(e) => {
            report_parse_error(&e);
            return ExitCode::FAILURE;
        }
    };

    println!("{}", subheader("Syntax tree:"));
    print!("{query}");
    println!();
    println!("{}", subheader("Normalized:"));
    println!("  {}", query.to_query_string());

    ExitCode::SUCCESS
}
