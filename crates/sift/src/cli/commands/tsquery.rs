//! Implementation of `sift tsquery`.

use std::process::ExitCode;

use sift_query::{TextSearch, compile_to_text_search};

use crate::cli::{
    args::TsQueryCommand,
    output::{dim, report_parse_error},
};

/// Prints the tsquery expression for a query.
///
/// A query without a tsquery form prints an empty line, with a note on stderr saying whether
/// it matches everything or nothing.
pub fn run(cmd: &TsQueryCommand) -> ExitCode {
    match compile_to_text_search(&cmd.query) {
        Ok(TextSearch::Query(tsquery)) => println!("{tsquery}"),
        Ok(TextSearch::Everything) => {
            println!();
            eprintln!("{}", dim("note: query places no constraint; everything matches"));
        }
        Ok(TextSearch::Nothing) => {
            println!();
            eprintln!("{}", dim("note: query can never match"));
        }
        Err(e) => {
            report_parse_error(&e);
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}
