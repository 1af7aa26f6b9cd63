//! Command implementations and dispatch.

pub mod check;
pub mod fields;
pub mod init;
pub mod parse;
pub mod sql;
pub mod tsquery;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: &Commands, ctx: &CommandContext) -> ExitCode {
    match command {
        Commands::Parse(cmd) => parse::run(cmd),
        Commands::TsQuery(cmd) => tsquery::run(cmd),
        Commands::Sql(cmd) => sql::run(ctx, cmd),
        Commands::Fields(cmd) => fields::run(ctx, cmd),
        Commands::Check => check::run(ctx),
        Commands::Init(cmd) => init::run(ctx, cmd),
    }
}
