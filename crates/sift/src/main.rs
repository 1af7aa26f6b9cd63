//! Command-line interface for `sift`, a search-query compiler.

use std::process::ExitCode;

use clap::Parser;
use sift::cli::{CommandContext, args::Cli, commands, logging};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let ctx = if cli.command.needs_config() {
        CommandContext::load(cli.config.as_deref())
    } else {
        CommandContext::load_cwd_only()
    };
    let ctx = match ctx {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    commands::run(&cli.command, &ctx)
}
