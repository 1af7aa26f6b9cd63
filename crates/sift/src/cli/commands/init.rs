//! Implementation of `sift init`.

use std::{fs, process::ExitCode};

use sift_config::{CONFIG_FILENAME, global_config_path, global_template, local_template};

use crate::cli::{
    args::InitCommand,
    context::CommandContext,
    output::{Highlighter, subheader},
};

/// Initializes a `sift.toml` configuration file.
pub fn run(ctx: &CommandContext, cmd: &InitCommand) -> ExitCode {
    let config_path = if cmd.global {
        match global_config_path() {
            Some(path) => path,
            None => {
                eprintln!("error: could not determine configuration directory");
                return ExitCode::FAILURE;
            }
        }
    } else {
        ctx.cwd.join(CONFIG_FILENAME)
    };

    if config_path.exists() && !cmd.force {
        eprintln!(
            "error: configuration file already exists: {}",
            config_path.display()
        );
        eprintln!("use --force to overwrite");
        return ExitCode::FAILURE;
    }

    if let Some(parent) = config_path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        eprintln!("error: failed to create {}: {e}", parent.display());
        return ExitCode::FAILURE;
    }

    let template = if cmd.global {
        global_template()
    } else {
        local_template()
    };

    if let Err(e) = fs::write(&config_path, &template) {
        eprintln!("error: failed to write {}: {e}", config_path.display());
        return ExitCode::FAILURE;
    }

    println!("Created {}", config_path.display());
    println!();
    println!("{}", subheader("Configuration written:"));
    let highlighted = Highlighter::new().highlight(&template, "toml");
    for line in highlighted.lines() {
        println!("   {line}");
    }

    ExitCode::SUCCESS
}
