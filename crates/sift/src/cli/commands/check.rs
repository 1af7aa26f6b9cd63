//! Implementation of `sift check`.

use std::process::ExitCode;

use sift_config::ConfigWarning;

use crate::cli::{
    context::CommandContext,
    output::{Highlighter, dim, subheader, warning},
};

/// Shows configuration files, entities, effective settings, and validation warnings.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config = &ctx.config;

    if config.files.is_empty() {
        println!("{}", dim("No configuration files found."));
        println!();
        println!(
            "Run {} to create a configuration file.",
            subheader("sift init")
        );
        return ExitCode::SUCCESS;
    }

    println!("{}", subheader("Config files:"));
    for path in &config.files {
        let display = path
            .strip_prefix(&ctx.cwd)
            .map_or_else(|_| path.display().to_string(), |p| p.display().to_string());
        println!("   {display}");
    }
    println!();

    println!("{}", subheader("Entities:"));
    if config.entities.is_empty() {
        println!("   {}", dim("(none defined)"));
    } else {
        for entity in config.entities.values() {
            let scope = if entity.is_global { "global" } else { "local" };
            let count = entity.fields.len();
            let noun = if count == 1 { "field" } else { "fields" };
            println!(
                "   {} {} {}",
                entity.name,
                dim(&format!("({scope})")),
                dim(&format!("-> {} [{count} {noun}]", entity.table))
            );
        }
    }
    println!();

    match config.settings_to_toml() {
        Ok(settings) => {
            println!("{}", subheader("Effective settings:"));
            let highlighted = Highlighter::new().highlight(&settings, "toml");
            for line in highlighted.lines() {
                println!("   {line}");
            }
            println!();
        }
        Err(e) => eprintln!("warning: could not render settings: {e}"),
    }

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("No issues found.");
        return ExitCode::SUCCESS;
    }

    println!("{}", subheader(&format!("Warnings ({}):", warnings.len())));
    for w in &warnings {
        println!("   {}", warning(&w.to_string()));
    }
    println!();

    for w in &warnings {
        if let Some(hint) = hint_for(w) {
            println!("{}", dim(&format!("Hint: {hint}")));
        }
    }

    ExitCode::FAILURE
}

/// Returns a hint for resolving a warning, if one applies.
fn hint_for(w: &ConfigWarning) -> Option<&'static str> {
    match w {
        ConfigWarning::NoEntitiesDefined => Some("add [entity.NAME] sections to sift.toml"),
        ConfigWarning::DefaultEntityMissing { .. } => {
            Some("set settings.default_entity to one of the defined entities")
        }
        ConfigWarning::EntityWithoutFields { .. } => {
            Some("add [entity.NAME.fields] entries mapping query fields to columns")
        }
        ConfigWarning::KeyNotSearchable { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hints_cover_actionable_warnings() {
        assert!(hint_for(&ConfigWarning::NoEntitiesDefined).is_some());
        assert!(
            hint_for(&ConfigWarning::DefaultEntityMissing {
                name: "people".into()
            })
            .is_some()
        );
        assert!(
            hint_for(&ConfigWarning::KeyNotSearchable {
                entity: "records".into(),
                key: "id".into()
            })
            .is_none()
        );
    }
}
