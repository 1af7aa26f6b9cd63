//! Implementation of `sift fields`.

use std::process::ExitCode;

use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};
use sift_config::Entity;

use crate::cli::{
    args::FieldsCommand,
    context::CommandContext,
    output::{dim, header, subheader},
};

/// Lists the searchable fields of one entity, or of every entity.
pub fn run(ctx: &CommandContext, cmd: &FieldsCommand) -> ExitCode {
    let config = &ctx.config;

    let entities: Vec<&Entity> = match &cmd.entity {
        Some(name) => match ctx.entity(Some(name)) {
            Ok(entity) => vec![entity],
            Err(code) => return code,
        },
        None => config.entities.values().collect(),
    };

    if entities.is_empty() {
        println!("{}", dim("No entities defined."));
        println!();
        println!(
            "Run {} to create a configuration file.",
            subheader("sift init")
        );
        return ExitCode::SUCCESS;
    }

    for (i, entity) in entities.iter().enumerate() {
        if i > 0 {
            println!();
        }
        let scope = if entity.is_global { ", global" } else { "" };
        println!(
            "{} {}",
            header(&entity.name),
            dim(&format!("({}, key {}{scope})", entity.table, entity.key))
        );
        if entity.fields.is_empty() {
            println!("   {}", dim("(no fields)"));
        } else {
            println!("{}", fields_table(entity));
        }
    }

    ExitCode::SUCCESS
}

/// Builds the field table for an entity.
fn fields_table(entity: &Entity) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Field", "Column", "Kind", "Aliases"]);
    for field in &entity.fields {
        table.add_row(vec![
            Cell::new(&field.name),
            Cell::new(&field.column),
            Cell::new(field.kind.as_str()),
            Cell::new(field.aliases.join(", ")),
        ]);
    }
    table
}
