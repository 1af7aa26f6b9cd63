//! Implementation of `sift sql`.

use std::process::ExitCode;

use serde::Serialize;
use sift_sql::{Placeholder, RenderedSql, SqlValue};

use crate::cli::{
    args::SqlCommand,
    context::CommandContext,
    output::{Highlighter, dim, report_parse_error},
};

/// JSON output for `sift sql --json`.
#[derive(Serialize)]
struct JsonSqlOutput<'a> {
    /// The original query string.
    query: &'a str,
    /// Entity the query was compiled against.
    entity: &'a str,
    /// Rendered SQL and bound parameters.
    #[serde(flatten)]
    rendered: &'a RenderedSql,
}

/// Compiles a query to SQL over the selected entity.
pub fn run(ctx: &CommandContext, cmd: &SqlCommand) -> ExitCode {
    let entity = match ctx.entity(cmd.entity.as_deref()) {
        Ok(entity) => entity,
        Err(code) => return code,
    };

    let statement = match entity.compile(&cmd.query) {
        Ok(statement) => statement,
        Err(e) => {
            report_parse_error(&e);
            return ExitCode::FAILURE;
        }
    };

    if cmd.inline {
        println!("{}", Highlighter::new().highlight(&statement.to_string(), "sql"));
        return ExitCode::SUCCESS;
    }

    let placeholder = cmd.placeholder.unwrap_or(ctx.config.settings.placeholder);
    let rendered = statement.to_sql_with_offset(placeholder, cmd.offset);

    if cmd.json {
        let output = JsonSqlOutput {
            query: &cmd.query,
            entity: &entity.name,
            rendered: &rendered,
        };
        return match serde_json::to_string_pretty(&output) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: failed to serialize JSON: {e}");
                ExitCode::FAILURE
            }
        };
    }

    println!("{}", Highlighter::new().highlight(&rendered.sql, "sql"));
    for (i, value) in rendered.params.iter().enumerate() {
        println!("{}", dim(&format_param(placeholder, cmd.offset + i + 1, value)));
    }

    ExitCode::SUCCESS
}

/// Formats one bound parameter as a SQL comment, e.g. `-- $1 = 'active'`.
fn format_param(placeholder: Placeholder, index: usize, value: &SqlValue) -> String {
    match placeholder {
        Placeholder::Dollar => format!("-- ${index} = {value}"),
        Placeholder::Question => format!("-- ?{index} = {value}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn param_lines() {
        assert_eq!(
            format_param(Placeholder::Dollar, 1, &SqlValue::Text("o'neil".into())),
            "-- $1 = 'o''neil'"
        );
        assert_eq!(
            format_param(Placeholder::Question, 3, &SqlValue::Integer(7)),
            "-- ?3 = 7"
        );
    }
}
