//! Configuration templates for `sift init`.

/// Example configuration (valid TOML).
const LOCAL_TEMPLATE: &str = r#"# sift configuration
#
# Each entity maps query fields onto the columns of one table.

[settings]
default_entity = "records"
placeholder = "dollar"

[entity.records]
table = "records"
key = "id"

[entity.records.fields]
id = "identifier"
status = "text"
name = { column = "display_name", kind = "text", aliases = "n" }
active = { column = "is_active", kind = "boolean" }
created = { column = "created_at", kind = "date" }
"#;

/// Global configuration template (valid TOML).
const GLOBAL_TEMPLATE: &str = r#"# Global sift configuration
#
# Project configurations take precedence over this file.

[settings]
placeholder = "dollar"
"#;

/// Returns the local configuration template: a working example entity.
pub fn local_template() -> String {
    LOCAL_TEMPLATE.to_string()
}

/// Returns the global configuration template as a commented-out example.
pub fn global_template() -> String {
    comment_template(GLOBAL_TEMPLATE)
}

/// Converts a valid TOML template into a commented-out example config.
///
/// Lines that are already comments are preserved as-is. Non-comment, non-empty lines get a
/// `# ` prefix. Empty lines are preserved.
fn comment_template(template: &str) -> String {
    let mut result = String::with_capacity(template.len() + template.lines().count() * 2);
    for line in template.lines() {
        if !line.is_empty() && !line.starts_with('#') {
            result.push_str("# ");
        }
        result.push_str(line);
        result.push('\n');
    }
    result
}
