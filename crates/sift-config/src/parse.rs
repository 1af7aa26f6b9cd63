//! Configuration file parsing.
//!
//! Parses individual `sift.toml` files into intermediate `RawConfig` structures that keep
//! every field optional until files are merged.

use std::{collections::BTreeMap, fs, path::Path};

use serde::Deserialize;
use serde_with::{OneOrMany, serde_as};
use sift_sql::Placeholder;

use crate::ConfigError;

/// Raw configuration as parsed directly from a TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawConfig {
    /// When true, stop discovery here and ignore parent and global configs.
    pub root: Option<bool>,
    /// General settings section.
    pub settings: Option<RawSettings>,
    /// Entity definitions: name -> entity.
    pub entity: Option<BTreeMap<String, RawEntity>>,
}

/// Raw general settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawSettings {
    /// Entity used when none is requested.
    pub default_entity: Option<String>,
    /// Placeholder style for rendered SQL.
    pub placeholder: Option<Placeholder>,
}

/// Raw entity definition.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawEntity {
    /// Table name (defaults to the entity name).
    pub table: Option<String>,
    /// Join key column (defaults to `id`).
    pub key: Option<String>,
    /// Searchable fields: name -> field definition.
    pub fields: BTreeMap<String, RawField>,
}

/// Raw field definition: either a bare kind or a full table.
///
/// ```toml
/// status = "text"
/// name = { column = "display_name", kind = "text", aliases = ["n", "who"] }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawField {
    /// `field = "kind"`: the column is named after the field.
    Kind(String),
    /// `field = { column = ..., kind = ..., aliases = ... }`.
    Full(RawFieldSpec),
}

/// Full field definition.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawFieldSpec {
    /// Column name (defaults to the field name).
    #[serde(default)]
    pub column: Option<String>,
    /// Column kind (defaults to `text`).
    #[serde(default)]
    pub kind: Option<String>,
    /// Additional names the field answers to; a single string or an array.
    #[serde(default)]
    #[serde_as(as = "OneOrMany<_>")]
    pub aliases: Vec<String>,
}

/// Parses a configuration file from disk.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Checks if a config file has `root = true` set.
///
/// Returns false if the file cannot be read or parsed.
pub fn is_root_config(path: &Path) -> bool {
    let Ok(contents) = fs::read_to_string(path) else {
        return false;
    };
    let Ok(config) = toml::from_str::<RawConfig>(&contents) else {
        return false;
    };
    config.root == Some(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> RawConfig {
        parse_config_str(toml, Path::new("sift.toml")).unwrap()
    }

    #[test]
    fn empty_config() {
        let config = parse("");
        assert!(config.root.is_none());
        assert!(config.settings.is_none());
        assert!(config.entity.is_none());
    }

    #[test]
    fn settings() {
        let config = parse(
            r#"
[settings]
default_entity = "records"
placeholder = "question"
"#,
        );
        let settings = config.settings.unwrap();
        assert_eq!(settings.default_entity.as_deref(), Some("records"));
        assert_eq!(settings.placeholder, Some(Placeholder::Question));
    }

    #[test]
    fn shorthand_and_full_fields() {
        let config = parse(
            r#"
[entity.records]
table = "records"
key = "id"

[entity.records.fields]
status = "text"
name = { column = "display_name", kind = "text", aliases = ["n", "who"] }
owner = { aliases = "o" }
"#,
        );
        let entities = config.entity.unwrap();
        let records = entities.get("records").unwrap();
        assert_eq!(records.table.as_deref(), Some("records"));
        assert_eq!(records.key.as_deref(), Some("id"));

        assert!(matches!(records.fields.get("status"), Some(RawField::Kind(kind)) if kind == "text"));

        let Some(RawField::Full(name)) = records.fields.get("name") else {
            panic!("expected full field definition");
        };
        assert_eq!(name.column.as_deref(), Some("display_name"));
        assert_eq!(name.aliases, vec!["n", "who"]);

        let Some(RawField::Full(owner)) = records.fields.get("owner") else {
            panic!("expected full field definition");
        };
        assert!(owner.column.is_none());
        assert!(owner.kind.is_none());
        assert_eq!(owner.aliases, vec!["o"]);
    }

    #[test]
    fn entity_defaults() {
        let config = parse("[entity.people]\n");
        let people = &config.entity.unwrap()["people"];
        assert!(people.table.is_none());
        assert!(people.key.is_none());
        assert!(people.fields.is_empty());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = parse_config_str("[settings]\nlimit = 3\n", Path::new("sift.toml"));
        assert!(matches!(result, Err(ConfigError::ParseToml { .. })));
    }

    #[test]
    fn invalid_placeholder() {
        let result = parse_config_str(
            "[settings]\nplaceholder = \"colon\"\n",
            Path::new("sift.toml"),
        );
        assert!(matches!(result, Err(ConfigError::ParseToml { .. })));
    }

    #[test]
    fn root_flag() {
        let config = parse("root = true\n");
        assert_eq!(config.root, Some(true));
    }
}
