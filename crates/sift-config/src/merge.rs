//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`, applying precedence
//! rules and resolving field defaults.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::PathBuf,
};

use sift_sql::ColumnKind;

use crate::{
    Config, ConfigError, Entity, Field, Settings,
    discovery::is_global_config,
    parse::{RawConfig, RawEntity, RawField, RawSettings},
};

/// Join key used when an entity does not declare one.
const DEFAULT_KEY: &str = "id";

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Merges multiple configuration files into a single resolved `Config`.
///
/// Configs are given highest precedence first (closest to the working directory), global
/// config last.
///
/// Merge rules:
/// - Scalar settings: first defined value wins
/// - Entities: merged by name, first definition wins completely (table, key, fields)
pub fn merge_configs(configs: &[ParsedConfig]) -> Result<Config, ConfigError> {
    if configs.is_empty() {
        return Ok(Config::default());
    }

    let settings = merge_settings(configs);
    let entities = merge_entities(configs)?;
    let config_root = configs
        .first()
        .and_then(|c| c.path.parent())
        .map(PathBuf::from);

    Ok(Config {
        settings,
        entities,
        config_root,
        files: configs.iter().map(|c| c.path.clone()).collect(),
    })
}

/// Merges general settings, taking the first defined value for each field.
fn merge_settings(configs: &[ParsedConfig]) -> Settings {
    let mut result = Settings::default();

    // Lowest precedence first so higher precedence overwrites.
    for parsed in configs.iter().rev() {
        if let Some(ref settings) = parsed.config.settings {
            apply_raw_settings(&mut result, settings);
        }
    }

    result
}

/// Applies raw settings to result, overwriting any present values.
fn apply_raw_settings(result: &mut Settings, raw: &RawSettings) {
    if let Some(ref v) = raw.default_entity {
        result.default_entity = Some(v.clone());
    }
    if let Some(v) = raw.placeholder {
        result.placeholder = v;
    }
}

/// Merges entities from all configs; the first definition of a name wins.
fn merge_entities(configs: &[ParsedConfig]) -> Result<BTreeMap<String, Entity>, ConfigError> {
    let mut entities = BTreeMap::new();

    for parsed in configs {
        let Some(ref raw_entities) = parsed.config.entity else {
            continue;
        };
        let is_global = is_global_config(&parsed.path);

        for (name, raw) in raw_entities {
            if entities.contains_key(name) {
                continue;
            }
            let entity = convert_entity(name, raw, is_global)?;
            entities.insert(name.clone(), entity);
        }
    }

    Ok(entities)
}

/// Converts a raw entity, applying defaults and checking field names.
fn convert_entity(name: &str, raw: &RawEntity, is_global: bool) -> Result<Entity, ConfigError> {
    let table = raw.table.clone().unwrap_or_else(|| name.to_string());
    let key = raw.key.clone().unwrap_or_else(|| DEFAULT_KEY.to_string());

    let mut fields = Vec::with_capacity(raw.fields.len());
    let mut names: BTreeSet<String> = raw.fields.keys().cloned().collect();

    for (field_name, raw_field) in &raw.fields {
        let field = convert_field(name, field_name, raw_field)?;
        for alias in &field.aliases {
            if !names.insert(alias.clone()) {
                return Err(ConfigError::DuplicateField {
                    entity: name.to_string(),
                    name: alias.clone(),
                });
            }
        }
        fields.push(field);
    }

    Ok(Entity {
        name: name.to_string(),
        table,
        key,
        fields,
        is_global,
    })
}

/// Converts a raw field, applying defaults.
fn convert_field(entity: &str, name: &str, raw: &RawField) -> Result<Field, ConfigError> {
    let (column, kind, aliases) = match raw {
        RawField::Kind(kind) => (None, Some(kind.as_str()), Vec::new()),
        RawField::Full(spec) => (spec.column.clone(), spec.kind.as_deref(), spec.aliases.clone()),
    };

    let kind = match kind {
        Some(kind) => kind
            .parse::<ColumnKind>()
            .map_err(|message| ConfigError::InvalidColumnKind {
                entity: entity.to_string(),
                field: name.to_string(),
                message,
            })?,
        None => ColumnKind::default(),
    };

    Ok(Field {
        name: name.to_string(),
        column: column.unwrap_or_else(|| name.to_string()),
        kind,
        aliases,
    })
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use sift_sql::Placeholder;

    use super::*;
    use crate::parse::parse_config_str;

    fn parsed(path: &str, toml: &str) -> ParsedConfig {
        ParsedConfig {
            path: PathBuf::from(path),
            config: parse_config_str(toml, Path::new(path)).unwrap(),
        }
    }

    #[test]
    fn empty() {
        let config = merge_configs(&[]).unwrap();
        assert!(config.entities.is_empty());
        assert!(config.config_root.is_none());
        assert_eq!(config.settings.placeholder, Placeholder::Dollar);
    }

    #[test]
    fn defaults_applied() {
        let config = merge_configs(&[parsed(
            "/project/sift.toml",
            r#"
[entity.people.fields]
name = {}
age = "identifier"
"#,
        )])
        .unwrap();

        let people = &config.entities["people"];
        assert_eq!(people.table, "people");
        assert_eq!(people.key, "id");
        assert!(!people.is_global);

        let name = people.field("name").unwrap();
        assert_eq!(name.column, "name");
        assert_eq!(name.kind, ColumnKind::Text);

        assert_eq!(people.field("age").unwrap().kind, ColumnKind::Identifier);
        assert_eq!(config.config_root, Some(PathBuf::from("/project")));
    }

    #[test]
    fn closest_settings_win() {
        let config = merge_configs(&[
            parsed("/a/b/sift.toml", "[settings]\nplaceholder = \"question\"\n"),
            parsed(
                "/a/sift.toml",
                "[settings]\nplaceholder = \"dollar\"\ndefault_entity = \"records\"\n",
            ),
        ])
        .unwrap();

        assert_eq!(config.settings.placeholder, Placeholder::Question);
        assert_eq!(config.settings.default_entity.as_deref(), Some("records"));
        assert_eq!(config.files.len(), 2);
    }

    #[test]
    fn first_entity_definition_wins() {
        let config = merge_configs(&[
            parsed("/a/b/sift.toml", "[entity.records]\ntable = \"inner\"\n"),
            parsed(
                "/a/sift.toml",
                "[entity.records]\ntable = \"outer\"\n[entity.other]\n",
            ),
        ])
        .unwrap();

        assert_eq!(config.entities["records"].table, "inner");
        assert!(config.entities.contains_key("other"));
    }

    #[test]
    fn invalid_kind() {
        let result = merge_configs(&[parsed(
            "/sift.toml",
            "[entity.records.fields]\nstatus = \"blob\"\n",
        )]);
        let Err(ConfigError::InvalidColumnKind { entity, field, .. }) = result else {
            panic!("expected invalid column kind");
        };
        assert_eq!(entity, "records");
        assert_eq!(field, "status");
    }

    #[test]
    fn alias_colliding_with_field() {
        let result = merge_configs(&[parsed(
            "/sift.toml",
            r#"
[entity.records.fields]
status = "text"
state = { column = "state", aliases = "status" }
"#,
        )]);
        assert!(matches!(
            result,
            Err(ConfigError::DuplicateField { ref name, .. }) if name == "status"
        ));
    }

    #[test]
    fn alias_colliding_with_alias() {
        let result = merge_configs(&[parsed(
            "/sift.toml",
            r#"
[entity.records.fields]
a = { aliases = "x" }
b = { aliases = ["y", "x"] }
"#,
        )]);
        assert!(matches!(result, Err(ConfigError::DuplicateField { .. })));
    }
}
