//! Configuration validation.
//!
//! Reports non-fatal problems with a loaded configuration.

use std::fmt;

use crate::{Config, Entity};

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// No entities are defined.
    NoEntitiesDefined,
    /// `settings.default_entity` names an entity that is not defined.
    DefaultEntityMissing {
        /// The configured default.
        name: String,
    },
    /// An entity has no searchable fields, so every field term matches nothing.
    EntityWithoutFields {
        /// Entity name.
        entity: String,
    },
    /// The join key is not exposed as a searchable field.
    KeyNotSearchable {
        /// Entity name.
        entity: String,
        /// Join key column.
        key: String,
    },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoEntitiesDefined => write!(f, "no entities are defined in configuration"),
            Self::DefaultEntityMissing { name } => {
                write!(f, "default entity '{name}' is not defined")
            }
            Self::EntityWithoutFields { entity } => {
                write!(f, "entity '{entity}' has no searchable fields")
            }
            Self::KeyNotSearchable { entity, key } => {
                write!(
                    f,
                    "join key column '{key}' of entity '{entity}' is not mapped to a field"
                )
            }
        }
    }
}

/// Validates the configuration and returns any warnings.
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    if config.entities.is_empty() {
        warnings.push(ConfigWarning::NoEntitiesDefined);
        return warnings;
    }

    if let Some(ref name) = config.settings.default_entity
        && !config.entities.contains_key(name)
    {
        warnings.push(ConfigWarning::DefaultEntityMissing { name: name.clone() });
    }

    for entity in config.entities.values() {
        warnings.extend(validate_entity(entity));
    }

    warnings
}

/// Validates a single entity.
fn validate_entity(entity: &Entity) -> Vec<ConfigWarning> {
    if entity.fields.is_empty() {
        return vec![ConfigWarning::EntityWithoutFields {
            entity: entity.name.clone(),
        }];
    }

    if entity.fields.iter().all(|field| field.column != entity.key) {
        return vec![ConfigWarning::KeyNotSearchable {
            entity: entity.name.clone(),
            key: entity.key.clone(),
        }];
    }

    Vec::new()
}

#[cfg(test)]
mod tests {
    use std::{collections::BTreeMap, path::PathBuf};

    use sift_sql::ColumnKind;

    use super::*;
    use crate::{Field, Settings};

    fn entity(name: &str, fields: &[(&str, &str)]) -> Entity {
        Entity {
            name: name.into(),
            table: name.into(),
            key: "id".into(),
            fields: fields
                .iter()
                .map(|(field, column)| Field {
                    name: (*field).into(),
                    column: (*column).into(),
                    kind: ColumnKind::Text,
                    aliases: Vec::new(),
                })
                .collect(),
            is_global: false,
        }
    }

    fn config(entities: Vec<Entity>, default_entity: Option<&str>) -> Config {
        Config {
            settings: Settings {
                default_entity: default_entity.map(String::from),
                ..Settings::default()
            },
            entities: entities
                .into_iter()
                .map(|entity| (entity.name.clone(), entity))
                .collect::<BTreeMap<_, _>>(),
            config_root: Some(PathBuf::from("/project")),
            files: Vec::new(),
        }
    }

    #[test]
    fn empty_config() {
        assert_eq!(
            validate_config(&Config::default()),
            vec![ConfigWarning::NoEntitiesDefined]
        );
    }

    #[test]
    fn valid_config() {
        let config = config(
            vec![entity("records", &[("id", "id"), ("status", "status")])],
            Some("records"),
        );
        assert!(validate_config(&config).is_empty());
    }

    #[test]
    fn missing_default_entity() {
        let config = config(vec![entity("records", &[("id", "id")])], Some("people"));
        assert_eq!(
            validate_config(&config),
            vec![ConfigWarning::DefaultEntityMissing {
                name: "people".into()
            }]
        );
    }

    #[test]
    fn entity_without_fields() {
        let config = config(vec![entity("records", &[])], None);
        assert_eq!(
            validate_config(&config),
            vec![ConfigWarning::EntityWithoutFields {
                entity: "records".into()
            }]
        );
    }

    #[test]
    fn key_not_searchable() {
        let config = config(vec![entity("records", &[("status", "status")])], None);
        let warnings = validate_config(&config);
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings[0].to_string(),
            "join key column 'id' of entity 'records' is not mapped to a field"
        );
    }
}
