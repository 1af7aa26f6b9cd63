//! Schema configuration for sift.
//!
//! sift reads TOML files named `sift.toml`. Configuration is resolved by walking up the
//! directory tree from the working directory, collecting every `sift.toml` found, then
//! loading the global config with lowest precedence.
//!
//! A configuration declares *entities*. Each entity names a table, the key column grouped
//! sub-queries are joined back on, and the fields a query may use, each mapped to a column
//! and a [`ColumnKind`].

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod templates;
mod validate;

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

pub use discovery::{CONFIG_FILENAME, discover_config_files, global_config_path, is_global_config};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawConfig, RawEntity, RawField, RawFieldSpec, RawSettings, parse_config_file,
    parse_config_str,
};
use serde::Serialize;
use sift_query::ParseError;
use sift_sql::{
    ColumnClause, ColumnKind, ColumnMappings, ColumnRef, Placeholder, Select, Statement,
    compile_to_relational,
};
pub use templates::{global_template, local_template};
use toml::ser;
pub use validate::ConfigWarning;
use validate::validate_config;

/// Fully resolved configuration after merging every discovered `sift.toml`.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// General settings.
    pub settings: Settings,
    /// Entities by name.
    pub entities: BTreeMap<String, Entity>,
    /// Directory containing the most specific config file.
    pub config_root: Option<PathBuf>,
    /// Files the configuration was loaded from, highest precedence first.
    pub files: Vec<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `sift.toml` files.
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        Self::load_from_files(&config_files)
    }

    /// Loads configuration from a specific list of config files, highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        if files.is_empty() {
            return Ok(Self::default());
        }

        let parsed: Vec<ParsedConfig> = files
            .iter()
            .map(|path| {
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        merge_configs(&parsed)
    }

    /// Validates the configuration and returns any warnings.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Selects an entity.
    ///
    /// Uses `name` when given, then `settings.default_entity`, then the only defined entity.
    pub fn entity(&self, name: Option<&str>) -> Result<&Entity, ConfigError> {
        let name = match name.or(self.settings.default_entity.as_deref()) {
            Some(name) => name,
            None => {
                let mut entities = self.entities.values();
                return match (entities.next(), entities.next()) {
                    (Some(only), None) => Ok(only),
                    (None, _) => Err(ConfigError::NoEntities),
                    (Some(_), Some(_)) => Err(ConfigError::NoEntitySelected),
                };
            }
        };

        self.entities
            .get(name)
            .ok_or_else(|| ConfigError::UnknownEntity {
                name: name.to_string(),
                defined: self.entities.keys().cloned().collect(),
            })
    }

    /// Serializes the effective settings to TOML.
    pub fn settings_to_toml(&self) -> Result<String, ser::Error> {
        #[derive(Serialize)]
        /// Wrapper producing a `[settings]` table.
        struct SettingsFile<'a> {
            /// General settings.
            settings: &'a Settings,
        }

        toml::to_string_pretty(&SettingsFile {
            settings: &self.settings,
        })
    }
}

/// General settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Settings {
    /// Entity used when none is requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_entity: Option<String>,
    /// Placeholder style for rendered SQL.
    pub placeholder: Placeholder,
}

/// A searchable table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    /// Entity name.
    pub name: String,
    /// Table name.
    pub table: String,
    /// Column grouped sub-queries are joined back on.
    pub key: String,
    /// Searchable fields, sorted by name.
    pub fields: Vec<Field>,
    /// Whether the entity was defined in the global config.
    pub is_global: bool,
}

impl Entity {
    /// Looks up a field by name or alias.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|field| field.name == name || field.aliases.iter().any(|alias| alias == name))
    }

    /// Builds the clause-generator registry: every field mapped to its column, with its
    /// aliases resolving to the field.
    pub fn mappings(&self) -> ColumnMappings {
        let mut mappings = ColumnMappings::new();
        for field in &self.fields {
            let clause = ColumnClause::new(
                ColumnRef::new(self.table.as_str(), field.column.as_str()),
                field.kind,
            );
            mappings.insert(field.name.as_str(), clause);
            for alias in &field.aliases {
                mappings.insert_alias(alias.as_str(), field.name.as_str());
            }
        }
        mappings
    }

    /// Returns `SELECT * FROM table`.
    pub fn base_select(&self) -> Select {
        Select::from_table(self.table.as_str())
    }

    /// Compiles a query against this entity.
    pub fn compile(&self, query: &str) -> Result<Statement, ParseError> {
        compile_to_relational(
            &self.base_select(),
            query,
            &self.mappings(),
            &self.table,
            &self.key,
        )
    }
}

/// A searchable field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field name used in queries.
    pub name: String,
    /// Column the field reads.
    pub column: String,
    /// How values are matched.
    pub kind: ColumnKind,
    /// Additional names the field answers to.
    pub aliases: Vec<String>,
}
