//! Error types for sift configuration.

use std::{io, path::PathBuf};

use thiserror::Error;
use toml::de;

/// Errors that can occur when loading or using configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to parse TOML configuration.
    #[error("failed to parse config file {path}: {source}")]
    ParseToml {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: de::Error,
    },

    /// A field declares a column kind that does not exist.
    #[error("field '{field}' of entity '{entity}': {message}")]
    InvalidColumnKind {
        /// Entity declaring the field.
        entity: String,
        /// Field name.
        field: String,
        /// Description of the problem.
        message: String,
    },

    /// Two fields, or a field and an alias, share a name within one entity.
    #[error("entity '{entity}' maps '{name}' more than once")]
    DuplicateField {
        /// Entity declaring the fields.
        entity: String,
        /// The repeated name.
        name: String,
    },

    /// The requested entity is not defined.
    #[error("unknown entity '{name}' (defined: {})", defined.join(", "))]
    UnknownEntity {
        /// Requested entity name.
        name: String,
        /// Entities that are defined.
        defined: Vec<String>,
    },

    /// No entity was requested and none could be chosen.
    #[error("no entity selected: set settings.default_entity or pass --entity")]
    NoEntitySelected,

    /// The configuration defines no entities.
    #[error("no entities are defined in configuration")]
    NoEntities,
}
