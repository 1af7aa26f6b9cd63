//! Shared context for running CLI commands.

use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
};

use sift_config::{Config, Entity};

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Loaded configuration (default if no config files were found).
    pub config: Config,
}

impl CommandContext {
    /// Loads the current directory and configuration.
    ///
    /// An explicit `config_file` replaces discovery.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = load_config_or_failure(&cwd, config_file)?;
        Ok(Self { cwd, config })
    }

    /// Loads only the current directory, skipping configuration parsing.
    ///
    /// Used for commands like `init` or `parse` that work even when an existing config file is
    /// invalid.
    pub fn load_cwd_only() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        Ok(Self {
            cwd,
            config: Config::default(),
        })
    }

    /// Selects an entity, printing a consistent error on failure.
    pub fn entity(&self, name: Option<&str>) -> Result<&Entity, ExitCode> {
        self.config.entity(name).map_err(|e| {
            eprintln!("error: {e}");
            if self.config.files.is_empty() {
                eprintln!("Run 'sift init' to create a configuration file.");
            }
            ExitCode::FAILURE
        })
    }
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}

/// Loads configuration or exits with an error.
fn load_config_or_failure(cwd: &Path, config_file: Option<&Path>) -> Result<Config, ExitCode> {
    let loaded = match config_file {
        Some(path) => Config::load_from_files(&[path.to_path_buf()]),
        None => Config::load(cwd),
    };
    loaded.map_err(|e| {
        eprintln!("error: failed to load configuration: {e}");
        ExitCode::FAILURE
    })
}
