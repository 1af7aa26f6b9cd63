//! Configuration file discovery.
//!
//! Discovers `sift.toml` files by walking up the directory tree from a starting point,
//! then appending the global configuration if present.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::debug;

use crate::parse::is_root_config;

/// The configuration filename.
pub const CONFIG_FILENAME: &str = "sift.toml";

/// Discovers all configuration files relevant to the given directory.
///
/// Returns paths in precedence order: closest to `cwd` first, global config last. Discovery
/// stops at the first file that sets `root = true`, in which case the global config is
/// skipped as well.
pub fn discover_config_files(cwd: &Path) -> Vec<PathBuf> {
    let mut configs = Vec::new();
    let mut found_root = false;

    let mut current = Some(cwd);
    while let Some(dir) = current {
        let config_path = dir.join(CONFIG_FILENAME);
        if config_path.is_file() {
            let is_root = is_root_config(&config_path);
            debug!(path = %config_path.display(), root = is_root, "found config file");
            configs.push(config_path);
            if is_root {
                found_root = true;
                break;
            }
        }
        current = dir.parent();
    }

    if !found_root
        && let Some(global_path) = global_config_path()
        && global_path.is_file()
        && !configs.contains(&global_path)
    {
        debug!(path = %global_path.display(), "found global config file");
        configs.push(global_path);
    }

    configs
}

/// Returns the path of the global configuration file.
///
/// This is `sift.toml` in the platform configuration directory (for example
/// `~/.config/sift/sift.toml` on Linux). Returns `None` if no home directory is known.
pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "sift").map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

/// Checks if a path is the global configuration file.
pub fn is_global_config(path: &Path) -> bool {
    global_config_path().is_some_and(|global| path == global)
}
