//! Configuration file discovery and loading.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::SetupConfig;
use crate::error::{Result, SetupError};

/// Project-relative location of the optional config file.
pub const DEFAULT_CONFIG_PATH: &str = ".lunex/setup.yml";

/// Markers identifying the engine's project root.
const ROOT_MARKERS: &[&str] = &["premake5.lua", ".git"];

/// Find the project root by walking up from `start`.
///
/// Returns the first directory containing `premake5.lua` or `.git`.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| ROOT_MARKERS.iter().any(|m| dir.join(m).exists()))
        .map(Path::to_path_buf)
}

/// Load configuration for a project.
///
/// An explicit path must exist. Without one, `.lunex/setup.yml` under the
/// project root is used when present, otherwise built-in defaults.
pub fn load_config(project_root: &Path, explicit: Option<&Path>) -> Result<SetupConfig> {
    if let Some(path) = explicit {
        return load_config_file(path);
    }

    let path = project_root.join(DEFAULT_CONFIG_PATH);
    if path.is_file() {
        load_config_file(&path)
    } else {
        tracing::debug!("No config at {}, using defaults", path.display());
        Ok(SetupConfig::default())
    }
}

/// Load and parse a single config file.
pub fn load_config_file(path: &Path) -> Result<SetupConfig> {
    let content = fs::read_to_string(path).map_err(|e| SetupError::ConfigParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    parse_config(&content, path)
}

/// Parse YAML content into a [`SetupConfig`].
///
/// An empty document yields the defaults.
pub fn parse_config(content: &str, source_path: &Path) -> Result<SetupConfig> {
    if content.trim().is_empty() {
        return Ok(SetupConfig::default());
    }

    serde_yaml::from_str(content).map_err(|e| SetupError::ConfigParse {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}
