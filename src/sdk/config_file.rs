//! Premake config files recording discovered SDK roots.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

use super::SdkSpec;

/// Render a path for a Lua string literal. Separators are always forward
/// slashes; no other character is rewritten.
pub fn lua_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Write `<config_key> = "<sdk_root>"` to the spec's config file under
/// `project_root`, replacing any previous file. Returns the written path.
pub fn write_config_file(
    project_root: &Path,
    spec: &SdkSpec,
    sdk_root: &Path,
) -> Result<PathBuf> {
    let path = project_root.join(&spec.config_file);
    let content = format!(
        "-- Generated by lunex-setup; re-run setup to refresh.\n{} = \"{}\"\n",
        spec.config_key,
        lua_path(sdk_root)
    );

    fs::write(&path, content)?;
    tracing::info!("Wrote {}", path.display());
    Ok(path)
}
