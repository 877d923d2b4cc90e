//! Configuration loading and schema.
//!
//! - Schema definitions and built-in defaults in [`schema`]
//! - File discovery and loading in [`loader`]
//!
//! # Example
//!
//! ```
//! use lunex_setup::config::load_config;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::create_dir_all(temp.path().join(".lunex")).unwrap();
//! fs::write(temp.path().join(".lunex/setup.yml"), "ktx:\n  version: 4.4.0\n").unwrap();
//!
//! let config = load_config(temp.path(), None).unwrap();
//! assert_eq!(config.ktx.version, "4.4.0");
//! assert_eq!(config.vulkan.version, "1.3.290");
//! ```

pub mod loader;
pub mod schema;

pub use loader::{
    find_project_root, load_config, load_config_file, parse_config, DEFAULT_CONFIG_PATH,
};
pub use schema::{
    default_repositories, AssimpConfig, GeneratorConfig, KtxConfig, PackageManagerConfig,
    PackagesConfig, RepositoryList, RepositorySpec, SetupConfig, VulkanConfig,
};
