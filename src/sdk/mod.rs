//! SDK discovery, verification and installation.
//!
//! Both SDKs the engine needs follow the same shape, captured by
//! [`SdkSpec`]: a project-local vendor directory and an environment
//! variable are probed for a header; the first match is an
//! [`SdkInstallation`]. What happens when nothing is found differs per SDK
//! and lives in [`vulkan`] and [`ktx`].
//!
//! # Example
//!
//! ```
//! use lunex_setup::sdk::{SdkLocator, SdkSpec};
//! use std::path::PathBuf;
//! use tempfile::TempDir;
//!
//! let temp = TempDir::new().unwrap();
//! let spec = SdkSpec {
//!     name: "KTX-Software".to_string(),
//!     vendor_dir: PathBuf::from("vendor/ktx"),
//!     env_var: "KTX_SDK".to_string(),
//!     header: PathBuf::from("include/ktx.h"),
//!     dynamic_lib: None,
//!     static_lib: None,
//!     version: "4.3.2".to_string(),
//!     config_file: PathBuf::from("ktx_config.lua"),
//!     config_key: "KTX_SDK_PATH".to_string(),
//! };
//!
//! let no_env = |_: &str| None;
//! let locator = SdkLocator::new(&spec, temp.path(), &no_env);
//! assert!(locator.locate().is_none());
//! ```

pub mod config_file;
pub mod ktx;
pub mod msvc;
pub mod vulkan;

pub use config_file::{lua_path, write_config_file};
pub use ktx::ensure_ktx;
pub use vulkan::ensure_vulkan;

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::net::{download_with_progress, Downloader};
use crate::outcome::{Outcome, VerificationResult};
use crate::shell::{CommandRunner, HostPlatform, Launcher};
use crate::ui::UserInterface;

/// Environment lookup, injectable for tests.
pub type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Read a variable from the process environment.
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Static description of an SDK: where to look and what proves it is usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkSpec {
    /// Display name.
    pub name: String,
    /// Project-local root, relative to the project root.
    pub vendor_dir: PathBuf,
    /// Environment variable naming a system-wide root.
    pub env_var: String,
    /// Header whose presence validates a root.
    pub header: PathBuf,
    pub dynamic_lib: Option<PathBuf>,
    pub static_lib: Option<PathBuf>,
    /// Required version.
    pub version: String,
    /// Generated premake config file, relative to the project root.
    pub config_file: PathBuf,
    /// Lua variable written to the config file.
    pub config_key: String,
}

/// Where an installation was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SdkSource {
    Vendor,
    Environment,
}

/// A discovered SDK.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SdkInstallation {
    pub root: PathBuf,
    pub source: SdkSource,
    pub version: Option<String>,
}

impl SdkInstallation {
    /// Whether this installation satisfies `required`.
    ///
    /// An installation matches when its root path names the version (SDK
    /// installers put the version in the directory name) or its detected
    /// version starts with it.
    pub fn matches_version(&self, required: &str) -> bool {
        self.root.to_string_lossy().contains(required)
            || self
                .version
                .as_deref()
                .is_some_and(|v| v.starts_with(required))
    }
}

/// Lifecycle of an SDK check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SdkState {
    NotFound,
    Found,
    Installing,
    Installed,
    Verified,
    VerifiedWithWarnings,
    InstallFailed,
    UserDeclined,
}

impl SdkState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Verified | Self::VerifiedWithWarnings | Self::InstallFailed | Self::UserDeclined
        )
    }

    /// The engine builds without this SDK's features.
    pub fn is_compatibility_mode(self) -> bool {
        matches!(self, Self::InstallFailed | Self::UserDeclined | Self::NotFound)
    }
}

impl fmt::Display for SdkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotFound => "not found",
            Self::Found => "found",
            Self::Installing => "installing",
            Self::Installed => "installed",
            Self::Verified => "verified",
            Self::VerifiedWithWarnings => "verified with warnings",
            Self::InstallFailed => "install failed",
            Self::UserDeclined => "declined",
        };
        f.write_str(s)
    }
}

/// Final result of one SDK flow.
#[derive(Debug, Clone, Serialize)]
pub struct SdkReport {
    pub name: String,
    pub state: SdkState,
    pub installation: Option<SdkInstallation>,
    pub verification: VerificationResult,
    /// Config file written for premake, if any.
    pub config_file: Option<PathBuf>,
    /// Operator-facing notes explaining a soft failure.
    pub notes: Vec<String>,
}

impl SdkReport {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            state: SdkState::NotFound,
            installation: None,
            verification: VerificationResult::new(),
            config_file: None,
            notes: Vec::new(),
        }
    }

    pub fn with_state(mut self, state: SdkState) -> Self {
        self.state = state;
        self
    }

    /// Move to `state`, logging the transition.
    pub fn set_state(&mut self, state: SdkState) {
        tracing::debug!("{}: {} -> {}", self.name, self.state, state);
        self.state = state;
    }

    /// Outcome for the orchestrator. Soft failures degrade.
    pub fn outcome(&self) -> Outcome {
        if self.state.is_compatibility_mode() {
            let mut reasons = vec![format!("{} is running in compatibility mode", self.name)];
            reasons.extend(self.notes.iter().cloned());
            reasons.extend(self.verification.missing.iter().cloned());
            Outcome::Degraded { reasons }
        } else {
            Outcome::Ok
        }
    }
}

/// Collaborators of the SDK flows.
pub struct SdkContext<'a> {
    /// Absolute project root.
    pub root: &'a Path,
    pub host: HostPlatform,
    pub runner: &'a dyn CommandRunner,
    pub downloader: &'a dyn Downloader,
    pub launcher: &'a dyn Launcher,
    pub env: EnvLookup<'a>,
}

/// Finds and checks an installation of one SDK.
pub struct SdkLocator<'a> {
    spec: &'a SdkSpec,
    root: &'a Path,
    env: EnvLookup<'a>,
}

impl<'a> SdkLocator<'a> {
    pub fn new(spec: &'a SdkSpec, root: &'a Path, env: EnvLookup<'a>) -> Self {
        Self { spec, root, env }
    }

    /// Vendor directory first, then the environment variable.
    pub fn locate(&self) -> Option<SdkInstallation> {
        let vendor = self.root.join(&self.spec.vendor_dir);
        if vendor.join(&self.spec.header).is_file() {
            tracing::debug!("{} found in vendor dir {}", self.spec.name, vendor.display());
            return Some(SdkInstallation {
                root: vendor,
                source: SdkSource::Vendor,
                version: Some(self.spec.version.clone()),
            });
        }

        let env_root = (self.env)(&self.spec.env_var)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)?;

        if env_root.join(&self.spec.header).is_file() {
            tracing::debug!(
                "{} found via {}={}",
                self.spec.name,
                self.spec.env_var,
                env_root.display()
            );
            let version = extract_version(&env_root.to_string_lossy());
            return Some(SdkInstallation {
                root: env_root,
                source: SdkSource::Environment,
                version,
            });
        }

        tracing::debug!(
            "{} is set to {} but {} is missing there",
            self.spec.env_var,
            env_root.display(),
            self.spec.header.display()
        );
        None
    }

    /// Header is required; libraries only warn.
    pub fn verify_artifacts(&self, installation: &SdkInstallation) -> VerificationResult {
        let mut result = VerificationResult::new();
        let root = &installation.root;

        if !root.join(&self.spec.header).is_file() {
            result.fail(format!(
                "{} header not found: {}",
                self.spec.name,
                root.join(&self.spec.header).display()
            ));
        }

        if let Some(lib) = &self.spec.dynamic_lib {
            if !root.join(lib).is_file() {
                result.warn(format!("{} not found in {}", lib.display(), root.display()));
            }
        }

        if let Some(lib) = &self.spec.static_lib {
            if !root.join(lib).is_file() {
                result.warn(format!(
                    "{} not found (dynamic loading will be used)",
                    lib.display()
                ));
            }
        }

        result
    }
}

/// Pull a dotted version out of a path such as `C:/VulkanSDK/1.3.290.0`.
pub fn extract_version(text: &str) -> Option<String> {
    static VERSION: OnceLock<Option<Regex>> = OnceLock::new();
    let re = VERSION
        .get_or_init(|| Regex::new(r"\d+\.\d+\.\d+(?:\.\d+)?").ok())
        .as_ref()?;
    re.find_iter(text).last().map(|m| m.as_str().to_string())
}

/// Verify a located installation, write its config file and settle the
/// report's terminal state.
pub(crate) fn finish_found(
    report: &mut SdkReport,
    locator: &SdkLocator<'_>,
    installation: SdkInstallation,
    ui: &mut dyn UserInterface,
) {
    let spec = locator.spec;
    let verification = locator.verify_artifacts(&installation);

    for warning in &verification.warnings {
        ui.warning(warning);
    }

    if !verification.is_ok() {
        report.set_state(SdkState::InstallFailed);
    } else {
        match write_config_file(locator.root, spec, &installation.root) {
            Ok(path) => {
                ui.message(&format!("Configuration saved to {}", spec.config_file.display()));
                report.config_file = Some(path);
            }
            Err(e) => {
                ui.warning(&format!("Could not write {}: {}", spec.config_file.display(), e));
                report.verification.warn(e.to_string());
            }
        }
        ui.success(&format!("{} found: {}", spec.name, installation.root.display()));

        let warned = !verification.warnings.is_empty() || !report.verification.warnings.is_empty();
        report.set_state(if warned {
            SdkState::VerifiedWithWarnings
        } else {
            SdkState::Verified
        });
    }

    report.verification.missing.extend(verification.missing);
    report.verification.warnings.extend(verification.warnings);
    report.installation = Some(installation);
}

/// Download an installer and hand it to the OS.
pub(crate) fn download_and_launch(
    ctx: &SdkContext<'_>,
    url: &str,
    dest: &Path,
    expected_sha256: Option<&str>,
    ui: &mut dyn UserInterface,
) -> crate::error::Result<()> {
    download_with_progress(ui, ctx.downloader, url, dest, expected_sha256)?;
    ctx.launcher.launch(dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn spec() -> SdkSpec {
        SdkSpec {
            name: "Vulkan SDK".to_string(),
            vendor_dir: PathBuf::from("Lunex/vendor/VulkanSDK"),
            env_var: "VULKAN_SDK".to_string(),
            header: PathBuf::from("Include/vulkan/vulkan.h"),
            dynamic_lib: Some(PathBuf::from("Bin/vulkan-1.dll")),
            static_lib: Some(PathBuf::from("Lib/vulkan-1.lib")),
            version: "1.3.290".to_string(),
            config_file: PathBuf::from("vulkan_config.lua"),
            config_key: "VULKAN_SDK_PATH".to_string(),
        }
    }

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn vendor_dir_is_preferred_over_env() {
        let project = TempDir::new().unwrap();
        let system = TempDir::new().unwrap();
        touch(&project.path().join("Lunex/vendor/VulkanSDK/Include/vulkan/vulkan.h"));
        touch(&system.path().join("Include/vulkan/vulkan.h"));

        let system_root = system.path().to_string_lossy().into_owned();
        let env = move |_: &str| Some(system_root.clone());
        let spec = spec();
        let locator = SdkLocator::new(&spec, project.path(), &env);

        let found = locator.locate().unwrap();
        assert_eq!(found.source, SdkSource::Vendor);
        assert_eq!(found.root, project.path().join("Lunex/vendor/VulkanSDK"));
        assert_eq!(found.version.as_deref(), Some("1.3.290"));
    }

    #[test]
    fn env_root_requires_header() {
        let project = TempDir::new().unwrap();
        let system = TempDir::new().unwrap();

        let system_root = system.path().to_string_lossy().into_owned();
        let env = move |_: &str| Some(system_root.clone());
        let spec = spec();
        let locator = SdkLocator::new(&spec, project.path(), &env);
        assert!(locator.locate().is_none());

        touch(&system.path().join("Include/vulkan/vulkan.h"));
        let found = locator.locate().unwrap();
        assert_eq!(found.source, SdkSource::Environment);
    }

    #[test]
    fn empty_env_var_is_ignored() {
        let project = TempDir::new().unwrap();
        let env = |_: &str| Some(String::new());
        let spec = spec();
        let locator = SdkLocator::new(&spec, project.path(), &env);
        assert!(locator.locate().is_none());
    }

    #[test]
    fn verify_warns_on_missing_libraries() {
        let project = TempDir::new().unwrap();
        let root = project.path().join("sdk");
        touch(&root.join("Include/vulkan/vulkan.h"));
        touch(&root.join("Bin/vulkan-1.dll"));

        let env = |_: &str| None;
        let spec = spec();
        let locator = SdkLocator::new(&spec, project.path(), &env);
        let installation = SdkInstallation {
            root,
            source: SdkSource::Environment,
            version: None,
        };

        let result = locator.verify_artifacts(&installation);
        assert!(result.is_ok());
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("dynamic loading"));
    }

    #[test]
    fn verify_fails_without_header() {
        let project = TempDir::new().unwrap();
        let env = |_: &str| None;
        let spec = spec();
        let locator = SdkLocator::new(&spec, project.path(), &env);
        let installation = SdkInstallation {
            root: project.path().join("nowhere"),
            source: SdkSource::Vendor,
            version: None,
        };
        assert!(!locator.verify_artifacts(&installation).is_ok());
    }

    #[test]
    fn extract_version_from_path() {
        assert_eq!(
            extract_version("C:\\VulkanSDK\\1.3.290.0").as_deref(),
            Some("1.3.290.0")
        );
        assert_eq!(extract_version("/opt/vulkan/1.4.304/x86_64").as_deref(), Some("1.4.304"));
        assert_eq!(extract_version("/usr"), None);
    }

    #[test]
    fn version_match_uses_path_or_version() {
        let installation = SdkInstallation {
            root: PathBuf::from("C:/VulkanSDK/1.3.290.0"),
            source: SdkSource::Environment,
            version: Some("1.3.290.0".to_string()),
        };
        assert!(installation.matches_version("1.3.290"));
        assert!(!installation.matches_version("1.3.296"));
    }

    #[test]
    fn compatibility_states_degrade() {
        let report = SdkReport::new("KTX-Software").with_state(SdkState::UserDeclined);
        assert!(report.state.is_compatibility_mode());
        assert!(matches!(report.outcome(), Outcome::Degraded { .. }));
        assert!(report.outcome().reasons()[0].contains("compatibility mode"));

        let ok = SdkReport::new("KTX-Software").with_state(SdkState::VerifiedWithWarnings);
        assert!(ok.outcome().is_ok());
        assert!(ok.state.is_terminal());
    }
}
