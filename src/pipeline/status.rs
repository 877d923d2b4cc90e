//! Read-only project status.
//!
//! Mirrors the pipeline's checks without installing, cloning, prompting,
//! writing config files or running premake.

use std::path::PathBuf;

use serde::Serialize;

use crate::config::SetupConfig;
use crate::generator::ProjectGenerator;
use crate::outcome::VerificationResult;
use crate::packages::PackageVerifier;
use crate::sdk::{ktx, vulkan, SdkContext, SdkInstallation, SdkLocator, SdkSpec};
use crate::sources::SourceFetcher;

/// Status of one SDK.
#[derive(Debug, Clone, Serialize)]
pub struct SdkStatus {
    pub name: String,
    pub required_version: String,
    pub installation: Option<SdkInstallation>,
    pub version_matches: bool,
    pub verification: VerificationResult,
}

/// Status of the project generator.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratorStatus {
    pub executable: PathBuf,
    pub present: bool,
    pub action: String,
}

/// Everything `lunex-setup status` reports.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub project_root: PathBuf,
    pub packages: VerificationResult,
    pub sources: VerificationResult,
    pub sdks: Vec<SdkStatus>,
    pub generator: GeneratorStatus,
}

impl StatusReport {
    /// Whether every component is usable.
    pub fn is_ready(&self) -> bool {
        self.packages.is_ok()
            && self.sources.is_ok()
            && self
                .sdks
                .iter()
                .all(|s| s.installation.is_some() && s.verification.is_ok())
            && self.generator.present
    }
}

fn sdk_status(spec: &SdkSpec, ctx: &SdkContext<'_>) -> SdkStatus {
    let locator = SdkLocator::new(spec, ctx.root, ctx.env);
    let installation = locator.locate();

    let verification = match &installation {
        Some(found) => locator.verify_artifacts(found),
        None => {
            let mut result = VerificationResult::new();
            result.fail(format!(
                "{} not found in {} or ${}",
                spec.name,
                spec.vendor_dir.display(),
                spec.env_var
            ));
            result
        }
    };

    SdkStatus {
        name: spec.name.clone(),
        required_version: spec.version.clone(),
        version_matches: installation
            .as_ref()
            .is_some_and(|i| i.matches_version(&spec.version)),
        installation,
        verification,
    }
}

/// Check every component without changing anything.
pub fn collect_status(config: &SetupConfig, ctx: &SdkContext<'_>) -> StatusReport {
    let packages = PackageVerifier::new(ctx.runner, &config.package_manager)
        .check_packages(config.packages.names());
    let sources = SourceFetcher::new(ctx.runner, ctx.root).verify(config.repositories.specs());

    let sdks = vec![
        sdk_status(&vulkan::spec(&config.vulkan, ctx.host), ctx),
        sdk_status(&ktx::spec(&config.ktx), ctx),
    ];

    let generator = ProjectGenerator::new(ctx.runner, ctx.root, ctx.host, &config.generator);
    let executable = generator.executable();
    let generator = GeneratorStatus {
        present: executable.is_file(),
        action: generator.action(None),
        executable,
    };

    StatusReport {
        project_root: ctx.root.to_path_buf(),
        packages,
        sources,
        sdks,
        generator,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RepositoryList, RepositorySpec};
    use crate::net::MockDownloader;
    use crate::shell::{HostPlatform, MockLauncher, MockRunner};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn status(root: &Path, runner: &MockRunner, config: &SetupConfig) -> StatusReport {
        let downloader = MockDownloader::new();
        let launcher = MockLauncher::new();
        let env = |_: &str| None;
        let ctx = SdkContext {
            root,
            host: HostPlatform::Linux,
            runner,
            downloader: &downloader,
            launcher: &launcher,
            env: &env,
        };
        collect_status(config, &ctx)
    }

    fn config() -> SetupConfig {
        let mut config = SetupConfig::default();
        config.repositories = RepositoryList(vec![RepositorySpec::new(
            "vendor/glm",
            "https://github.com/g-truc/glm",
            "master",
            "glm/glm.hpp",
        )]);
        config
    }

    #[test]
    fn empty_project_reports_everything_missing() {
        let temp = TempDir::new().unwrap();
        let runner = MockRunner::new();
        runner.set_exit_code("python -m pip show", 1);

        let report = status(temp.path(), &runner, &config());

        assert!(!report.is_ready());
        assert_eq!(report.packages.missing.len(), 2);
        assert_eq!(report.sources.missing.len(), 1);
        assert!(report.sdks.iter().all(|s| s.installation.is_none()));
        assert!(!report.generator.present);
    }

    #[test]
    fn status_never_installs_or_writes() {
        let temp = TempDir::new().unwrap();
        let runner = MockRunner::new();
        runner.set_exit_code("python -m pip show", 1);
        touch(&temp.path().join("Lunex/vendor/VulkanSDK/include/vulkan/vulkan.h"));

        let report = status(temp.path(), &runner, &config());

        assert!(report.sdks[0].installation.is_some());
        assert!(!runner.was_called("python -m pip install"));
        assert!(!runner.was_called("git"));
        assert!(!temp.path().join("vulkan_config.lua").exists());
    }

    #[test]
    fn complete_project_is_ready() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(&root.join("vendor/glm/glm/glm.hpp"));
        touch(&root.join("Lunex/vendor/VulkanSDK/include/vulkan/vulkan.h"));
        touch(&root.join("vendor/ktx/include/ktx.h"));
        touch(&root.join("vendor/bin/premake/premake5"));
        let runner = MockRunner::new();

        let report = status(root, &runner, &config());

        assert!(report.is_ready());
        assert!(report.sdks.iter().all(|s| s.version_matches));
        assert_eq!(report.generator.action, "gmake2");

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["sdks"][1]["name"], "KTX-Software");
        assert_eq!(json["sdks"][0]["installation"]["source"], "vendor");
    }
}
