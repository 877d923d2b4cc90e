//! Runtime package verification.
//!
//! The `PackageVerifier` checks each required package with the configured
//! package manager and installs the missing ones. Installation is
//! best-effort: one failing package does not stop the others.

use std::path::PathBuf;

use crate::config::PackageManagerConfig;
use crate::error::{Result, SetupError};
use crate::outcome::{Outcome, VerificationResult};
use crate::shell::{CommandRunner, Invocation};
use crate::ui::UserInterface;

/// Per-package result of an [`PackageVerifier::ensure_packages`] run.
#[derive(Debug, Default)]
pub struct PackageReport {
    /// Packages that were already present.
    pub present: Vec<String>,
    /// Packages installed by this run.
    pub installed: Vec<String>,
    /// Packages that could not be made available.
    pub failures: Vec<SetupError>,
}

impl PackageReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn outcome(&self) -> Outcome {
        if self.is_ok() {
            Outcome::Ok
        } else {
            Outcome::Degraded {
                reasons: self.failures.iter().map(ToString::to_string).collect(),
            }
        }
    }
}

/// Checks and installs runtime packages.
pub struct PackageVerifier<'a> {
    runner: &'a dyn CommandRunner,
    manager: &'a PackageManagerConfig,
}

impl<'a> PackageVerifier<'a> {
    pub fn new(runner: &'a dyn CommandRunner, manager: &'a PackageManagerConfig) -> Self {
        Self { runner, manager }
    }

    fn invocation(&self, template: &[String], name: &str) -> Invocation {
        Invocation::new(
            self.manager.program.clone(),
            PackageManagerConfig::expand(template, name),
        )
    }

    /// Whether `name` is installed. A missing package manager is an error.
    pub fn is_installed(&self, name: &str) -> Result<bool> {
        let result = self.runner.run(&self.invocation(&self.manager.check, name))?;
        Ok(result.success)
    }

    /// Install `name` and confirm it is present afterwards.
    pub fn install(&self, name: &str) -> Result<()> {
        let result = self
            .runner
            .run(&self.invocation(&self.manager.install, name))?;

        if !result.success {
            return Err(SetupError::InstallFailure {
                package: name.to_string(),
                message: result.failure_message(),
            });
        }

        if !self.is_installed(name)? {
            return Err(SetupError::MissingArtifact {
                what: "package after install".to_string(),
                path: PathBuf::from(name),
            });
        }

        Ok(())
    }

    /// Make every package in `names` available, installing missing ones.
    pub fn ensure_packages(&self, names: &[String], ui: &mut dyn UserInterface) -> PackageReport {
        let mut report = PackageReport::default();

        for name in names {
            let mut spinner = ui.start_spinner(&format!("Checking {}", name));

            match self.is_installed(name) {
                Ok(true) => {
                    spinner.finish_success(&format!("{} is installed", name));
                    report.present.push(name.clone());
                    continue;
                }
                Ok(false) => {}
                Err(e @ SetupError::ToolNotFound { .. }) => {
                    spinner.finish_error(&format!("{} not found", self.manager.program));
                    tracing::warn!("Package manager unavailable: {}", e);
                    report.failures.push(e);
                    break;
                }
                Err(e) => {
                    spinner.finish_error(&format!("Could not check {}", name));
                    report.failures.push(e);
                    continue;
                }
            }

            spinner.set_message(&format!("Installing {}", name));
            match self.install(name) {
                Ok(()) => {
                    spinner.finish_success(&format!("Installed {}", name));
                    report.installed.push(name.clone());
                }
                Err(e) => {
                    spinner.finish_error(&format!("Failed to install {}", name));
                    tracing::warn!("{}", e);
                    let stop = matches!(e, SetupError::ToolNotFound { .. });
                    report.failures.push(e);
                    if stop {
                        break;
                    }
                }
            }
        }

        report
    }

    /// Read-only check of every package.
    pub fn check_packages(&self, names: &[String]) -> VerificationResult {
        let mut result = VerificationResult::new();
        for name in names {
            match self.is_installed(name) {
                Ok(true) => {}
                Ok(false) => result.fail(format!("package '{}' is not installed", name)),
                Err(e) => {
                    result.fail(e.to_string());
                    break;
                }
            }
        }
        result
    }
}
