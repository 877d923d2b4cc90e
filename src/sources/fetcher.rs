//! Ensuring the vendored source repositories are on disk.
//!
//! The fetch runs in three phases:
//!
//! 1. Bulk `git submodule update`, retried once after a hard reset of all
//!    checkouts.
//! 2. If the bulk path still fails, a shallow clone of every repository
//!    whose directory is missing or empty. Non-empty directories are left
//!    alone.
//! 3. Probe verification of every repository, whichever path ran.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::RepositorySpec;
use crate::error::SetupError;
use crate::outcome::VerificationResult;
use crate::shell::CommandRunner;
use crate::ui::UserInterface;

use super::git::GitClient;

/// Which path brought the repositories onto disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPath {
    /// Bulk submodule init succeeded.
    Submodules,
    /// Fell back to cloning repositories one by one.
    PerRepository,
    /// git was unavailable; only verification ran.
    VerifyOnly,
}

/// Result of [`SourceFetcher::ensure_repositories`].
#[derive(Debug)]
pub struct FetchReport {
    pub path: FetchPath,
    /// Repositories cloned by the per-repository fallback.
    pub cloned: Vec<String>,
    pub verification: VerificationResult,
}

/// Fetches source dependencies into the project tree.
pub struct SourceFetcher<'a> {
    git: GitClient<'a>,
    root: PathBuf,
}

impl<'a> SourceFetcher<'a> {
    pub fn new(runner: &'a dyn CommandRunner, root: &Path) -> Self {
        Self {
            git: GitClient::new(runner, root),
            root: root.to_path_buf(),
        }
    }

    /// Bring every repository onto disk and verify its probe file.
    ///
    /// Never fails; problems are reported in the verification result.
    pub fn ensure_repositories(
        &self,
        specs: &[RepositorySpec],
        ui: &mut dyn UserInterface,
    ) -> FetchReport {
        let mut verification = VerificationResult::new();
        let mut cloned = Vec::new();

        let path = match self.bulk_init(ui) {
            Ok(true) => FetchPath::Submodules,
            Ok(false) => {
                self.clone_missing(specs, ui, &mut cloned, &mut verification);
                FetchPath::PerRepository
            }
            Err(e) => {
                ui.warning(&e.to_string());
                verification.fail(e.to_string());
                FetchPath::VerifyOnly
            }
        };

        self.verify_into(specs, &mut verification);

        if verification.is_ok() {
            ui.success(&format!("{} source dependencies verified", specs.len()));
        }

        FetchReport {
            path,
            cloned,
            verification,
        }
    }

    /// Bulk submodule init with one reset-and-retry. `Ok(false)` means the
    /// per-repository fallback should run.
    fn bulk_init(&self, ui: &mut dyn UserInterface) -> Result<bool, SetupError> {
        if !self.git.is_work_tree() {
            tracing::info!(
                "{} is not a git work tree, cloning repositories individually",
                self.root.display()
            );
            return Ok(false);
        }

        let mut spinner = ui.start_spinner("Updating git submodules");
        let first = self.git.submodule_update()?;
        if first.success {
            spinner.finish_success("Submodules up to date");
            return Ok(true);
        }

        tracing::warn!("Submodule update failed: {}", first.failure_message());
        spinner.set_message("Submodule update failed, resetting checkouts");
        self.git.reset_submodules()?;

        spinner.set_message("Retrying submodule update");
        let retry = self.git.submodule_update()?;
        if retry.success {
            spinner.finish_success("Submodules up to date after reset");
            Ok(true)
        } else {
            spinner.finish_error(&format!(
                "Submodule update failed: {}",
                retry.failure_message()
            ));
            Ok(false)
        }
    }

    fn clone_missing(
        &self,
        specs: &[RepositorySpec],
        ui: &mut dyn UserInterface,
        cloned: &mut Vec<String>,
        verification: &mut VerificationResult,
    ) {
        for spec in specs {
            let dir = self.root.join(&spec.path);

            if dir.exists() && !is_empty_dir(&dir) {
                tracing::debug!("{} already present, leaving it alone", dir.display());
                continue;
            }

            if dir.is_dir() {
                if let Err(e) = fs::remove_dir(&dir) {
                    verification.fail(format!("could not remove empty {}: {}", dir.display(), e));
                    continue;
                }
            }
            if let Some(parent) = dir.parent() {
                if let Err(e) = fs::create_dir_all(parent) {
                    verification.fail(format!("could not create {}: {}", parent.display(), e));
                    continue;
                }
            }

            let mut spinner = ui.start_spinner(&format!("Cloning {}", spec.name()));
            match self.git.clone_shallow(spec) {
                Ok(()) => {
                    spinner.finish_success(&format!("Cloned {}", spec.name()));
                    cloned.push(spec.name());
                }
                Err(e @ SetupError::ToolNotFound { .. }) => {
                    spinner.finish_error("git not found");
                    verification.fail(e.to_string());
                    return;
                }
                Err(e) => {
                    spinner.finish_error(&format!("Failed to clone {}", spec.name()));
                    verification.fail(e.to_string());
                }
            }
        }
    }

    /// Read-only probe check of every repository.
    pub fn verify(&self, specs: &[RepositorySpec]) -> VerificationResult {
        let mut result = VerificationResult::new();
        self.verify_into(specs, &mut result);
        result
    }

    fn verify_into(&self, specs: &[RepositorySpec], result: &mut VerificationResult) {
        for spec in specs {
            let probe = self.root.join(&spec.path).join(&spec.probe);
            if !probe.is_file() {
                result.fail(format!(
                    "{}: missing {}",
                    spec.path.display(),
                    spec.probe.display()
                ));
            }
        }
    }
}

fn is_empty_dir(path: &Path) -> bool {
    fs::read_dir(path)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}
