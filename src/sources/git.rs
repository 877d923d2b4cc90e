//! Git operations used by the source fetcher.

use std::path::{Path, PathBuf};

use crate::config::RepositorySpec;
use crate::error::{Result, SetupError};
use crate::shell::{CommandResult, CommandRunner, Invocation};

/// Thin wrapper running git in the project root.
pub struct GitClient<'a> {
    runner: &'a dyn CommandRunner,
    root: PathBuf,
}

impl<'a> GitClient<'a> {
    pub fn new(runner: &'a dyn CommandRunner, root: &Path) -> Self {
        Self {
            runner,
            root: root.to_path_buf(),
        }
    }

    fn git<I, S>(&self, args: I) -> Result<CommandResult>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let invocation = Invocation::new("git", args).in_dir(&self.root);
        tracing::debug!("Running {}", invocation);
        self.runner.run(&invocation).map_err(|e| match e {
            SetupError::ToolNotFound { tool, .. } => SetupError::ToolNotFound {
                tool,
                hint: "install git from https://git-scm.com and re-run".to_string(),
            },
            other => other,
        })
    }

    /// Whether the project root is a git work tree.
    pub fn is_work_tree(&self) -> bool {
        self.root.join(".git").exists()
    }

    /// `git submodule update --init --recursive`.
    pub fn submodule_update(&self) -> Result<CommandResult> {
        self.git(["submodule", "update", "--init", "--recursive"])
    }

    /// Discard local changes and untracked files in every checkout.
    pub fn reset_submodules(&self) -> Result<()> {
        const RESET: [&str; 6] = ["submodule", "foreach", "--recursive", "git", "reset", "--hard"];
        const CLEAN: [&str; 6] = ["submodule", "foreach", "--recursive", "git", "clean", "-fdx"];

        for args in [RESET, CLEAN] {
            let result = self.git(args)?;
            if !result.success {
                tracing::warn!("git {} failed: {}", args.join(" "), result.failure_message());
            }
        }
        Ok(())
    }

    /// Shallow single-branch clone of `spec` into its local path.
    pub fn clone_shallow(&self, spec: &RepositorySpec) -> Result<()> {
        let path = spec.path.to_string_lossy().replace('\\', "/");
        let result = self.git([
            "clone",
            "--depth",
            "1",
            "--single-branch",
            "--branch",
            spec.reference.as_str(),
            spec.url.as_str(),
            path.as_str(),
        ])?;

        if result.success {
            Ok(())
        } else {
            Err(SetupError::CloneFailure {
                repository: path,
                message: result.failure_message(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::MockRunner;

    #[test]
    fn clone_uses_shallow_single_branch() {
        let runner = MockRunner::new();
        let git = GitClient::new(&runner, Path::new("/project"));
        let spec = RepositorySpec::new(
            "Lunex/vendor/imgui",
            "https://github.com/ocornut/imgui",
            "docking",
            "imgui.h",
        );

        git.clone_shallow(&spec).unwrap();

        let calls = runner.calls();
        assert_eq!(
            calls[0].command_line(),
            "git clone --depth 1 --single-branch --branch docking https://github.com/ocornut/imgui Lunex/vendor/imgui"
        );
        assert_eq!(calls[0].cwd.as_deref(), Some(Path::new("/project")));
    }

    #[test]
    fn clone_failure_names_repository() {
        let runner = MockRunner::new();
        runner.set_exit_code("git clone", 128);
        let git = GitClient::new(&runner, Path::new("/project"));
        let spec =
            RepositorySpec::new("Lunex/vendor/glm", "https://x/glm", "master", "glm/glm.hpp");

        let err = git.clone_shallow(&spec).unwrap_err();
        match err {
            SetupError::CloneFailure { repository, message } => {
                assert_eq!(repository, "Lunex/vendor/glm");
                assert!(message.contains("128"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn reset_runs_reset_then_clean() {
        let runner = MockRunner::new();
        let git = GitClient::new(&runner, Path::new("/project"));
        git.reset_submodules().unwrap();
        assert_eq!(
            runner.command_lines(),
            vec![
                "git submodule foreach --recursive git reset --hard",
                "git submodule foreach --recursive git clean -fdx",
            ]
        );
    }

    #[test]
    fn missing_git_has_install_hint() {
        let runner = MockRunner::new();
        runner.set_missing_tool("git");
        let git = GitClient::new(&runner, Path::new("/project"));
        let err = git.submodule_update().unwrap_err();
        assert!(err.to_string().contains("git-scm.com"));
    }
}
