//! Project file generation with premake.
//!
//! This is the one fail-fast component: without generated project files
//! there is nothing left to set up.

use std::path::{Path, PathBuf};

use crate::config::GeneratorConfig;
use crate::error::{Result, SetupError};
use crate::shell::{CommandRunner, HostPlatform, Invocation};

/// Premake action for `host` when none is configured.
pub fn default_action(host: HostPlatform) -> &'static str {
    match host {
        HostPlatform::Windows => "vs2022",
        HostPlatform::Linux => "gmake2",
        HostPlatform::MacOs => "xcode4",
    }
}

/// Runs premake for the project.
pub struct ProjectGenerator<'a> {
    runner: &'a dyn CommandRunner,
    root: &'a Path,
    host: HostPlatform,
    config: &'a GeneratorConfig,
}

impl<'a> ProjectGenerator<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        root: &'a Path,
        host: HostPlatform,
        config: &'a GeneratorConfig,
    ) -> Self {
        Self {
            runner,
            root,
            host,
            config,
        }
    }

    /// Absolute path of the premake executable for the host.
    pub fn executable(&self) -> PathBuf {
        self.root
            .join(&self.config.premake_dir)
            .join(format!("premake5{}", self.host.exe_suffix()))
    }

    /// The action to run: `target` if given, then the configured action,
    /// then the host default.
    pub fn action(&self, target: Option<&str>) -> String {
        target
            .or(self.config.action.as_deref())
            .unwrap_or_else(|| default_action(self.host))
            .to_string()
    }

    /// Run premake with `action` from the project root.
    ///
    /// Returns the exit code (always 0). A missing executable is
    /// [`SetupError::ToolNotFound`]; a non-zero exit is
    /// [`SetupError::FatalGeneratorFailure`].
    pub fn generate(&self, action: &str) -> Result<i32> {
        let exe = self.executable();
        if !exe.is_file() {
            return Err(SetupError::ToolNotFound {
                tool: "premake5".to_string(),
                hint: format!("expected it at {}", exe.display()),
            });
        }

        tracing::info!("Running {} {}", exe.display(), action);
        let result = self
            .runner
            .run(&Invocation::new(exe.to_string_lossy(), [action]).in_dir(self.root))?;

        if result.success {
            Ok(0)
        } else {
            Err(SetupError::FatalGeneratorFailure {
                message: format!("premake5 {} failed with {}", action, result.failure_message()),
                code: result.exit_code,
            })
        }
    }
}
