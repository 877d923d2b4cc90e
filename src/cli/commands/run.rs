//! Run command implementation.
//!
//! The `lunex-setup run` command executes the full setup pipeline.

use crate::cli::args::RunArgs;
use crate::config::SetupConfig;
use crate::error::Result;
use crate::pipeline::{Pipeline, RunOptions};
use crate::sdk::SdkContext;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The run command implementation.
pub struct RunCommand<'a> {
    config: &'a SetupConfig,
    ctx: &'a SdkContext<'a>,
    args: RunArgs,
}

impl<'a> RunCommand<'a> {
    /// Create a new run command.
    pub fn new(config: &'a SetupConfig, ctx: &'a SdkContext<'a>, args: RunArgs) -> Self {
        Self { config, ctx, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &RunArgs {
        &self.args
    }

    fn build_options(&self) -> RunOptions {
        RunOptions {
            skip: self.args.skip.clone(),
            target: self.args.target.clone(),
        }
    }
}

impl Command for RunCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        tracing::info!("Setting up {}", self.ctx.root.display());
        let result = Pipeline::new(self.config, self.ctx).run(&self.build_options(), ui);

        if result.stopped {
            ui.message("Re-run setup once the missing dependencies are resolved.");
        } else if let Some(reason) = result.fatal() {
            tracing::debug!("Setup failed: {}", reason);
        } else if !result.compatibility().is_empty() {
            ui.message(&format!(
                "Running in compatibility mode without: {}",
                result.compatibility().join(", ")
            ));
        }

        Ok(match result.exit_code() {
            0 => CommandResult::success(),
            code => CommandResult::failure(code),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RepositoryList;
    use crate::net::MockDownloader;
    use crate::pipeline::Step;
    use crate::shell::{HostPlatform, MockLauncher, MockRunner};
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn run(root: &std::path::Path, args: RunArgs, ui: &mut MockUI) -> CommandResult {
        let runner = MockRunner::new();
        let downloader = MockDownloader::new();
        let launcher = MockLauncher::new();
        let env = |_: &str| None;
        let ctx = SdkContext {
            root,
            host: HostPlatform::Linux,
            runner: &runner,
            downloader: &downloader,
            launcher: &launcher,
            env: &env,
        };
        let mut config = SetupConfig::default();
        config.repositories = RepositoryList(Vec::new());
        RunCommand::new(&config, &ctx, args).execute(ui).unwrap()
    }

    #[test]
    fn missing_premake_fails_with_exit_code_one() {
        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::new();
        let args = RunArgs {
            skip: vec![Step::Vulkan, Step::Ktx],
            target: None,
        };

        let result = run(temp.path(), args, &mut ui);

        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
    }

    #[test]
    fn declined_sdks_report_compatibility_mode() {
        let temp = TempDir::new().unwrap();
        let premake = temp.path().join("vendor/bin/premake/premake5");
        fs::create_dir_all(premake.parent().unwrap()).unwrap();
        fs::write(&premake, "").unwrap();
        let mut ui = MockUI::new();

        let result = run(temp.path(), RunArgs::default(), &mut ui);

        assert!(result.success);
        assert!(ui.has_message("compatibility mode without: Vulkan SDK, KTX-Software"));
    }
}
