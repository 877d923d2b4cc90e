//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands, RunArgs};
use crate::config::SetupConfig;
use crate::error::Result;
use crate::net::HttpDownloader;
use crate::sdk::{process_env, SdkContext};
use crate::shell::{HostPlatform, SystemLauncher, SystemRunner};
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output and prompts
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    project_root: PathBuf,
    config: SetupConfig,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given project root and configuration.
    pub fn new(project_root: PathBuf, config: SetupConfig) -> Self {
        Self {
            project_root,
            config,
        }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Dispatch and execute a command.
    ///
    /// Routes the CLI subcommand to the appropriate command implementation
    /// and executes it against the real host.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if let Some(Commands::Completions(args)) = &cli.command {
            return super::completions::CompletionsCommand::new(args.clone()).execute(ui);
        }

        let runner = if ui.output_mode().shows_command_output() {
            SystemRunner::streaming()
        } else {
            SystemRunner::captured()
        };
        let downloader = HttpDownloader::new()?;
        let launcher = SystemLauncher;
        let env = process_env;
        let ctx = SdkContext {
            root: &self.project_root,
            host: HostPlatform::current(),
            runner: &runner,
            downloader: &downloader,
            launcher: &launcher,
            env: &env,
        };

        match &cli.command {
            Some(Commands::Run(args)) => {
                super::run::RunCommand::new(&self.config, &ctx, args.clone()).execute(ui)
            }
            Some(Commands::Status(args)) => {
                super::status::StatusCommand::new(&self.config, &ctx, args.clone()).execute(ui)
            }
            Some(Commands::Sdk(args)) => {
                super::sdk::SdkCommand::new(&self.config, &ctx, args.clone()).execute(ui)
            }
            Some(Commands::Assimp) => {
                super::assimp::AssimpCommand::new(&self.project_root, &self.config.assimp)
                    .execute(ui)
            }
            Some(Commands::Completions(_)) => Ok(CommandResult::success()),
            None => {
                // Default to run command with default args
                super::run::RunCommand::new(&self.config, &ctx, RunArgs::default()).execute(ui)
            }
        }
    }
}
