//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::pipeline::Step;

/// Lunex Setup - prepares a workstation to build the Lunex engine.
#[derive(Debug, Parser)]
#[command(name = "lunex-setup")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default .lunex/setup.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (default: nearest directory with premake5.lua or .git)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Use defaults and LUNEX_PROMPT_* overrides, never prompt
    #[arg(long, global = true)]
    pub non_interactive: bool,

    /// Exit without waiting for Enter at the end
    #[arg(long, global = true)]
    pub no_pause: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the full setup (default if no command specified)
    Run(RunArgs),

    /// Check every component without changing anything
    Status(StatusArgs),

    /// Locate, verify and install a single SDK
    Sdk(SdkArgs),

    /// Set up the prebuilt Assimp libraries
    Assimp,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RunArgs {
    /// Skip specified steps (comma-separated)
    #[arg(long, value_delimiter = ',', value_enum)]
    pub skip: Vec<Step>,

    /// Premake action (e.g. vs2022, gmake2)
    #[arg(long, value_name = "ACTION")]
    pub target: Option<String>,
}

/// Arguments for the `status` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// SDKs handled by the `sdk` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SdkKind {
    Vulkan,
    Ktx,
}

/// Arguments for the `sdk` command.
#[derive(Debug, Clone, clap::Args)]
pub struct SdkArgs {
    /// SDK to set up
    #[arg(value_enum)]
    pub sdk: SdkKind,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl Cli {
    /// Whether prompts may be shown.
    pub fn is_interactive(&self) -> bool {
        !self.non_interactive && !crate::shell::is_ci()
    }
}
