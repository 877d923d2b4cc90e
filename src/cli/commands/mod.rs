//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which loads the
//! configuration once and builds the host collaborators (process runner,
//! downloader, installer launcher) shared by every command.

pub mod assimp;
pub mod completions;
pub mod dispatcher;
pub mod run;
pub mod sdk;
pub mod status;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
