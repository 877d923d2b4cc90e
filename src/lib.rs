//! Lunex Setup - workstation bootstrap for the Lunex engine.
//!
//! `lunex-setup` checks and installs everything needed before the engine
//! can be built: runtime packages, vendored source repositories, the Vulkan
//! SDK and KTX-Software, and finally the premake-generated project files.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Built-in defaults and the optional YAML override file
//! - [`error`] - Error types and result aliases
//! - [`generator`] - Project file generation with premake
//! - [`net`] - Downloads and archive extraction
//! - [`outcome`] - Tagged per-component results
//! - [`packages`] - Runtime package verification
//! - [`pipeline`] - Fixed-order orchestration and the status report
//! - [`sdk`] - SDK discovery, verification and installation
//! - [`shell`] - Process execution, installer launching, host detection
//! - [`sources`] - Source dependency fetching
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```
//! use lunex_setup::outcome::Outcome;
//!
//! let outcome = Outcome::Ok
//!     .merge(Outcome::degraded("KTX-Software is running in compatibility mode"));
//! assert!(!outcome.is_fatal());
//! assert_eq!(outcome.reasons().len(), 1);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod net;
pub mod outcome;
pub mod packages;
pub mod pipeline;
pub mod sdk;
pub mod shell;
pub mod sources;
pub mod ui;

pub use error::{Result, SetupError};
