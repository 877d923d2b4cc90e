//! Interactive user interface components.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for interactive terminal usage
//! - [`NonInteractiveUI`] for CI/headless environments
//! - [`MockUI`] for scripted, headless tests
//! - Prompts, spinners, download bars and the run summary
//!
//! # Example
//!
//! ```
//! use lunex_setup::ui::{create_ui, OutputMode};
//!
//! // Use non-interactive mode for testability
//! let mut ui = create_ui(false, OutputMode::Quiet);
//! ui.show_header("Lunex Setup");
//! ui.success("Setup complete!");
//! ```

pub mod icons;
pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod progress;
pub mod prompts;
pub mod spinner;
pub mod terminal;
pub mod theme;

pub use icons::StatusKind;
pub use mock::{MockSpinner, MockUI};
pub use non_interactive::NonInteractiveUI;
pub use output::OutputMode;
pub use progress::{format_bytes, format_duration};
pub use prompts::{prompt_user, wait_for_enter};
pub use spinner::{ProgressSpinner, TransferBar};
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, SetupTheme};

use std::time::Duration;

use crate::error::Result;

/// Trait for user interface interactions.
///
/// Every operator interaction of the setup flow goes through this trait,
/// so the whole pipeline can run headless against [`MockUI`].
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Show a prompt and get user input.
    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult>;

    /// Block until the operator acknowledges (presses Enter).
    fn pause(&mut self, message: &str) -> Result<()>;

    /// Start a spinner for an operation.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    /// Start a byte-progress bar for a download.
    fn start_transfer(&mut self, label: &str) -> Box<dyn TransferHandle>;

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// Show a numbered pipeline step (e.g., "[2/5] Source dependencies").
    fn show_step(&mut self, current: usize, total: usize, title: &str);

    /// Show a framed block of lines, used for warnings the operator must notice.
    fn show_banner(&mut self, kind: StatusKind, lines: &[String]);

    /// Show the end-of-run summary.
    fn show_summary(&mut self, summary: &RunSummary);

    /// Check if running in interactive mode.
    fn is_interactive(&self) -> bool;

    /// Ask a yes/no question. Prompt errors count as "no".
    fn confirm(&mut self, key: &str, question: &str, default: bool) -> bool {
        let prompt = Prompt {
            key: key.to_string(),
            question: question.to_string(),
            prompt_type: PromptType::Confirm,
            default: Some(if default { "yes" } else { "no" }.to_string()),
        };

        match self.prompt(&prompt) {
            Ok(result) => result.as_bool().unwrap_or_else(|| {
                matches!(
                    result.as_string().to_lowercase().as_str(),
                    "true" | "yes" | "y" | "1"
                )
            }),
            Err(e) => {
                tracing::debug!("Prompt '{}' failed: {}", key, e);
                false
            }
        }
    }
}

/// Handle for controlling a spinner.
pub trait SpinnerHandle {
    /// Update the spinner message.
    fn set_message(&mut self, msg: &str);

    /// Mark the operation as successful.
    fn finish_success(&mut self, msg: &str);

    /// Mark the operation as failed.
    fn finish_error(&mut self, msg: &str);

    /// Mark as skipped.
    fn finish_skipped(&mut self, msg: &str);
}

/// Handle for a download progress display.
pub trait TransferHandle {
    /// Report bytes received so far and the total if known.
    fn update(&mut self, received: u64, total: Option<u64>);

    /// Mark the transfer as complete.
    fn finish(&mut self, msg: &str);

    /// Mark the transfer as failed.
    fn fail(&mut self, msg: &str);
}

/// A prompt to show to the user.
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Unique key for the prompt (used for overrides and test scripting).
    pub key: String,
    /// The question to display.
    pub question: String,
    /// The type of prompt.
    pub prompt_type: PromptType,
    /// Default value if user just presses enter.
    pub default: Option<String>,
}

/// The type of prompt.
#[derive(Debug, Clone)]
pub enum PromptType {
    /// Yes/no confirmation.
    Confirm,
    /// Free-form text input.
    Input,
}

/// Result of a prompt.
#[derive(Debug, Clone)]
pub enum PromptResult {
    /// Boolean result from confirm.
    Bool(bool),
    /// String result from input.
    String(String),
}

impl PromptResult {
    pub fn as_string(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::String(s) => s.clone(),
        }
    }

    /// Get as bool if this is a Bool result.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// One line of the end-of-run summary.
#[derive(Debug, Clone, PartialEq)]
pub struct StepSummary {
    pub name: String,
    pub status: StatusKind,
    /// Short right-hand detail (e.g., "compatibility mode").
    pub detail: Option<String>,
    pub duration: Option<Duration>,
}

/// End-of-run summary.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub steps: Vec<StepSummary>,
    pub total_duration: Duration,
    /// No step ended fatally.
    pub success: bool,
    /// Components running in compatibility mode.
    pub compatibility: Vec<String>,
    /// Reasons collected from degraded steps.
    pub warnings: Vec<String>,
}
