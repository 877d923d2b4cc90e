//! Non-interactive UI for CI/headless environments.

use std::collections::HashMap;

use crate::error::{Result, SetupError};

use super::progress::format_duration;
use super::spinner::{ProgressSpinner, TransferBar};
use super::theme::SetupTheme;
use super::{
    OutputMode, Prompt, PromptResult, PromptType, RunSummary, SpinnerHandle, StatusKind,
    TransferHandle, UserInterface,
};

/// Prefix of environment variables that answer prompts in non-interactive mode.
pub const PROMPT_ENV_PREFIX: &str = "LUNEX_PROMPT_";

/// UI implementation for non-interactive mode.
///
/// Prompts are answered from `LUNEX_PROMPT_<KEY>` environment variables or
/// the prompt default; pauses return immediately.
pub struct NonInteractiveUI {
    mode: OutputMode,
    env_overrides: HashMap<String, String>,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        let env_overrides: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with(PROMPT_ENV_PREFIX))
            .collect();

        Self {
            mode,
            env_overrides,
        }
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            env_overrides: overrides,
        }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_messages() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", StatusKind::Success.format_plain(msg));
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("{}", StatusKind::Warning.format_plain(msg));
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("{}", StatusKind::Failed.format_plain(msg));
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        let env_key = format!("{}{}", PROMPT_ENV_PREFIX, prompt.key.to_uppercase());
        let answer = self
            .env_overrides
            .get(&env_key)
            .or(prompt.default.as_ref())
            .cloned();

        let Some(answer) = answer else {
            return Err(SetupError::Other(anyhow::anyhow!(
                "Cannot prompt for '{}' in non-interactive mode (no default value)",
                prompt.key
            )));
        };

        tracing::debug!("Answering prompt '{}' with '{}'", prompt.key, answer);

        match prompt.prompt_type {
            PromptType::Confirm => Ok(PromptResult::Bool(super::prompts::parse_bool(&answer))),
            PromptType::Input => Ok(PromptResult::String(answer)),
        }
    }

    fn pause(&mut self, _message: &str) -> Result<()> {
        Ok(())
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_messages() {
            println!("  {}", message);
        }
        Box::new(ProgressSpinner::hidden())
    }

    fn start_transfer(&mut self, label: &str) -> Box<dyn TransferHandle> {
        if self.mode.shows_messages() {
            println!("  Downloading {}", label);
        }
        Box::new(TransferBar::hidden(label))
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n{}\n", title);
        }
    }

    fn show_step(&mut self, current: usize, total: usize, title: &str) {
        if self.mode.shows_status() {
            println!("\n{}", SetupTheme::plain().format_step(current, total, title));
        }
    }

    fn show_banner(&mut self, kind: StatusKind, lines: &[String]) {
        if !self.mode.shows_status() && kind != StatusKind::Failed {
            return;
        }
        eprintln!();
        eprintln!("{}", "!".repeat(60));
        for line in lines {
            eprintln!("{}", line);
        }
        eprintln!("{}", "!".repeat(60));
    }

    fn show_summary(&mut self, summary: &RunSummary) {
        if !self.mode.shows_status() {
            return;
        }

        println!();
        println!("  ┌─ Summary ──────────────────────────");
        for step in &summary.steps {
            let right_side = match (&step.detail, step.duration) {
                (Some(detail), _) => detail.clone(),
                (None, Some(d)) => format_duration(d),
                (None, None) => String::new(),
            };
            println!(
                "  │ {} {:<24} {}",
                step.status.bracketed(),
                step.name,
                right_side
            );
        }
        println!("  ├────────────────────────────────────");
        println!("  │ Total: {}", format_duration(summary.total_duration));
        println!("  └────────────────────────────────────");

        for name in &summary.compatibility {
            println!("  {} is running in compatibility mode", name);
        }

        if summary.success {
            println!("  Setup complete!");
        } else {
            eprintln!("  Setup failed");
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }
}
