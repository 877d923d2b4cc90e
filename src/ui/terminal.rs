//! Interactive terminal UI.

use console::Term;
use std::io::Write;

use crate::error::Result;

use super::progress::format_duration;
use super::{
    prompt_user, should_use_colors, wait_for_enter, NonInteractiveUI, OutputMode,
    ProgressSpinner, Prompt, PromptResult, RunSummary, SetupTheme, SpinnerHandle, StatusKind,
    TransferBar, TransferHandle, UserInterface,
};

/// Interactive terminal UI implementation.
pub struct TerminalUI {
    term: Term,
    theme: SetupTheme,
    mode: OutputMode,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(mode: OutputMode) -> Self {
        let theme = if should_use_colors() {
            SetupTheme::new()
        } else {
            SetupTheme::plain()
        };

        Self {
            term: Term::stdout(),
            theme,
            mode,
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_messages() {
            writeln!(self.term, "{}", msg).ok();
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", self.theme.format_success(msg)).ok();
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", self.theme.format_warning(msg)).ok();
        }
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.term, "{}", self.theme.format_error(msg)).ok();
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        prompt_user(prompt, &self.term)
    }

    fn pause(&mut self, message: &str) -> Result<()> {
        wait_for_enter(message, &self.term)
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            Box::new(ProgressSpinner::new(message, self.theme.clone()))
        } else {
            Box::new(ProgressSpinner::hidden())
        }
    }

    fn start_transfer(&mut self, label: &str) -> Box<dyn TransferHandle> {
        if self.mode.shows_spinners() {
            Box::new(TransferBar::new(label, self.theme.clone()))
        } else {
            Box::new(TransferBar::hidden(label))
        }
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "\n{}\n", self.theme.format_header(title)).ok();
        }
    }

    fn show_step(&mut self, current: usize, total: usize, title: &str) {
        if self.mode.shows_status() {
            writeln!(
                self.term,
                "\n{}",
                self.theme.format_step(current, total, title)
            )
            .ok();
        }
    }

    fn show_banner(&mut self, kind: StatusKind, lines: &[String]) {
        if !self.mode.shows_status() && kind != StatusKind::Failed {
            return;
        }

        let style = match kind {
            StatusKind::Failed => &self.theme.error,
            StatusKind::Warning => &self.theme.warning,
            _ => &self.theme.border,
        };
        let rule = "!".repeat(60);

        writeln!(self.term).ok();
        writeln!(self.term, "{}", style.apply_to(&rule)).ok();
        for line in lines {
            writeln!(self.term, "{}", style.apply_to(line)).ok();
        }
        writeln!(self.term, "{}", style.apply_to(&rule)).ok();
    }

    fn show_summary(&mut self, summary: &RunSummary) {
        if !self.mode.shows_status() {
            return;
        }

        let b = &self.theme.border;

        writeln!(self.term).ok();
        writeln!(
            self.term,
            "  {} {}",
            b.apply_to("┌─"),
            b.apply_to("Summary ──────────────────────────")
        )
        .ok();

        for step in &summary.steps {
            let icon = step.status.styled(&self.theme);
            let right_side = match (&step.detail, step.duration) {
                (Some(detail), _) => self.theme.dim.apply_to(detail.as_str()).to_string(),
                (None, Some(d)) => self.theme.duration.apply_to(format_duration(d)).to_string(),
                (None, None) => String::new(),
            };

            writeln!(
                self.term,
                "  {} {} {:<24} {}",
                b.apply_to("│"),
                icon,
                step.name,
                right_side,
            )
            .ok();
        }

        writeln!(
            self.term,
            "  {}",
            b.apply_to("├────────────────────────────────────")
        )
        .ok();
        writeln!(
            self.term,
            "  {} Total: {}",
            b.apply_to("│"),
            self.theme
                .duration
                .apply_to(format_duration(summary.total_duration)),
        )
        .ok();
        writeln!(
            self.term,
            "  {}",
            b.apply_to("└────────────────────────────────────")
        )
        .ok();

        for name in &summary.compatibility {
            writeln!(
                self.term,
                "  {}",
                self.theme
                    .format_warning(&format!("{} is running in compatibility mode", name))
            )
            .ok();
        }

        if summary.success {
            writeln!(self.term, "  {}", self.theme.format_success("Setup complete!")).ok();
        } else {
            writeln!(self.term, "  {}", self.theme.format_error("Setup failed")).ok();
        }
    }

    fn is_interactive(&self) -> bool {
        self.term.is_term()
    }
}

/// Create the appropriate UI based on context.
pub fn create_ui(interactive: bool, mode: OutputMode) -> Box<dyn UserInterface> {
    if interactive && Term::stdout().is_term() {
        Box::new(TerminalUI::new(mode))
    } else {
        Box::new(NonInteractiveUI::new(mode))
    }
}
