//! Progress spinners and download bars.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use super::progress::format_bytes;
use super::theme::SetupTheme;
use super::{SpinnerHandle, TransferHandle};

/// A progress spinner for long-running operations.
pub struct ProgressSpinner {
    bar: ProgressBar,
    theme: SetupTheme,
}

impl ProgressSpinner {
    /// Create a new spinner with a message.
    pub fn new(message: &str, theme: SetupTheme) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
            .template("  {spinner:.cyan} {msg}")
        {
            bar.set_style(style);
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));

        Self { bar, theme }
    }

    /// Create a spinner that doesn't show (for silent mode).
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            theme: SetupTheme::plain(),
        }
    }

    fn finish_with(&mut self, line: String) {
        if let Ok(style) = ProgressStyle::default_spinner().template("  {msg}") {
            self.bar.set_style(style);
        }
        self.bar.finish_with_message(line);
    }
}

impl SpinnerHandle for ProgressSpinner {
    fn set_message(&mut self, msg: &str) {
        self.bar.set_message(msg.to_string());
    }

    fn finish_success(&mut self, msg: &str) {
        let line = self.theme.format_success(msg);
        self.finish_with(line);
    }

    fn finish_error(&mut self, msg: &str) {
        let line = self.theme.format_error(msg);
        self.finish_with(line);
    }

    fn finish_skipped(&mut self, msg: &str) {
        let line = self.theme.format_skipped(msg);
        self.finish_with(line);
    }
}

/// Byte-progress bar for downloads.
///
/// Switches from a spinner to a bounded bar once the total size is known.
pub struct TransferBar {
    bar: ProgressBar,
    label: String,
    bounded: bool,
    theme: SetupTheme,
}

impl TransferBar {
    pub fn new(label: &str, theme: SetupTheme) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("  {spinner} {msg} {bytes}") {
            bar.set_style(style);
        }
        bar.set_message(label.to_string());
        bar.enable_steady_tick(Duration::from_millis(120));

        Self {
            bar,
            label: label.to_string(),
            bounded: false,
            theme,
        }
    }

    pub fn hidden(label: &str) -> Self {
        Self {
            bar: ProgressBar::hidden(),
            label: label.to_string(),
            bounded: false,
            theme: SetupTheme::plain(),
        }
    }

    /// Position of the underlying bar, for tests.
    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl TransferHandle for TransferBar {
    fn update(&mut self, received: u64, total: Option<u64>) {
        if let (Some(total), false) = (total, self.bounded) {
            self.bar.set_length(total);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("  {msg} [{bar:30.cyan/dim}] {percent:>3}% {bytes}/{total_bytes}")
            {
                self.bar.set_style(style.progress_chars("█▓░"));
            }
            self.bounded = true;
        }
        self.bar.set_position(received);
    }

    fn finish(&mut self, msg: &str) {
        let size = format_bytes(self.bar.position());
        if let Ok(style) = ProgressStyle::default_bar().template("  {msg}") {
            self.bar.set_style(style);
        }
        self.bar.finish_with_message(
            self.theme
                .format_success(&format!("{} ({}, {})", msg, self.label, size)),
        );
    }

    fn fail(&mut self, msg: &str) {
        if let Ok(style) = ProgressStyle::default_bar().template("  {msg}") {
            self.bar.set_style(style);
        }
        self.bar.abandon_with_message(self.theme.format_error(msg));
    }
}
