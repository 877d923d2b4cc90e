//! Unified status vocabulary for consistent CLI output.

use serde::Serialize;

use super::theme::SetupTheme;

/// Canonical status kinds used across all output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    /// Operation completed successfully.
    Success,
    /// Operation completed with reduced functionality.
    Warning,
    /// Operation failed.
    Failed,
    /// Operation was skipped.
    Skipped,
    /// Operation has not run.
    Pending,
}

impl StatusKind {
    /// Unicode icon for TTY output.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Success => "✓",
            Self::Warning => "⚠",
            Self::Failed => "✗",
            Self::Skipped => "○",
            Self::Pending => "◌",
        }
    }

    /// Bracketed text for non-TTY output.
    pub fn bracketed(self) -> &'static str {
        match self {
            Self::Success => "[ok]",
            Self::Warning => "[warn]",
            Self::Failed => "[FAIL]",
            Self::Skipped => "[skip]",
            Self::Pending => "[pending]",
        }
    }

    /// Styled icon string using the given theme.
    pub fn styled(self, theme: &SetupTheme) -> String {
        let icon = self.icon();
        match self {
            Self::Success => theme.success.apply_to(icon).to_string(),
            Self::Warning => theme.warning.apply_to(icon).to_string(),
            Self::Failed => theme.error.apply_to(icon).to_string(),
            Self::Skipped | Self::Pending => theme.dim.apply_to(icon).to_string(),
        }
    }

    /// Format a status line for non-TTY: bracketed + message.
    pub fn format_plain(self, msg: &str) -> String {
        format!("{} {}", self.bracketed(), msg)
    }
}
