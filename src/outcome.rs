//! Component results.
//!
//! Every pipeline component reports an [`Outcome`]; the verification
//! components build it from a [`VerificationResult`].

use serde::Serialize;

/// Tagged result of one pipeline component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Component finished with nothing to report.
    Ok,
    /// Component finished, but the run continues with reduced functionality.
    Degraded { reasons: Vec<String> },
    /// Component failed and no later step can proceed.
    Fatal { reason: String },
}

impl Outcome {
    /// Create a degraded outcome with a single reason.
    pub fn degraded(reason: impl Into<String>) -> Self {
        Self::Degraded {
            reasons: vec![reason.into()],
        }
    }

    /// Create a fatal outcome.
    pub fn fatal(reason: impl Into<String>) -> Self {
        Self::Fatal {
            reason: reason.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal { .. })
    }

    /// Human-readable reasons, empty for `Ok`.
    pub fn reasons(&self) -> Vec<String> {
        match self {
            Self::Ok => Vec::new(),
            Self::Degraded { reasons } => reasons.clone(),
            Self::Fatal { reason } => vec![reason.clone()],
        }
    }

    /// Combine two outcomes, keeping the most severe and all reasons.
    pub fn merge(self, other: Outcome) -> Outcome {
        match (self, other) {
            (Self::Fatal { reason }, _) | (_, Self::Fatal { reason }) => Self::Fatal { reason },
            (Self::Ok, Self::Ok) => Self::Ok,
            (a, b) => {
                let mut reasons = a.reasons();
                reasons.extend(b.reasons());
                Self::Degraded { reasons }
            }
        }
    }
}

/// Per-component verification outcome plus the missing items it found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerificationResult {
    /// Hard failures.
    pub missing: Vec<String>,
    /// Soft findings that do not fail verification.
    pub warnings: Vec<String>,
}

impl VerificationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no hard failure was recorded.
    pub fn is_ok(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn fail(&mut self, description: impl Into<String>) {
        self.missing.push(description.into());
    }

    pub fn warn(&mut self, description: impl Into<String>) {
        self.warnings.push(description.into());
    }

    /// Convert to an outcome. Warnings alone do not degrade.
    pub fn into_outcome(self) -> Outcome {
        if self.missing.is_empty() {
            Outcome::Ok
        } else {
            Outcome::Degraded {
                reasons: self.missing,
            }
        }
    }
}
