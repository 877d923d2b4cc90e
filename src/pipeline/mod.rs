//! The setup pipeline.
//!
//! [`Pipeline`] runs packages, sources, the two SDKs and project generation
//! in that order. Each step produces an [`Outcome`]: degraded steps are
//! reported and the run continues, a fatal step stops it. [`status`] holds
//! the read-only counterpart used by `lunex-setup status`.

pub mod status;

pub use status::{collect_status, StatusReport};

use std::fmt;
use std::time::{Duration, Instant};

use clap::ValueEnum;
use serde::Serialize;

use crate::config::SetupConfig;
use crate::generator::ProjectGenerator;
use crate::outcome::Outcome;
use crate::packages::PackageVerifier;
use crate::sdk::{ensure_ktx, ensure_vulkan, SdkContext, SdkReport};
use crate::sources::SourceFetcher;
use crate::ui::{RunSummary, StatusKind, StepSummary, UserInterface};

/// One pipeline step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Packages,
    Sources,
    Vulkan,
    Ktx,
    Generate,
}

impl Step {
    /// All steps in execution order.
    pub const ALL: [Step; 5] = [
        Step::Packages,
        Step::Sources,
        Step::Vulkan,
        Step::Ktx,
        Step::Generate,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Packages => "packages",
            Self::Sources => "sources",
            Self::Vulkan => "vulkan",
            Self::Ktx => "ktx",
            Self::Generate => "generate",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Packages => "Runtime packages",
            Self::Sources => "Source dependencies",
            Self::Vulkan => "Vulkan SDK",
            Self::Ktx => "KTX-Software",
            Self::Generate => "Project files",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Options for a pipeline run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Steps not to run.
    pub skip: Vec<Step>,
    /// Premake action override.
    pub target: Option<String>,
}

/// Result of one executed or skipped step.
#[derive(Debug, Clone)]
pub struct StepRecord {
    pub step: Step,
    /// `None` when the step was skipped.
    pub outcome: Option<Outcome>,
    pub duration: Duration,
}

/// Result of a pipeline run.
#[derive(Debug)]
pub struct PipelineResult {
    pub steps: Vec<StepRecord>,
    /// SDK reports in run order.
    pub sdks: Vec<SdkReport>,
    /// The operator chose to stop after a degraded step.
    pub stopped: bool,
    pub duration: Duration,
}

impl PipelineResult {
    /// The fatal reason, if a step failed fatally.
    pub fn fatal(&self) -> Option<String> {
        self.steps.iter().find_map(|r| match &r.outcome {
            Some(Outcome::Fatal { reason }) => Some(reason.clone()),
            _ => None,
        })
    }

    /// Process exit code: 1 after a fatal step, 0 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.fatal().is_some() {
            1
        } else {
            0
        }
    }

    /// SDKs the engine builds without.
    pub fn compatibility(&self) -> Vec<String> {
        self.sdks
            .iter()
            .filter(|r| r.state.is_compatibility_mode())
            .map(|r| r.name.clone())
            .collect()
    }

    /// End-of-run summary for the UI.
    pub fn summary(&self) -> RunSummary {
        let compatibility = self.compatibility();
        let steps = self
            .steps
            .iter()
            .map(|record| {
                let (status, detail) = match &record.outcome {
                    None => (StatusKind::Skipped, Some("skipped".to_string())),
                    Some(Outcome::Ok) => (StatusKind::Success, None),
                    Some(Outcome::Degraded { .. }) => {
                        let compat = compatibility.iter().any(|c| c == record.step.title());
                        let detail = if compat { "compatibility mode" } else { "degraded" };
                        (StatusKind::Warning, Some(detail.to_string()))
                    }
                    Some(Outcome::Fatal { .. }) => (StatusKind::Failed, Some("failed".to_string())),
                };
                StepSummary {
                    name: record.step.title().to_string(),
                    status,
                    detail,
                    duration: record.outcome.as_ref().map(|_| record.duration),
                }
            })
            .collect();

        let warnings = self
            .steps
            .iter()
            .filter_map(|r| match &r.outcome {
                Some(outcome @ Outcome::Degraded { .. }) => Some(outcome.reasons()),
                _ => None,
            })
            .flatten()
            .collect();

        RunSummary {
            steps,
            total_duration: self.duration,
            success: self.fatal().is_none(),
            compatibility,
            warnings,
        }
    }
}

/// Runs the setup steps against one project.
pub struct Pipeline<'a> {
    config: &'a SetupConfig,
    ctx: &'a SdkContext<'a>,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a SetupConfig, ctx: &'a SdkContext<'a>) -> Self {
        Self { config, ctx }
    }

    /// Run every step not skipped by `options`, in order.
    pub fn run(&self, options: &RunOptions, ui: &mut dyn UserInterface) -> PipelineResult {
        let start = Instant::now();
        let selected: Vec<Step> = Step::ALL
            .into_iter()
            .filter(|s| !options.skip.contains(s))
            .collect();
        let total = selected.len();

        let mut result = PipelineResult {
            steps: Vec::new(),
            sdks: Vec::new(),
            stopped: false,
            duration: Duration::ZERO,
        };

        ui.show_header("Lunex Setup");
        let mut index = 0;
        let mut halted = false;

        for step in Step::ALL {
            if !selected.contains(&step) || halted {
                if !halted {
                    tracing::debug!("Skipping step {}", step);
                }
                result.steps.push(StepRecord {
                    step,
                    outcome: None,
                    duration: Duration::ZERO,
                });
                continue;
            }

            index += 1;
            ui.show_step(index, total, step.title());
            let step_start = Instant::now();
            let outcome = self.run_step(step, options, &mut result.sdks, ui);
            tracing::debug!("Step {} finished: {:?}", step, outcome);

            match &outcome {
                Outcome::Ok => {}
                Outcome::Degraded { reasons } => {
                    let mut lines = vec![format!(
                        "WARNING: {} completed with problems:",
                        step.title()
                    )];
                    lines.extend(reasons.iter().map(|r| format!("  - {}", r)));
                    ui.show_banner(StatusKind::Warning, &lines);

                    if step == Step::Sources
                        && !ui.confirm(
                            "continue",
                            "Some source dependencies are missing. Continue anyway?",
                            true,
                        )
                    {
                        ui.warning("Setup stopped by operator");
                        result.stopped = true;
                        halted = true;
                    }
                }
                Outcome::Fatal { reason } => {
                    ui.show_banner(
                        StatusKind::Failed,
                        &[format!("ERROR: {} failed", step.title()), reason.clone()],
                    );
                    halted = true;
                }
            }

            result.steps.push(StepRecord {
                step,
                outcome: Some(outcome),
                duration: step_start.elapsed(),
            });
        }

        result.duration = start.elapsed();
        ui.show_summary(&result.summary());
        result
    }

    fn run_step(
        &self,
        step: Step,
        options: &RunOptions,
        sdks: &mut Vec<SdkReport>,
        ui: &mut dyn UserInterface,
    ) -> Outcome {
        let ctx = self.ctx;
        match step {
            Step::Packages => {
                let verifier = PackageVerifier::new(ctx.runner, &self.config.package_manager);
                verifier
                    .ensure_packages(self.config.packages.names(), ui)
                    .outcome()
            }
            Step::Sources => {
                let fetcher = SourceFetcher::new(ctx.runner, ctx.root);
                fetcher
                    .ensure_repositories(self.config.repositories.specs(), ui)
                    .verification
                    .into_outcome()
            }
            Step::Vulkan => {
                let report = ensure_vulkan(ctx, &self.config.vulkan, ui);
                let outcome = report.outcome();
                sdks.push(report);
                outcome
            }
            Step::Ktx => {
                let report = ensure_ktx(ctx, &self.config.ktx, ui);
                let outcome = report.outcome();
                sdks.push(report);
                outcome
            }
            Step::Generate => {
                let generator =
                    ProjectGenerator::new(ctx.runner, ctx.root, ctx.host, &self.config.generator);
                let action = generator.action(options.target.as_deref());
                let mut spinner = ui.start_spinner(&format!("Running premake5 {}", action));
                match generator.generate(&action) {
                    Ok(_) => {
                        spinner.finish_success(&format!("Project files generated ({})", action));
                        Outcome::Ok
                    }
                    Err(e) => {
                        spinner.finish_error("Project generation failed");
                        Outcome::fatal(e.to_string())
                    }
                }
            }
        }
    }
}
