//! Status command implementation.
//!
//! The `lunex-setup status` command reports what is installed without
//! changing anything. It always exits 0.

use crate::cli::args::StatusArgs;
use crate::config::SetupConfig;
use crate::error::{Result, SetupError};
use crate::outcome::VerificationResult;
use crate::pipeline::{collect_status, StatusReport};
use crate::sdk::SdkContext;
use crate::ui::{StatusKind, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// The status command implementation.
pub struct StatusCommand<'a> {
    config: &'a SetupConfig,
    ctx: &'a SdkContext<'a>,
    args: StatusArgs,
}

impl<'a> StatusCommand<'a> {
    /// Create a new status command.
    pub fn new(config: &'a SetupConfig, ctx: &'a SdkContext<'a>, args: StatusArgs) -> Self {
        Self { config, ctx, args }
    }
}

fn status_kind(verification: &VerificationResult) -> StatusKind {
    if !verification.is_ok() {
        StatusKind::Failed
    } else if !verification.warnings.is_empty() {
        StatusKind::Warning
    } else {
        StatusKind::Success
    }
}

fn show_component(
    ui: &mut dyn UserInterface,
    name: &str,
    detail: &str,
    verification: &VerificationResult,
) {
    let line = format!("{} {:<22} {}", status_kind(verification).icon(), name, detail);
    ui.message(line.trim_end());
    for missing in &verification.missing {
        ui.message(&format!("    - {}", missing));
    }
    for warning in &verification.warnings {
        ui.message(&format!("    ! {}", warning));
    }
}

fn show_report(ui: &mut dyn UserInterface, report: &StatusReport) {
    ui.show_header("Lunex Setup - Status");
    ui.message(&format!("Project: {}", report.project_root.display()));
    ui.message("");

    show_component(ui, "Runtime packages", "", &report.packages);
    show_component(ui, "Source dependencies", "", &report.sources);

    for sdk in &report.sdks {
        let detail = match &sdk.installation {
            Some(found) if sdk.version_matches => found.root.display().to_string(),
            Some(found) => format!(
                "{} (required {})",
                found.root.display(),
                sdk.required_version
            ),
            None => String::new(),
        };
        show_component(ui, &sdk.name, &detail, &sdk.verification);
    }

    let mut generator = VerificationResult::new();
    if !report.generator.present {
        generator.fail(format!("premake5 not found at {}", report.generator.executable.display()));
    }
    show_component(
        ui,
        "Project generator",
        &format!("premake5 {}", report.generator.action),
        &generator,
    );

    ui.message("");
    if report.is_ready() {
        ui.success("Ready to build");
    } else {
        ui.message("Run `lunex-setup` to fix the items above.");
    }
}

impl Command for StatusCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let report = collect_status(self.config, self.ctx);

        if self.args.json {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| SetupError::Other(anyhow::anyhow!("Failed to encode status: {}", e)))?;
            println!("{}", json);
        } else {
            show_report(ui, &report);
        }

        Ok(CommandResult::success())
    }
}
