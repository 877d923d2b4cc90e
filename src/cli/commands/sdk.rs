//! SDK command implementation.
//!
//! `lunex-setup sdk <vulkan|ktx>` runs one SDK flow on its own.

use crate::cli::args::{SdkArgs, SdkKind};
use crate::config::SetupConfig;
use crate::error::Result;
use crate::sdk::{ensure_ktx, ensure_vulkan, SdkContext, SdkState};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The sdk command implementation.
pub struct SdkCommand<'a> {
    config: &'a SetupConfig,
    ctx: &'a SdkContext<'a>,
    args: SdkArgs,
}

impl<'a> SdkCommand<'a> {
    pub fn new(config: &'a SetupConfig, ctx: &'a SdkContext<'a>, args: SdkArgs) -> Self {
        Self { config, ctx, args }
    }
}

impl Command for SdkCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let report = match self.args.sdk {
            SdkKind::Vulkan => {
                ui.show_header("Vulkan SDK");
                ensure_vulkan(self.ctx, &self.config.vulkan, ui)
            }
            SdkKind::Ktx => {
                ui.show_header("KTX-Software");
                ensure_ktx(self.ctx, &self.config.ktx, ui)
            }
        };

        match report.state {
            SdkState::Verified | SdkState::VerifiedWithWarnings => Ok(CommandResult::success()),
            // The operator chose this; the build runs in compatibility mode.
            SdkState::UserDeclined => Ok(CommandResult::success()),
            _ => {
                for reason in report.outcome().reasons() {
                    ui.warning(&reason);
                }
                Ok(CommandResult::failure(1))
            }
        }
    }
}
