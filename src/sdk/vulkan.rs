//! Vulkan SDK check and interactive install.
//!
//! The LunarG installer is interactive and sets `VULKAN_SDK` for new
//! processes only, so a fresh install is often invisible to this run. The
//! flow re-probes after the operator confirms the installer finished and
//! otherwise asks for a new terminal.

use std::fs;
use std::path::PathBuf;

use crate::config::VulkanConfig;
use crate::net::{download_with_progress, extract_all};
use crate::shell::HostPlatform;
use crate::ui::{StatusKind, UserInterface};

use super::{
    download_and_launch, finish_found, SdkContext, SdkInstallation, SdkLocator, SdkReport,
    SdkSpec, SdkState,
};

pub const NAME: &str = "Vulkan SDK";

const MANUAL_URL: &str = "https://vulkan.lunarg.com/";
const PROMPT_KEY: &str = "install_vulkan";

/// Probe layout of the Vulkan SDK on `host`.
pub fn spec(config: &VulkanConfig, host: HostPlatform) -> SdkSpec {
    // LunarG ships capitalized directories only in the Windows SDK.
    let (header, dynamic_lib) = match host {
        HostPlatform::Windows => ("Include/vulkan/vulkan.h", "Bin/vulkan-1.dll"),
        HostPlatform::Linux => ("include/vulkan/vulkan.h", "lib/libvulkan.so"),
        HostPlatform::MacOs => ("include/vulkan/vulkan.h", "lib/libvulkan.dylib"),
    };

    SdkSpec {
        name: NAME.to_string(),
        vendor_dir: config.vendor_dir.clone(),
        env_var: config.env_var.clone(),
        header: PathBuf::from(header),
        dynamic_lib: Some(PathBuf::from(dynamic_lib)),
        static_lib: host.is_windows().then(|| PathBuf::from("Lib/vulkan-1.lib")),
        version: config.version.clone(),
        config_file: config.config_file.clone(),
        config_key: "VULKAN_SDK_PATH".to_string(),
    }
}

/// Locate, verify and if needed install the Vulkan SDK.
pub fn ensure_vulkan(
    ctx: &SdkContext<'_>,
    config: &VulkanConfig,
    ui: &mut dyn UserInterface,
) -> SdkReport {
    let spec = spec(config, ctx.host);
    let locator = SdkLocator::new(&spec, ctx.root, ctx.env);
    let mut report = SdkReport::new(NAME);

    match locator.locate() {
        None => {
            ui.show_banner(
                StatusKind::Failed,
                &[format!("ERROR: {} is not installed!", NAME)],
            );
            if !offer_install(ctx, config, &mut report, ui) {
                return report;
            }
            match locator.locate() {
                Some(found) => {
                    report.set_state(SdkState::Installed);
                    finish_found(&mut report, &locator, found, ui);
                }
                None => not_visible_yet(&mut report, ui),
            }
        }
        Some(found) if !found.matches_version(&spec.version) => {
            report.set_state(SdkState::Found);
            mismatch_banner(&found, &spec, ui);

            let mut current = found;
            if offer_install(ctx, config, &mut report, ui) {
                if let Some(updated) = locator
                    .locate()
                    .filter(|f| f.matches_version(&spec.version))
                {
                    report.set_state(SdkState::Installed);
                    current = updated;
                } else {
                    report.notes.push(
                        "The new SDK is not visible yet; open a new terminal and re-run setup"
                            .to_string(),
                    );
                }
            }

            let mismatched = !current.matches_version(&spec.version);
            finish_found(&mut report, &locator, current, ui);
            if mismatched && report.state == SdkState::Verified {
                report.verification.warn(format!(
                    "{} version differs from required {}",
                    NAME, spec.version
                ));
                report.set_state(SdkState::VerifiedWithWarnings);
            }
        }
        Some(found) => {
            report.set_state(SdkState::Found);
            finish_found(&mut report, &locator, found, ui);
        }
    }

    if ctx.host.is_windows() && !report.state.is_compatibility_mode() {
        if let Err(warning) = ensure_debug_libs(ctx, config, ui) {
            ui.warning(&warning);
            report.verification.warn(warning);
            if report.state == SdkState::Verified {
                report.set_state(SdkState::VerifiedWithWarnings);
            }
        }
    }

    report
}

fn mismatch_banner(found: &SdkInstallation, spec: &SdkSpec, ui: &mut dyn UserInterface) {
    let actual = found.version.clone().unwrap_or_else(|| {
        found
            .root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    });

    ui.show_banner(
        StatusKind::Warning,
        &[
            format!("{} found at {}", NAME, found.root.display()),
            "WARNING: incorrect version detected!".to_string(),
            format!("  Required: {}", spec.version),
            format!("  Found:    {}", actual),
            "You can continue, but there may be compatibility issues.".to_string(),
        ],
    );
}

/// Ask for and run the installer. Returns whether the installer ran; on
/// `false` the report carries the terminal state.
fn offer_install(
    ctx: &SdkContext<'_>,
    config: &VulkanConfig,
    report: &mut SdkReport,
    ui: &mut dyn UserInterface,
) -> bool {
    let found = report.state == SdkState::Found;

    let Some(url) = config.installers.get(&ctx.host) else {
        ui.message(&format!(
            "No {} installer is configured for {}. Install it manually from {}",
            NAME, ctx.host, MANUAL_URL
        ));
        if !found {
            report.set_state(SdkState::InstallFailed);
            report
                .notes
                .push(format!("no installer configured for {}", ctx.host));
        }
        return false;
    };

    let question = if found {
        format!("Install {} {}?", NAME, config.version)
    } else {
        format!("Install the {}?", NAME)
    };
    if !ui.confirm(PROMPT_KEY, &question, false) {
        if !found {
            ui.warning(&format!(
                "The project requires the {} to build. You can install it manually from {}",
                NAME, MANUAL_URL
            ));
            report.set_state(SdkState::UserDeclined);
            report.notes.push("installation declined".to_string());
        }
        return false;
    }

    report.set_state(SdkState::Installing);
    let dest = ctx.root.join(&config.vendor_dir).join("VulkanSDK.exe");
    let launched = download_and_launch(ctx, url, &dest, config.installer_sha256.as_deref(), ui)
        .and_then(|()| {
            ui.show_banner(
                StatusKind::Warning,
                &[
                    format!("IMPORTANT: complete the {} installer, then:", NAME),
                    "  1. Return to this window".to_string(),
                    "  2. Press Enter to continue".to_string(),
                    "If setup still cannot find the SDK, open a new terminal and re-run setup."
                        .to_string(),
                ],
            );
            ui.pause("Press Enter once the installer has finished...")
        });

    match launched {
        Ok(()) => true,
        Err(e) => {
            ui.error(&format!("{} installation failed: {}", NAME, e));
            ui.message(&format!("Download it manually from {}", url));
            if found {
                // The mismatched SDK is still usable.
                report.set_state(SdkState::Found);
            } else {
                report.set_state(SdkState::InstallFailed);
            }
            report.notes.push(e.to_string());
            false
        }
    }
}

fn not_visible_yet(report: &mut SdkReport, ui: &mut dyn UserInterface) {
    ui.show_banner(
        StatusKind::Warning,
        &[
            format!("{} is not visible to this process yet.", NAME),
            "  1. Close this window".to_string(),
            "  2. Restart your PC or open a new terminal".to_string(),
            "  3. Run setup again".to_string(),
        ],
    );
    report.set_state(SdkState::InstallFailed);
    report
        .notes
        .push("open a new terminal and re-run setup to pick up VULKAN_SDK".to_string());
}

/// Fetch the debug libraries into the vendor dir when `shaderc_sharedd.lib`
/// is missing. Errors are operator-facing warnings.
fn ensure_debug_libs(
    ctx: &SdkContext<'_>,
    config: &VulkanConfig,
    ui: &mut dyn UserInterface,
) -> Result<(), String> {
    let vendor = ctx.root.join(&config.vendor_dir);
    if vendor.join("Lib").join("shaderc_sharedd.lib").is_file() {
        ui.success(&format!("{} debug libraries found", NAME));
        return Ok(());
    }

    let Some(url) = &config.debug_libs_url else {
        return Ok(());
    };

    ui.message(&format!("{} debug libraries not found, downloading", NAME));
    let archive = vendor.join("VulkanSDK.zip");
    let result = download_with_progress(ui, ctx.downloader, url, &archive, None)
        .and_then(|_| extract_all(&archive, &vendor));
    fs::remove_file(&archive).ok();

    match result {
        Ok(count) => {
            ui.success(&format!(
                "Extracted {} debug library files into {}",
                count,
                config.vendor_dir.display()
            ));
            Ok(())
        }
        Err(e) => Err(format!(
            "Could not fetch {} debug libraries ({}). Download them manually from {}",
            NAME, e, url
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::MockDownloader;
    use crate::shell::{MockLauncher, MockRunner};
    use crate::ui::MockUI;
    use std::path::Path;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    struct Fixture {
        temp: TempDir,
        runner: MockRunner,
        downloader: MockDownloader,
        launcher: MockLauncher,
        env_value: Option<String>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                temp: TempDir::new().unwrap(),
                runner: MockRunner::new(),
                downloader: MockDownloader::new(),
                launcher: MockLauncher::new(),
                env_value: None,
            }
        }

        fn run(&self, host: HostPlatform, config: &VulkanConfig, ui: &mut MockUI) -> SdkReport {
            let value = self.env_value.clone();
            let env = move |_: &str| value.clone();
            let ctx = SdkContext {
                root: self.temp.path(),
                host,
                runner: &self.runner,
                downloader: &self.downloader,
                launcher: &self.launcher,
                env: &env,
            };
            ensure_vulkan(&ctx, config, ui)
        }
    }

    fn linux_config() -> VulkanConfig {
        VulkanConfig {
            installers: [(HostPlatform::Linux, "https://sdk/vulkan.run".to_string())]
                .into_iter()
                .collect(),
            ..VulkanConfig::default()
        }
    }

    #[test]
    fn spec_depends_on_host() {
        let config = VulkanConfig::default();
        let windows = spec(&config, HostPlatform::Windows);
        assert_eq!(windows.dynamic_lib, Some(PathBuf::from("Bin/vulkan-1.dll")));
        assert_eq!(windows.static_lib, Some(PathBuf::from("Lib/vulkan-1.lib")));

        assert_eq!(windows.header, PathBuf::from("Include/vulkan/vulkan.h"));

        let linux = spec(&config, HostPlatform::Linux);
        assert_eq!(linux.header, PathBuf::from("include/vulkan/vulkan.h"));
        assert_eq!(linux.dynamic_lib, Some(PathBuf::from("lib/libvulkan.so")));
        assert_eq!(linux.static_lib, None);

        let macos = spec(&config, HostPlatform::MacOs);
        assert_eq!(macos.header, PathBuf::from("include/vulkan/vulkan.h"));
    }

    #[test]
    fn linux_sdk_layout_is_found_through_env_var() {
        let system = TempDir::new().unwrap();
        let sdk_root = system.path().join("1.3.290.0/x86_64");
        touch(&sdk_root.join("include/vulkan/vulkan.h"));
        touch(&sdk_root.join("lib/libvulkan.so"));
        let project = TempDir::new().unwrap();
        let value = sdk_root.to_string_lossy().into_owned();
        let env = move |_: &str| Some(value.clone());
        let spec = spec(&VulkanConfig::default(), HostPlatform::Linux);
        let locator = SdkLocator::new(&spec, project.path(), &env);

        let found = locator.locate().unwrap();

        assert_eq!(found.root, sdk_root);
        assert_eq!(found.version.as_deref(), Some("1.3.290.0"));
        assert!(locator.verify_artifacts(&found).is_ok());
    }

    #[test]
    fn vendored_sdk_is_verified_and_configured() {
        let fx = Fixture::new();
        let vendor = fx.temp.path().join("Lunex/vendor/VulkanSDK");
        touch(&vendor.join("include/vulkan/vulkan.h"));
        touch(&vendor.join("lib/libvulkan.so"));
        let mut ui = MockUI::new();

        let report = fx.run(HostPlatform::Linux, &VulkanConfig::default(), &mut ui);

        assert_eq!(report.state, SdkState::Verified);
        let config = fs::read_to_string(fx.temp.path().join("vulkan_config.lua")).unwrap();
        assert!(config.contains("VULKAN_SDK_PATH = \""));
        assert!(config.contains("Lunex/vendor/VulkanSDK"));
        assert!(ui.prompts_shown().is_empty());
    }

    #[test]
    fn declined_install_is_compatibility_mode() {
        let fx = Fixture::new();
        let mut ui = MockUI::new();
        ui.set_prompt_response(PROMPT_KEY, "no");

        let report = fx.run(HostPlatform::Linux, &linux_config(), &mut ui);

        assert_eq!(report.state, SdkState::UserDeclined);
        assert!(report.state.is_compatibility_mode());
        assert!(ui.has_warning("vulkan.lunarg.com"));
        assert!(fx.downloader.requests().is_empty());
        assert!(!fx.temp.path().join("vulkan_config.lua").exists());
    }

    #[test]
    fn no_installer_for_host_gives_manual_instructions() {
        let fx = Fixture::new();
        let mut ui = MockUI::new();

        let report = fx.run(HostPlatform::Linux, &VulkanConfig::default(), &mut ui);

        assert_eq!(report.state, SdkState::InstallFailed);
        assert!(ui.prompts_shown().is_empty());
        assert!(ui.has_message("Install it manually"));
    }

    #[test]
    fn install_then_relocate_in_vendor_dir() {
        let mut fx = Fixture::new();
        fx.downloader = MockDownloader::new().with_file("https://sdk/vulkan.run", "bin");
        let vendor = fx.temp.path().join("Lunex/vendor/VulkanSDK");
        let installed = vendor.clone();
        fx.launcher = MockLauncher::on_launch(move |_| {
            touch(&installed.join("include/vulkan/vulkan.h"));
            touch(&installed.join("lib/libvulkan.so"));
        });
        let mut ui = MockUI::new();
        ui.set_prompt_response(PROMPT_KEY, "yes");

        let report = fx.run(HostPlatform::Linux, &linux_config(), &mut ui);

        assert_eq!(report.state, SdkState::Verified);
        assert_eq!(fx.launcher.launched(), vec![vendor.join("VulkanSDK.exe")]);
        assert_eq!(ui.pauses().len(), 1);
    }

    #[test]
    fn install_not_visible_asks_for_new_terminal() {
        let mut fx = Fixture::new();
        fx.downloader = MockDownloader::new().with_file("https://sdk/vulkan.run", "bin");
        let mut ui = MockUI::new();
        ui.set_prompt_response(PROMPT_KEY, "yes");

        let report = fx.run(HostPlatform::Linux, &linux_config(), &mut ui);

        assert_eq!(report.state, SdkState::InstallFailed);
        assert!(ui.has_banner("new terminal"));
        assert!(report.outcome().reasons().iter().any(|r| r.contains("new terminal")));
    }

    #[test]
    fn download_failure_is_install_failed() {
        let fx = Fixture::new();
        let mut ui = MockUI::new();
        ui.set_prompt_response(PROMPT_KEY, "yes");

        let report = fx.run(HostPlatform::Linux, &linux_config(), &mut ui);

        assert_eq!(report.state, SdkState::InstallFailed);
        assert!(fx.launcher.launched().is_empty());
        assert!(ui.has_error("installation failed"));
    }

    #[test]
    fn version_mismatch_declined_keeps_found_sdk() {
        let mut fx = Fixture::new();
        let system = TempDir::new().unwrap();
        let sdk_root = system.path().join("1.3.250.1");
        touch(&sdk_root.join("include/vulkan/vulkan.h"));
        touch(&sdk_root.join("lib/libvulkan.so"));
        fx.env_value = Some(sdk_root.to_string_lossy().into_owned());
        let mut ui = MockUI::new();
        ui.set_prompt_response(PROMPT_KEY, "no");

        let report = fx.run(HostPlatform::Linux, &linux_config(), &mut ui);

        assert_eq!(report.state, SdkState::VerifiedWithWarnings);
        assert!(ui.has_banner("incorrect version"));
        assert!(report.outcome().is_ok());
        assert!(fx.temp.path().join("vulkan_config.lua").exists());
    }

    #[test]
    fn windows_fetches_missing_debug_libs() {
        let mut fx = Fixture::new();
        let vendor = fx.temp.path().join("Lunex/vendor/VulkanSDK");
        for file in ["Include/vulkan/vulkan.h", "Bin/vulkan-1.dll", "Lib/vulkan-1.lib"] {
            touch(&vendor.join(file));
        }
        let config = VulkanConfig::default();
        let zip = crate::net::archive::tests::zip_bytes(&[("Lib/shaderc_sharedd.lib", "x")]);
        fx.downloader =
            MockDownloader::new().with_file(config.debug_libs_url.as_deref().unwrap(), zip);
        let mut ui = MockUI::new();

        let report = fx.run(HostPlatform::Windows, &config, &mut ui);

        assert_eq!(report.state, SdkState::Verified);
        assert!(vendor.join("Lib/shaderc_sharedd.lib").is_file());
        assert!(!vendor.join("VulkanSDK.zip").exists());
    }

    #[test]
    fn debug_lib_failure_is_a_warning() {
        let fx = Fixture::new();
        let vendor = fx.temp.path().join("Lunex/vendor/VulkanSDK");
        for file in ["Include/vulkan/vulkan.h", "Bin/vulkan-1.dll", "Lib/vulkan-1.lib"] {
            touch(&vendor.join(file));
        }
        let mut ui = MockUI::new();

        let report = fx.run(HostPlatform::Windows, &VulkanConfig::default(), &mut ui);

        assert_eq!(report.state, SdkState::VerifiedWithWarnings);
        assert!(ui.has_warning("debug libraries"));
        assert!(report.outcome().is_ok());
    }
}
