//! KTX-Software check and install.
//!
//! KTX is optional: without it the engine compresses no textures. Installing
//! assembles a project-local SDK in the vendor directory from three pieces:
//! headers from the source archive, `ktx.dll` from the official installer,
//! and an import library synthesized with MSVC when available.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::KtxConfig;
use crate::error::{Result, SetupError};
use crate::net::{download_with_progress, extract_filtered};
use crate::ui::{Prompt, PromptType, StatusKind, UserInterface};

use super::msvc::{find_msvc_tools, synthesize_import_lib};
use super::{
    download_and_launch, finish_found, SdkContext, SdkLocator, SdkReport, SdkSpec, SdkState,
};

pub const NAME: &str = "KTX-Software";

const PROMPT_KEY: &str = "install_ktx";
const DIR_PROMPT_KEY: &str = "ktx_install_dir";
const DLL: &str = "ktx.dll";

/// Probe layout of a KTX-Software SDK.
pub fn spec(config: &KtxConfig) -> SdkSpec {
    SdkSpec {
        name: NAME.to_string(),
        vendor_dir: config.vendor_dir.clone(),
        env_var: config.env_var.clone(),
        header: PathBuf::from("include/ktx.h"),
        dynamic_lib: Some(PathBuf::from("bin").join(DLL)),
        static_lib: Some(PathBuf::from("lib/ktx.lib")),
        version: config.version.clone(),
        config_file: config.config_file.clone(),
        config_key: "KTX_SDK_PATH".to_string(),
    }
}

/// Locate KTX-Software, offering to install it when absent.
pub fn ensure_ktx(
    ctx: &SdkContext<'_>,
    config: &KtxConfig,
    ui: &mut dyn UserInterface,
) -> SdkReport {
    let spec = spec(config);
    let locator = SdkLocator::new(&spec, ctx.root, ctx.env);
    let mut report = SdkReport::new(NAME);

    if let Some(found) = locator.locate() {
        report.set_state(SdkState::Found);
        finish_found(&mut report, &locator, found, ui);
        return report;
    }

    ui.show_banner(
        StatusKind::Warning,
        &[
            format!("WARNING: {} is not installed!", NAME),
            format!("{} is optional but recommended for:", NAME),
            "  - GPU texture compression (BC7, ASTC, ETC2)".to_string(),
            "  - Up to 75% less VRAM for textures".to_string(),
            "  - Faster texture loading".to_string(),
        ],
    );

    let Some(url) = config.installers.get(&ctx.host) else {
        ui.message(&format!(
            "No {} installer is configured for {}. Install it and set {} to its root.",
            NAME, ctx.host, config.env_var
        ));
        report.set_state(SdkState::InstallFailed);
        report
            .notes
            .push(format!("no installer configured for {}", ctx.host));
        return report;
    };

    ui.message(&format!(
        "It will be installed into {}",
        ctx.root.join(&config.vendor_dir).display()
    ));
    if !ui.confirm(PROMPT_KEY, &format!("Install {}?", NAME), false) {
        ui.warning(&format!(
            "Without {}, texture compression runs in compatibility mode (no real compression).",
            NAME
        ));
        report.set_state(SdkState::UserDeclined);
        report.notes.push("installation declined".to_string());
        return report;
    }

    report.set_state(SdkState::Installing);
    if let Err(e) = install(ctx, config, url, ui) {
        ui.error(&format!("{} installation failed: {}", NAME, e));
        report.set_state(SdkState::InstallFailed);
        report.notes.push(e.to_string());
        return report;
    }

    match locator.locate() {
        Some(found) => {
            report.set_state(SdkState::Installed);
            finish_found(&mut report, &locator, found, ui);
        }
        None => {
            ui.error(&format!("Could not verify the {} installation", NAME));
            report.set_state(SdkState::InstallFailed);
            report
                .notes
                .push(format!("{} missing after install", spec.header.display()));
        }
    }
    report
}

fn install(
    ctx: &SdkContext<'_>,
    config: &KtxConfig,
    installer_url: &str,
    ui: &mut dyn UserInterface,
) -> Result<()> {
    let vendor = ctx.root.join(&config.vendor_dir);

    extract_headers(ctx, config, &vendor, ui)?;
    install_binaries(ctx, config, installer_url, &vendor, ui)?;

    if let Err(e) = build_import_lib(ctx, &vendor) {
        tracing::debug!("Import library synthesis failed: {}", e);
        ui.warning(&format!(
            "Could not create ktx.lib ({}); dynamic loading will be used",
            e
        ));
    }
    Ok(())
}

/// Download the source archive and keep only `include/` in the vendor dir.
fn extract_headers(
    ctx: &SdkContext<'_>,
    config: &KtxConfig,
    vendor: &Path,
    ui: &mut dyn UserInterface,
) -> Result<()> {
    ui.message(&format!("Downloading {} source (for headers)", NAME));
    let archive = vendor.join("ktx-source.zip");

    let result = download_with_progress(ui, ctx.downloader, &config.source_url, &archive, None)
        .and_then(|_| {
            extract_filtered(&archive, vendor, |member| {
                member.contains("/include/") || member.contains("/lib/")
            })
        })
        .and_then(|_| {
            let source_dir = vendor.join(format!("KTX-Software-{}", config.version));
            let include = vendor.join("include");
            if source_dir.join("include").is_dir() {
                if include.exists() {
                    fs::remove_dir_all(&include)?;
                }
                fs::rename(source_dir.join("include"), &include)?;
            }
            fs::create_dir_all(vendor.join("lib"))?;
            if source_dir.exists() {
                fs::remove_dir_all(&source_dir)?;
            }
            Ok(())
        });
    fs::remove_file(&archive).ok();

    result?;
    ui.success("Headers extracted");
    Ok(())
}

/// Run the official installer and copy `ktx.dll` into the vendor dir.
fn install_binaries(
    ctx: &SdkContext<'_>,
    config: &KtxConfig,
    url: &str,
    vendor: &Path,
    ui: &mut dyn UserInterface,
) -> Result<()> {
    ui.show_banner(
        StatusKind::Warning,
        &[
            format!("IMPORTANT: {} binaries", NAME),
            "The official installer will open. Please:".to_string(),
            format!(
                "  1. Install to the default location ({})",
                config.system_install_dir.display()
            ),
            "  2. Return to this window when it finishes".to_string(),
        ],
    );

    let installer = vendor.join("KTX-Installer.exe");
    download_and_launch(ctx, url, &installer, config.installer_sha256.as_deref(), ui)?;
    ui.pause("Press Enter once the installer has finished...")?;

    let mut dll = config.system_install_dir.join("bin").join(DLL);
    if !dll.is_file() {
        ui.warning(&format!("{} not found in {}", DLL, config.system_install_dir.display()));
        let answer = ui.prompt(&Prompt {
            key: DIR_PROMPT_KEY.to_string(),
            question: format!("Where was {} installed?", NAME),
            prompt_type: PromptType::Input,
            default: Some(config.system_install_dir.to_string_lossy().into_owned()),
        })?;
        dll = PathBuf::from(answer.as_string().trim()).join("bin").join(DLL);
    }

    if !dll.is_file() {
        return Err(SetupError::MissingArtifact {
            what: DLL.to_string(),
            path: dll,
        });
    }

    let bin = vendor.join("bin");
    fs::create_dir_all(&bin)?;
    fs::copy(&dll, bin.join(DLL))?;
    ui.success(&format!("Copied {}", DLL));
    Ok(())
}

/// `ktx.lib` from `ktx.dll` via MSVC, when Visual Studio is installed.
fn build_import_lib(ctx: &SdkContext<'_>, vendor: &Path) -> Result<PathBuf> {
    let program_files = (ctx.env)("ProgramFiles").unwrap_or_else(|| "C:/Program Files".to_string());
    let tools = find_msvc_tools(Path::new(&program_files)).ok_or_else(|| SetupError::ToolNotFound {
        tool: "dumpbin".to_string(),
        hint: "install Visual Studio 2022 with the C++ workload".to_string(),
    })?;

    synthesize_import_lib(
        ctx.runner,
        &tools,
        &vendor.join("bin").join(DLL),
        &vendor.join("lib"),
        "ktx",
    )
}
