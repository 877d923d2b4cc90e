//! Integration tests for the lunex-setup binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Keeps the binary away from pip and git.
const OFFLINE_CONFIG: &str = r#"
packages: []
repositories: []
"#;

fn setup_project(config: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("premake5.lua"), "-- workspace").unwrap();
    let lunex_dir = temp.path().join(".lunex");
    fs::create_dir_all(&lunex_dir).unwrap();
    fs::write(lunex_dir.join("setup.yml"), config).unwrap();
    temp
}

fn lunex_setup(project: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("lunex-setup"));
    cmd.current_dir(project.path())
        .arg("--non-interactive")
        .env_remove("VULKAN_SDK")
        .env_remove("KTX_SDK")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("lunex-setup"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Lunex engine"))
        .stdout(predicate::str::contains("--non-interactive"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("lunex-setup"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_rejects_unknown_step() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("lunex-setup"));
    cmd.args(["run", "--skip", "physics"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
    Ok(())
}

#[test]
fn cli_generates_completions() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("lunex-setup"));
    cmd.args(["completions", "bash"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("lunex-setup"));
    Ok(())
}

#[test]
fn status_reports_missing_components_and_exits_zero() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(OFFLINE_CONFIG);
    lunex_setup(&temp)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Vulkan SDK"))
        .stdout(predicate::str::contains("premake5 not found"));

    assert!(!temp.path().join("vulkan_config.lua").exists());
    assert!(!temp.path().join("ktx_config.lua").exists());
    Ok(())
}

#[test]
fn status_json_is_machine_readable() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(OFFLINE_CONFIG);
    let ktx = temp.path().join("vendor/ktx/include");
    fs::create_dir_all(&ktx)?;
    fs::write(ktx.join("ktx.h"), "")?;

    let output = lunex_setup(&temp).args(["status", "--json"]).output()?;
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["generator"]["present"], false);
    assert_eq!(report["sdks"][1]["name"], "KTX-Software");
    assert_eq!(report["sdks"][1]["installation"]["source"], "vendor");
    assert!(report["sdks"][0]["installation"].is_null());
    Ok(())
}

#[test]
fn project_root_is_found_from_subdirectory() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(OFFLINE_CONFIG);
    let nested = temp.path().join("Lunex/src");
    fs::create_dir_all(&nested)?;

    let output = lunex_setup(&temp)
        .current_dir(&nested)
        .args(["status", "--json"])
        .output()?;
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let root = report["project_root"].as_str().unwrap_or_default();
    assert!(!root.ends_with("src"));
    Ok(())
}

#[test]
fn invalid_config_fails_with_path() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project("packages: [\nunknown_section: 1\n");
    lunex_setup(&temp)
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("setup.yml"));
    Ok(())
}

#[test]
fn missing_generator_exits_non_zero() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(OFFLINE_CONFIG);
    lunex_setup(&temp)
        .args(["run", "--skip", "packages,sources,vulkan,ktx"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("premake5"));
    Ok(())
}

#[test]
fn assimp_without_files_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(OFFLINE_CONFIG);
    lunex_setup(&temp)
        .arg("assimp")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing"));

    assert!(temp.path().join("vendor/assimp/lib/Debug").is_dir());
    assert!(temp.path().join("vendor/assimp/lib/Release").is_dir());
    Ok(())
}
