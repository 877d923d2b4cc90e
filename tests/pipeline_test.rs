//! End-to-end pipeline scenarios against scripted collaborators.

use std::fs;
use std::path::Path;

use lunex_setup::config::{parse_config, SetupConfig};
use lunex_setup::net::MockDownloader;
use lunex_setup::pipeline::{Pipeline, PipelineResult, RunOptions};
use lunex_setup::sdk::{SdkContext, SdkState};
use lunex_setup::shell::{HostPlatform, MockLauncher, MockRunner};
use lunex_setup::ui::MockUI;
use tempfile::TempDir;

const CONFIG: &str = r#"
packages: [requests]
repositories:
  - path: Lunex/vendor/glm
    url: https://github.com/g-truc/glm
    ref: master
    probe: glm/glm.hpp
  - path: Lunex/vendor/entt
    url: https://github.com/skypjack/entt
    ref: master
    probe: src/entt/entt.hpp
"#;

fn touch(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "").unwrap();
}

fn config() -> SetupConfig {
    parse_config(CONFIG, Path::new(".lunex/setup.yml")).unwrap()
}

fn run(
    root: &Path,
    host: HostPlatform,
    runner: &MockRunner,
    config: &SetupConfig,
    ui: &mut MockUI,
) -> PipelineResult {
    let downloader = MockDownloader::new();
    let launcher = MockLauncher::new();
    let env = |_: &str| None;
    let ctx = SdkContext {
        root,
        host,
        runner,
        downloader: &downloader,
        launcher: &launcher,
        env: &env,
    };
    Pipeline::new(config, &ctx).run(&RunOptions::default(), ui)
}

#[test]
fn sdks_absent_and_declined_still_exit_zero() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    touch(&root.join("Lunex/vendor/glm/glm/glm.hpp"));
    touch(&root.join("Lunex/vendor/entt/src/entt/entt.hpp"));
    touch(&root.join("vendor/bin/premake/premake5.exe"));
    let mut config = config();
    config.vulkan.debug_libs_url = None;
    let runner = MockRunner::new();
    let mut ui = MockUI::new();
    ui.set_prompt_response("install_vulkan", "no");
    ui.set_prompt_response("install_ktx", "no");

    let result = run(root, HostPlatform::Windows, &runner, &config, &mut ui);

    assert_eq!(result.exit_code(), 0);
    assert!(result.sdks.iter().all(|r| r.state == SdkState::UserDeclined));
    assert_eq!(
        ui.summaries()[0].compatibility,
        vec!["Vulkan SDK".to_string(), "KTX-Software".to_string()]
    );
    assert!(runner
        .command_lines()
        .iter()
        .any(|l| l.ends_with("premake5.exe vs2022")));
}

#[test]
fn second_run_installs_nothing() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    touch(&root.join("Lunex/vendor/glm/glm/glm.hpp"));
    touch(&root.join("Lunex/vendor/entt/src/entt/entt.hpp"));
    touch(&root.join("vendor/bin/premake/premake5"));
    let config = config();

    // requests is missing until the installer runs.
    let runner = MockRunner::new();
    runner.queue_exit_codes("python -m pip show requests", vec![1, 0]);
    let mut ui = MockUI::new();
    run(root, HostPlatform::Linux, &runner, &config, &mut ui);
    assert_eq!(runner.count("python -m pip install"), 1);

    let again = MockRunner::new();
    let mut ui = MockUI::new();
    run(root, HostPlatform::Linux, &again, &config, &mut ui);
    assert_eq!(again.count("python -m pip install"), 0);
}

#[test]
fn empty_checkout_is_recloned_and_full_one_is_kept() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    // glm is populated but lacks its probe; entt is an empty directory.
    touch(&root.join("Lunex/vendor/glm/README.md"));
    fs::create_dir_all(root.join("Lunex/vendor/entt")).unwrap();
    touch(&root.join("vendor/bin/premake/premake5"));
    let runner = MockRunner::new();
    let mut ui = MockUI::new();

    let result = run(root, HostPlatform::Linux, &runner, &config(), &mut ui);

    let clones: Vec<String> = runner
        .command_lines()
        .into_iter()
        .filter(|l| l.starts_with("git clone"))
        .collect();
    assert_eq!(clones.len(), 1);
    assert!(clones[0].ends_with("Lunex/vendor/entt"));
    assert!(root.join("Lunex/vendor/glm/README.md").is_file());

    // The missing glm probe is reported, not repaired.
    let sources = &result.steps[1];
    let reasons = sources.outcome.as_ref().unwrap().reasons();
    assert!(reasons.iter().any(|r| r.contains("glm")));
    assert_eq!(result.exit_code(), 0);
}
