//! Configuration schema definitions.
//!
//! Every section has built-in defaults for the Lunex engine tree; a
//! `setup.yml` only needs the keys it wants to change.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::shell::HostPlatform;

/// Root configuration structure for `.lunex/setup.yml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SetupConfig {
    /// Runtime packages required by the engine's tooling scripts.
    pub packages: PackagesConfig,

    /// How packages are checked and installed.
    pub package_manager: PackageManagerConfig,

    /// External source repositories vendored as submodules.
    pub repositories: RepositoryList,

    pub vulkan: VulkanConfig,

    pub ktx: KtxConfig,

    pub generator: GeneratorConfig,

    pub assimp: AssimpConfig,
}

/// Required runtime package names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackagesConfig(pub Vec<String>);

impl Default for PackagesConfig {
    fn default() -> Self {
        Self(vec!["requests".to_string(), "fake-useragent".to_string()])
    }
}

impl PackagesConfig {
    pub fn names(&self) -> &[String] {
        &self.0
    }
}

/// Package manager commands. `{name}` in an argument is replaced by the
/// package name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackageManagerConfig {
    /// Interpreter or package manager executable.
    pub program: String,

    /// Arguments of the presence check (exit 0 means installed).
    pub check: Vec<String>,

    /// Arguments of the install command.
    pub install: Vec<String>,
}

impl Default for PackageManagerConfig {
    fn default() -> Self {
        Self {
            program: "python".to_string(),
            check: ["-m", "pip", "show", "{name}"].map(String::from).to_vec(),
            install: ["-m", "pip", "install", "{name}"].map(String::from).to_vec(),
        }
    }
}

impl PackageManagerConfig {
    /// Expand a command template for one package.
    pub fn expand(template: &[String], name: &str) -> Vec<String> {
        template.iter().map(|a| a.replace("{name}", name)).collect()
    }
}

/// Repository list; an omitted `repositories` key keeps the engine defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepositoryList(pub Vec<RepositorySpec>);

impl Default for RepositoryList {
    fn default() -> Self {
        Self(default_repositories())
    }
}

impl RepositoryList {
    pub fn specs(&self) -> &[RepositorySpec] {
        &self.0
    }
}

/// One external source repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepositorySpec {
    /// Checkout directory, relative to the project root.
    pub path: PathBuf,

    /// Remote URL.
    pub url: String,

    /// Branch or tag to clone.
    #[serde(rename = "ref")]
    pub reference: String,

    /// File, relative to `path`, whose presence proves a usable checkout.
    pub probe: PathBuf,
}

impl RepositorySpec {
    pub fn new(path: &str, url: &str, reference: &str, probe: &str) -> Self {
        Self {
            path: PathBuf::from(path),
            url: url.to_string(),
            reference: reference.to_string(),
            probe: PathBuf::from(probe),
        }
    }

    /// Short display name (the last path component).
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// The engine's vendored repositories.
pub fn default_repositories() -> Vec<RepositorySpec> {
    vec![
        RepositorySpec::new(
            "Lunex/vendor/GLFW",
            "https://github.com/glfw/glfw",
            "master",
            "include/GLFW/glfw3.h",
        ),
        RepositorySpec::new(
            "Lunex/vendor/imgui",
            "https://github.com/ocornut/imgui",
            "docking",
            "imgui.h",
        ),
        RepositorySpec::new(
            "Lunex/vendor/glm",
            "https://github.com/g-truc/glm",
            "master",
            "glm/glm.hpp",
        ),
        RepositorySpec::new(
            "Lunex/vendor/yaml-cpp",
            "https://github.com/jbeder/yaml-cpp",
            "master",
            "include/yaml-cpp/yaml.h",
        ),
        RepositorySpec::new(
            "Lunex/vendor/ImGuizmo",
            "https://github.com/CedricGuillemet/ImGuizmo",
            "master",
            "ImGuizmo.h",
        ),
        RepositorySpec::new(
            "Lunex/vendor/box2d",
            "https://github.com/erincatto/box2d",
            "main",
            "include/box2d/box2d.h",
        ),
        RepositorySpec::new(
            "Lunex/vendor/assimp",
            "https://github.com/assimp/assimp",
            "master",
            "include/assimp/Importer.hpp",
        ),
        RepositorySpec::new(
            "Lunex/vendor/bullet3",
            "https://github.com/bulletphysics/bullet3",
            "master",
            "src/btBulletDynamicsCommon.h",
        ),
        RepositorySpec::new(
            "Lunex/vendor/spdlog",
            "https://github.com/gabime/spdlog",
            "v1.x",
            "include/spdlog/spdlog.h",
        ),
        RepositorySpec::new(
            "Lunex/vendor/entt",
            "https://github.com/skypjack/entt",
            "master",
            "single_include/entt/entt.hpp",
        ),
    ]
}

/// Vulkan SDK settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VulkanConfig {
    /// Vendored SDK root, relative to the project root.
    pub vendor_dir: PathBuf,

    /// Environment variable naming a system-wide SDK root.
    pub env_var: String,

    /// Required SDK version.
    pub version: String,

    /// Installer download URL per host platform.
    pub installers: HashMap<HostPlatform, String>,

    /// Expected SHA-256 of the installer, if pinned.
    pub installer_sha256: Option<String>,

    /// Debug-library archive (Windows only).
    pub debug_libs_url: Option<String>,

    /// Generated premake config file, relative to the project root.
    pub config_file: PathBuf,
}

impl Default for VulkanConfig {
    fn default() -> Self {
        let version = "1.3.290";
        let mut installers = HashMap::new();
        installers.insert(
            HostPlatform::Windows,
            format!(
                "https://sdk.lunarg.com/sdk/download/{v}.0/windows/VulkanSDK-{v}.0-Installer.exe",
                v = version
            ),
        );

        Self {
            vendor_dir: PathBuf::from("Lunex/vendor/VulkanSDK"),
            env_var: "VULKAN_SDK".to_string(),
            version: version.to_string(),
            installers,
            installer_sha256: None,
            debug_libs_url: Some(format!(
                "https://sdk.lunarg.com/sdk/download/{v}.0/windows/VulkanSDK-{v}.0-DebugLibs.zip",
                v = version
            )),
            config_file: PathBuf::from("vulkan_config.lua"),
        }
    }
}

/// KTX-Software settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KtxConfig {
    pub vendor_dir: PathBuf,

    pub env_var: String,

    pub version: String,

    /// Source archive providing the public headers.
    pub source_url: String,

    /// Installer download URL per host platform.
    pub installers: HashMap<HostPlatform, String>,

    pub installer_sha256: Option<String>,

    /// Where the system installer puts KTX-Software.
    pub system_install_dir: PathBuf,

    pub config_file: PathBuf,
}

impl Default for KtxConfig {
    fn default() -> Self {
        let version = "4.3.2";
        let mut installers = HashMap::new();
        installers.insert(
            HostPlatform::Windows,
            format!(
                "https://github.com/KhronosGroup/KTX-Software/releases/download/v{v}/KTX-Software-{v}-Windows-x64.exe",
                v = version
            ),
        );

        Self {
            vendor_dir: PathBuf::from("vendor/ktx"),
            env_var: "KTX_SDK".to_string(),
            version: version.to_string(),
            source_url: format!(
                "https://github.com/KhronosGroup/KTX-Software/archive/refs/tags/v{}.zip",
                version
            ),
            installers,
            installer_sha256: None,
            system_install_dir: PathBuf::from("C:/Program Files/KTX-Software"),
            config_file: PathBuf::from("ktx_config.lua"),
        }
    }
}

/// Premake settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Directory holding the premake executable.
    pub premake_dir: PathBuf,

    /// Premake action; the host default when unset.
    pub action: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            premake_dir: PathBuf::from("vendor/bin/premake"),
            action: None,
        }
    }
}

/// Prebuilt Assimp library layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssimpConfig {
    pub lib_dir: PathBuf,

    /// Release page the operator downloads from.
    pub download_page: String,

    pub debug_files: Vec<String>,

    pub release_files: Vec<String>,
}

impl Default for AssimpConfig {
    fn default() -> Self {
        Self {
            lib_dir: PathBuf::from("vendor/assimp/lib"),
            download_page: "https://github.com/assimp/assimp/releases/latest".to_string(),
            debug_files: vec![
                "assimp-vc143-mtd.lib".to_string(),
                "assimp-vc143-mtd.dll".to_string(),
            ],
            release_files: vec![
                "assimp-vc143-mt.lib".to_string(),
                "assimp-vc143-mt.dll".to_string(),
            ],
        }
    }
}
