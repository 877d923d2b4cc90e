//! Assimp command implementation.
//!
//! Prebuilt Assimp libraries are not downloadable from a stable URL, so the
//! operator copies them by hand. This command prepares the directories,
//! explains what to copy, and checks the result.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::AssimpConfig;
use crate::error::Result;
use crate::ui::{StatusKind, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// The assimp command implementation.
pub struct AssimpCommand<'a> {
    project_root: PathBuf,
    config: &'a AssimpConfig,
}

impl<'a> AssimpCommand<'a> {
    pub fn new(project_root: &Path, config: &'a AssimpConfig) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config,
        }
    }

    fn lib_dir(&self) -> PathBuf {
        self.project_root.join(&self.config.lib_dir)
    }

    /// Every file the engine links against, Debug first.
    pub fn required_files(&self) -> Vec<PathBuf> {
        let lib_dir = self.lib_dir();
        let debug = self.config.debug_files.iter().map(|f| lib_dir.join("Debug").join(f));
        let release = self
            .config
            .release_files
            .iter()
            .map(|f| lib_dir.join("Release").join(f));
        debug.chain(release).collect()
    }

    fn instructions(&self) -> Vec<String> {
        let lib_dir = self.lib_dir();
        let mut lines = vec![
            "This step needs the prebuilt Assimp libraries, copied by hand:".to_string(),
            format!("  1. Go to {}", self.config.download_page),
            "  2. Download assimp-windows-x64.zip or the SDK installer".to_string(),
            "     (look for files containing 'vc143' or 'vs2022')".to_string(),
            "  3. Copy these files:".to_string(),
        ];
        for file in &self.config.debug_files {
            lines.push(format!("     {}  ->  {}", file, lib_dir.join("Debug").display()));
        }
        for file in &self.config.release_files {
            lines.push(format!("     {}  ->  {}", file, lib_dir.join("Release").display()));
        }
        lines
    }
}

impl Command for AssimpCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        ui.show_header("Prebuilt Assimp");
        ui.show_banner(StatusKind::Warning, &self.instructions());

        let lib_dir = self.lib_dir();
        fs::create_dir_all(lib_dir.join("Debug"))?;
        fs::create_dir_all(lib_dir.join("Release"))?;

        ui.pause("Press Enter once the files are copied...")?;

        let required = self.required_files();
        let missing: Vec<&PathBuf> = required.iter().filter(|f| !f.is_file()).collect();

        if !missing.is_empty() {
            ui.error("Some Assimp files are missing:");
            for file in &missing {
                ui.message(&format!("  - {}", file.display()));
            }
            ui.message("Copy every file listed above and run this command again.");
            return Ok(CommandResult::failure(1));
        }

        for file in &required {
            if let Some(name) = file.file_name() {
                ui.message(&format!("  {} {}", StatusKind::Success.icon(), name.to_string_lossy()));
            }
        }
        ui.success("Assimp is set up");
        ui.message(
            "Next: run `lunex-setup run --skip packages,sources,vulkan,ktx` to regenerate the project files.",
        );
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use tempfile::TempDir;

    #[test]
    fn creates_directories_and_reports_missing_files() {
        let temp = TempDir::new().unwrap();
        let config = AssimpConfig::default();
        let mut ui = MockUI::new();

        let result = AssimpCommand::new(temp.path(), &config).execute(&mut ui).unwrap();

        assert_eq!(result.exit_code, 1);
        assert!(temp.path().join("vendor/assimp/lib/Debug").is_dir());
        assert!(temp.path().join("vendor/assimp/lib/Release").is_dir());
        assert_eq!(ui.pauses().len(), 1);
        assert!(ui.has_error("missing"));
        assert!(ui.has_banner("github.com/assimp/assimp/releases"));
    }

    #[test]
    fn all_files_present_succeeds() {
        let temp = TempDir::new().unwrap();
        let config = AssimpConfig::default();
        let command = AssimpCommand::new(temp.path(), &config);
        for file in command.required_files() {
            fs::create_dir_all(file.parent().unwrap()).unwrap();
            fs::write(&file, "").unwrap();
        }
        let mut ui = MockUI::new();

        let result = command.execute(&mut ui).unwrap();

        assert!(result.success);
        assert!(ui.has_message("assimp-vc143-mtd.dll"));
        assert!(ui.has_success("Assimp is set up"));
    }

    #[test]
    fn required_files_split_by_configuration() {
        let temp = TempDir::new().unwrap();
        let config = AssimpConfig::default();
        let files = AssimpCommand::new(temp.path(), &config).required_files();
        assert_eq!(files.len(), 4);
        assert!(files[0].ends_with("Debug/assimp-vc143-mtd.lib"));
        assert!(files[3].ends_with("Release/assimp-vc143-mt.dll"));
    }
}
