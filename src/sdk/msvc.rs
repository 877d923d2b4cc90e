//! Import-library synthesis with the MSVC toolchain.
//!
//! The KTX-Software installer ships `ktx.dll` without an import library.
//! When Visual Studio 2022 is installed, `dumpbin` and `lib` can build one
//! from the DLL's export table.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SetupError};
use crate::shell::{CommandRunner, Invocation};

const VS_EDITIONS: [&str; 3] = ["Community", "Professional", "Enterprise"];

/// Paths to the MSVC binary tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsvcTools {
    pub dumpbin: PathBuf,
    pub lib: PathBuf,
}

/// Find `dumpbin.exe` and `lib.exe` of the newest MSVC toolset in any
/// Visual Studio 2022 edition under `program_files`.
pub fn find_msvc_tools(program_files: &Path) -> Option<MsvcTools> {
    for edition in VS_EDITIONS {
        let msvc = program_files
            .join("Microsoft Visual Studio")
            .join("2022")
            .join(edition)
            .join("VC")
            .join("Tools")
            .join("MSVC");

        let Ok(entries) = fs::read_dir(&msvc) else {
            continue;
        };
        let mut versions: Vec<String> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        versions.sort();

        let Some(latest) = versions.last() else {
            continue;
        };
        let tools = msvc.join(latest).join("bin").join("Hostx64").join("x64");
        if tools.join("dumpbin.exe").is_file() {
            tracing::debug!("Using MSVC tools in {}", tools.display());
            return Some(MsvcTools {
                dumpbin: tools.join("dumpbin.exe"),
                lib: tools.join("lib.exe"),
            });
        }
    }
    None
}

/// Export names from `dumpbin /EXPORTS` output.
///
/// Rows follow the `ordinal hint RVA name` header; the fourth column is
/// the symbol.
pub fn parse_exports(dumpbin_output: &str) -> Vec<String> {
    let mut exports = Vec::new();
    let mut in_table = false;

    for line in dumpbin_output.lines() {
        let lower = line.to_lowercase();
        if !in_table {
            in_table = lower.contains("ordinal") && lower.contains("name");
            continue;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() >= 4 {
            exports.push(parts[3].to_string());
        }
    }

    exports
}

/// Module-definition file content for `library` exporting `exports`.
pub fn def_file_content(library: &str, exports: &[String]) -> String {
    let mut content = format!("LIBRARY {}\nEXPORTS\n", library);
    for name in exports {
        content.push_str("    ");
        content.push_str(name);
        content.push('\n');
    }
    content
}

/// Build `<lib_dir>/<library>.lib` from `dll`.
pub fn synthesize_import_lib(
    runner: &dyn CommandRunner,
    tools: &MsvcTools,
    dll: &Path,
    lib_dir: &Path,
    library: &str,
) -> Result<PathBuf> {
    let dump = runner.run(
        &Invocation::new(
            tools.dumpbin.to_string_lossy(),
            ["/EXPORTS".to_string(), dll.to_string_lossy().into_owned()],
        )
        .capture_output(),
    )?;
    if !dump.success {
        return Err(SetupError::InstallFailure {
            package: format!("{}.lib", library),
            message: format!("dumpbin failed: {}", dump.failure_message()),
        });
    }

    let exports = parse_exports(&dump.stdout);
    if exports.is_empty() {
        return Err(SetupError::MissingArtifact {
            what: "exports".to_string(),
            path: dll.to_path_buf(),
        });
    }
    tracing::debug!("{} exports {} symbols", dll.display(), exports.len());

    fs::create_dir_all(lib_dir)?;
    let def_path = lib_dir.join(format!("{}.def", library));
    let lib_path = lib_dir.join(format!("{}.lib", library));
    fs::write(&def_path, def_file_content(library, &exports))?;

    let result = runner.run(&Invocation::new(
        tools.lib.to_string_lossy(),
        [
            format!("/DEF:{}", def_path.display()),
            format!("/OUT:{}", lib_path.display()),
            "/MACHINE:X64".to_string(),
        ],
    ))?;

    if lib_path.is_file() {
        Ok(lib_path)
    } else {
        Err(SetupError::InstallFailure {
            package: format!("{}.lib", library),
            message: result.failure_message(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::MockRunner;
    use tempfile::TempDir;

    const DUMPBIN: &str = "\
Dump of file ktx.dll

File Type: DLL

  Section contains the following exports for ktx.dll

    00000000 characteristics
         142 number of functions

    ordinal hint RVA      name

          1    0 00012340 ktxTexture2_Create
          2    1 00012560 ktxTexture2_CompressBasis
          3    2 00012780 ktxTexture_Destroy

  Summary

        2000 .data
";

    #[test]
    fn parses_export_rows_after_header() {
        assert_eq!(
            parse_exports(DUMPBIN),
            vec![
                "ktxTexture2_Create",
                "ktxTexture2_CompressBasis",
                "ktxTexture_Destroy"
            ]
        );
    }

    #[test]
    fn no_header_means_no_exports() {
        assert!(parse_exports("1 0 00012340 foo\n").is_empty());
    }

    #[test]
    fn def_file_lists_exports() {
        let content = def_file_content("ktx", &["a".to_string(), "b".to_string()]);
        assert_eq!(content, "LIBRARY ktx\nEXPORTS\n    a\n    b\n");
    }

    #[test]
    fn finds_newest_toolset() {
        let temp = TempDir::new().unwrap();
        let msvc = temp
            .path()
            .join("Microsoft Visual Studio/2022/Professional/VC/Tools/MSVC");
        for version in ["14.38.33130", "14.40.33807"] {
            let tools = msvc.join(version).join("bin/Hostx64/x64");
            fs::create_dir_all(&tools).unwrap();
            fs::write(tools.join("dumpbin.exe"), "").unwrap();
        }

        let tools = find_msvc_tools(temp.path()).unwrap();
        assert!(tools.dumpbin.to_string_lossy().contains("14.40.33807"));
        assert!(tools.lib.ends_with("lib.exe"));
    }

    #[test]
    fn missing_visual_studio() {
        let temp = TempDir::new().unwrap();
        assert!(find_msvc_tools(temp.path()).is_none());
    }

    #[test]
    fn synthesize_writes_def_and_runs_lib() {
        let temp = TempDir::new().unwrap();
        let lib_dir = temp.path().join("lib");
        let tools = MsvcTools {
            dumpbin: PathBuf::from("dumpbin.exe"),
            lib: PathBuf::from("lib.exe"),
        };

        let runner = MockRunner::new();
        runner.set_output("dumpbin.exe /EXPORTS", 0, DUMPBIN);
        let out = lib_dir.join("ktx.lib");
        runner.on_success("lib.exe", move |_| fs::write(&out, "lib").unwrap());

        let lib = synthesize_import_lib(&runner, &tools, Path::new("ktx.dll"), &lib_dir, "ktx")
            .unwrap();

        assert!(lib.is_file());
        let def = fs::read_to_string(lib_dir.join("ktx.def")).unwrap();
        assert!(def.contains("    ktxTexture_Destroy"));
        assert!(runner
            .command_lines()
            .iter()
            .any(|l| l.starts_with("lib.exe /DEF:") && l.ends_with("/MACHINE:X64")));
    }

    #[test]
    fn dumpbin_output_is_always_captured() {
        let temp = TempDir::new().unwrap();
        let tools = MsvcTools {
            dumpbin: PathBuf::from("dumpbin.exe"),
            lib: PathBuf::from("lib.exe"),
        };
        let runner = MockRunner::new();
        runner.set_output("dumpbin.exe", 0, DUMPBIN);

        let _ = synthesize_import_lib(&runner, &tools, Path::new("ktx.dll"), temp.path(), "ktx");

        let dumpbin = &runner.calls()[0];
        assert!(dumpbin.program.starts_with("dumpbin"));
        assert!(dumpbin.capture_stdout);
    }

    #[cfg(unix)]
    #[test]
    fn streaming_runner_still_builds_import_lib() {
        use crate::shell::SystemRunner;
        use std::os::unix::fs::PermissionsExt;

        fn script(path: &Path, body: &str) {
            fs::write(path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
        }

        let temp = TempDir::new().unwrap();
        let bin = temp.path().join("bin");
        fs::create_dir_all(&bin).unwrap();
        let dump = temp.path().join("exports.txt");
        fs::write(&dump, DUMPBIN).unwrap();
        let tools = MsvcTools {
            dumpbin: bin.join("dumpbin.exe"),
            lib: bin.join("lib.exe"),
        };
        script(&tools.dumpbin, &format!("cat '{}'", dump.display()));
        // Touch the file named by the /OUT: argument.
        script(
            &tools.lib,
            "for a in \"$@\"; do case \"$a\" in /OUT:*) touch \"${a#/OUT:}\";; esac; done",
        );

        let lib_dir = temp.path().join("lib");
        let lib = synthesize_import_lib(
            &SystemRunner::streaming(),
            &tools,
            Path::new("ktx.dll"),
            &lib_dir,
            "ktx",
        )
        .unwrap();

        assert!(lib.is_file());
        let def = fs::read_to_string(lib_dir.join("ktx.def")).unwrap();
        assert!(def.contains("    ktxTexture2_Create"));
    }

    #[test]
    fn synthesize_without_exports_fails() {
        let temp = TempDir::new().unwrap();
        let tools = MsvcTools {
            dumpbin: PathBuf::from("dumpbin.exe"),
            lib: PathBuf::from("lib.exe"),
        };
        let runner = MockRunner::new();
        runner.set_output("dumpbin.exe", 0, "nothing here");

        let result =
            synthesize_import_lib(&runner, &tools, Path::new("ktx.dll"), temp.path(), "ktx");
        assert!(matches!(result, Err(SetupError::MissingArtifact { .. })));
        assert!(!runner.was_called("lib.exe"));
    }
}
