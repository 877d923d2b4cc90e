//! Lunex Setup CLI entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use lunex_setup::cli::{Cli, CommandDispatcher, Commands};
use lunex_setup::config::{find_project_root, load_config};
use lunex_setup::error::Result;
use lunex_setup::ui::{create_ui, OutputMode, UserInterface};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is WARN
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("lunex_setup=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lunex_setup=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Explicit `--project`, else the nearest ancestor that looks like the
/// project, else the current directory.
fn resolve_project_root(explicit: Option<&PathBuf>) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    let root = match explicit {
        Some(path) => cwd.join(path),
        None => find_project_root(&cwd).unwrap_or(cwd),
    };
    Ok(root)
}

fn run(cli: &Cli, ui: &mut dyn UserInterface) -> Result<i32> {
    let project_root = resolve_project_root(cli.project.as_ref())?;
    tracing::debug!("Project root: {}", project_root.display());

    let config = load_config(&project_root, cli.config.as_deref())?;

    // Every relative path below is resolved against the project root.
    std::env::set_current_dir(&project_root)?;

    let dispatcher = CommandDispatcher::new(project_root, config);
    Ok(dispatcher.dispatch(cli, ui)?.exit_code)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("lunex-setup starting with args: {:?}", cli);

    // Determine output mode
    let output_mode = if cli.quiet {
        OutputMode::Quiet
    } else if cli.verbose {
        OutputMode::Verbose
    } else {
        OutputMode::Normal
    };

    // Handle --no-color
    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    if let Some(Commands::Completions(args)) = &cli.command {
        let mut ui = create_ui(false, OutputMode::Silent);
        let dispatcher = CommandDispatcher::new(PathBuf::new(), Default::default());
        return match dispatcher.dispatch(&cli, ui.as_mut()) {
            Ok(_) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Failed to generate {} completions: {}", args.shell, e);
                ExitCode::from(1)
            }
        };
    }

    let is_interactive = cli.is_interactive();
    let mut ui = create_ui(is_interactive, output_mode);

    let code = match run(&cli, ui.as_mut()) {
        Ok(code) => code,
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            1
        }
    };

    // Keep a double-clicked console window open until the operator has read it.
    let waits = !matches!(cli.command, Some(Commands::Status(_)));
    if waits && is_interactive && !cli.no_pause {
        ui.pause("Press Enter to exit...").ok();
    }

    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
