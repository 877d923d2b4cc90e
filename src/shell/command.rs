//! External process execution.

use crate::error::{Result, SetupError};
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Result of executing an external command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }

    /// Short description of why the command failed, for warnings.
    pub fn failure_message(&self) -> String {
        let code = match self.exit_code {
            Some(code) => format!("exit code {}", code),
            None => "terminated by signal".to_string(),
        };
        match self.stderr.lines().rev().find(|l| !l.trim().is_empty()) {
            Some(line) => format!("{}: {}", code, line.trim()),
            None => code,
        }
    }
}

/// A program invocation: executable, arguments and working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    /// Capture stdout even on a streaming runner.
    pub capture_stdout: bool,
}

impl Invocation {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: None,
            capture_stdout: false,
        }
    }

    /// Run in the given directory.
    pub fn in_dir(mut self, cwd: &Path) -> Self {
        self.cwd = Some(cwd.to_path_buf());
        self
    }

    /// Always capture stdout. For commands whose output is parsed.
    pub fn capture_output(mut self) -> Self {
        self.capture_stdout = true;
        self
    }

    /// The full command line, space separated.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Capture stdout (if false, inherits from parent).
    pub capture_stdout: bool,

    /// Capture stderr (if false, inherits from parent).
    pub capture_stderr: bool,
}

/// Runs external programs.
///
/// Components take a `&dyn CommandRunner` so tests can script process
/// results with [`MockRunner`](super::MockRunner).
pub trait CommandRunner {
    /// Run to completion. A program that cannot be found is
    /// [`SetupError::ToolNotFound`]; a non-zero exit is a normal result.
    fn run(&self, invocation: &Invocation) -> Result<CommandResult>;

    /// Run and report only whether the command exited zero.
    fn succeeds(&self, invocation: &Invocation) -> bool {
        self.run(invocation).map(|r| r.success).unwrap_or(false)
    }
}

/// Runs programs on the host system.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    options: CommandOptions,
}

impl SystemRunner {
    /// Runner that captures all output.
    pub fn captured() -> Self {
        Self {
            options: CommandOptions {
                capture_stdout: true,
                capture_stderr: true,
            },
        }
    }

    /// Runner that streams stdout to the terminal (verbose mode) but keeps
    /// stderr for failure messages.
    pub fn streaming() -> Self {
        Self {
            options: CommandOptions {
                capture_stdout: false,
                capture_stderr: true,
            },
        }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandResult> {
        execute(invocation, &self.options)
    }
}

/// Execute an invocation.
pub fn execute(invocation: &Invocation, options: &CommandOptions) -> Result<CommandResult> {
    let start = Instant::now();

    let mut cmd = Command::new(&invocation.program);
    cmd.args(&invocation.args);

    if let Some(cwd) = &invocation.cwd {
        cmd.current_dir(cwd);
    }

    cmd.stdin(Stdio::null());

    if options.capture_stdout || invocation.capture_stdout {
        cmd.stdout(Stdio::piped());
    } else {
        cmd.stdout(Stdio::inherit());
    }

    if options.capture_stderr {
        cmd.stderr(Stdio::piped());
    } else {
        cmd.stderr(Stdio::inherit());
    }

    tracing::debug!("Executing: {}", invocation);

    let output = cmd.output().map_err(|e| match e.kind() {
        ErrorKind::NotFound => SetupError::ToolNotFound {
            tool: invocation.program.clone(),
            hint: "not found on PATH".to_string(),
        },
        _ => SetupError::Io(e),
    })?;

    let duration = start.elapsed();

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    tracing::debug!(
        "Finished {} with {:?} in {:?}",
        invocation.program,
        output.status.code(),
        duration
    );

    if output.status.success() {
        Ok(CommandResult::success(stdout, stderr, duration))
    } else {
        Ok(CommandResult::failure(
            output.status.code(),
            stdout,
            stderr,
            duration,
        ))
    }
}
