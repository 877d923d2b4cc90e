//! Handing files to the OS default handler.
//!
//! Installers are "opened" rather than spawned so the platform shows its
//! usual elevation and trust dialogs.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use crate::error::{Result, SetupError};

/// Opens a file with the operating system's default handler.
pub trait Launcher {
    fn launch(&self, path: &Path) -> Result<()>;
}

/// Launcher backed by the `open` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn launch(&self, path: &Path) -> Result<()> {
        tracing::debug!("Opening {}", path.display());
        open::that(path).map_err(|e| {
            SetupError::Other(anyhow::anyhow!(
                "Failed to launch {}. You can run it manually.\n\nError: {}",
                path.display(),
                e
            ))
        })
    }
}

type LaunchEffect = Box<dyn Fn(&Path)>;

/// Launcher that records paths and optionally simulates an installer.
#[derive(Default)]
pub struct MockLauncher {
    launched: RefCell<Vec<PathBuf>>,
    effect: Option<LaunchEffect>,
    fail: bool,
}

impl MockLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `effect` on every launch, e.g. to create the files an installer would.
    pub fn on_launch(effect: impl Fn(&Path) + 'static) -> Self {
        Self {
            effect: Some(Box::new(effect)),
            ..Self::default()
        }
    }

    /// A launcher whose every launch fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn launched(&self) -> Vec<PathBuf> {
        self.launched.borrow().clone()
    }
}

impl Launcher for MockLauncher {
    fn launch(&self, path: &Path) -> Result<()> {
        self.launched.borrow_mut().push(path.to_path_buf());
        if self.fail {
            return Err(SetupError::Other(anyhow::anyhow!(
                "mock launch failure for {}",
                path.display()
            )));
        }
        if let Some(effect) = &self.effect {
            effect(path);
        }
        Ok(())
    }
}
