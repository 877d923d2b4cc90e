//! External process execution and host detection.

pub mod command;
pub mod launcher;
pub mod mock;
pub mod platform;

pub use command::{
    execute, CommandOptions, CommandResult, CommandRunner, Invocation, SystemRunner,
};
pub use launcher::{Launcher, MockLauncher, SystemLauncher};
pub use mock::MockRunner;
pub use platform::{is_ci, HostPlatform};
