//! External tool abstractions
//!
//! Trait-based wrappers around the command-line tools the workflow drives,
//! so the workflow can be exercised against recorded or scripted executors.

pub mod command;
pub mod git;
pub mod migrations;

pub use command::{CommandError, CommandExecutor, CommandOutput, CommandRunner, DryRunExecutor, ShellCommandExecutor};
pub use git::GitClient;
pub use migrations::MigrationTool;
