//! Base command execution abstraction
//!
//! Every external tool this crate drives (git, the migration generator) is
//! reached through [`CommandExecutor`], which takes a full command line and an
//! explicit working directory. [`CommandRunner`] layers logging and exit-code
//! handling on top.

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub status_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status_code == 0
    }

    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            status_code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The command ran and exited with a non-zero status.
    #[error("Command '{command}' returned non-zero exit status {code}: {stderr}")]
    ExecutionFailed {
        code: i32,
        command: String,
        stdout: String,
        stderr: String,
    },
    /// The command could not be started at all.
    #[error("Failed to start command '{command}': {message}")]
    Spawn { command: String, message: String },
}

impl CommandError {
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            CommandError::ExecutionFailed { code, .. } => Some(*code),
            CommandError::Spawn { .. } => None,
        }
    }

    pub fn command(&self) -> &str {
        match self {
            CommandError::ExecutionFailed { command, .. } | CommandError::Spawn { command, .. } => {
                command
            }
        }
    }
}

/// Trait for executing external commands
///
/// Implementations run `command` to completion and report its exit status and
/// captured output. A non-zero status is not an error at this level.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn execute(
        &self,
        command: &str,
        working_dir: Option<&Path>,
    ) -> Result<CommandOutput, CommandError>;
}

/// Runs command lines through the host shell
pub struct ShellCommandExecutor;

impl ShellCommandExecutor {
    #[cfg(windows)]
    fn shell_command(command: &str) -> tokio::process::Command {
        // cmd does not undo the \" escaping .arg() applies, so pass the line verbatim
        let mut cmd = tokio::process::Command::new("cmd");
        cmd.arg("/C").raw_arg(command);
        cmd
    }

    #[cfg(not(windows))]
    fn shell_command(command: &str) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd
    }
}

#[async_trait]
impl CommandExecutor for ShellCommandExecutor {
    async fn execute(
        &self,
        command: &str,
        working_dir: Option<&Path>,
    ) -> Result<CommandOutput, CommandError> {
        let mut cmd = Self::shell_command(command);
        if let Some(dir) = working_dir {
            cmd.current_dir(dir);
        }

        let output = cmd.output().await.map_err(|e| CommandError::Spawn {
            command: command.to_string(),
            message: match working_dir {
                Some(dir) if !dir.exists() => {
                    format!("working directory {} does not exist", dir.display())
                }
                _ => e.to_string(),
            },
        })?;

        Ok(CommandOutput {
            status_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Logs commands instead of running them and reports success for each
pub struct DryRunExecutor;

#[async_trait]
impl CommandExecutor for DryRunExecutor {
    async fn execute(
        &self,
        command: &str,
        working_dir: Option<&Path>,
    ) -> Result<CommandOutput, CommandError> {
        info!(
            working_dir = %working_dir.map(|d| d.display().to_string()).unwrap_or_default(),
            "[dry-run] {}",
            command
        );
        Ok(CommandOutput::ok(""))
    }
}

/// Executes commands and turns non-zero exits into [`CommandError::ExecutionFailed`]
pub struct CommandRunner<'a> {
    executor: &'a dyn CommandExecutor,
}

impl<'a> CommandRunner<'a> {
    pub fn new(executor: &'a dyn CommandExecutor) -> Self {
        Self { executor }
    }

    /// Run `command` and return its stdout with trailing whitespace removed.
    pub async fn run(&self, command: &str, working_dir: Option<&Path>) -> Result<String, CommandError> {
        let output = self.executor.execute(command, working_dir).await?;

        if !output.success() {
            error!("Command '{}' failed with error: {}", command, output.stderr);
            return Err(CommandError::ExecutionFailed {
                code: output.status_code,
                command: command.to_string(),
                stdout: output.stdout,
                stderr: output.stderr,
            });
        }

        info!("Command output:\n{}", output.stdout);
        Ok(output.stdout.trim_end().to_string())
    }
}
