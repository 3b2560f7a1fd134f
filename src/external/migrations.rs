//! Schema-migration generator wrapper
//!
//! The generator is opaque: it is handed a migration name and a project path,
//! and its exit status is the only success signal.

use super::command::{CommandError, CommandExecutor, CommandRunner};
use std::path::{Path, PathBuf};

/// Build `<tool> migrations add <name> --project <path>`.
pub fn add_migration_command(tool: &str, migration_name: &str, project_path: &Path) -> String {
    format!(
        "{} migrations add {} --project {}",
        tool,
        migration_name,
        shell_path(project_path)
    )
}

fn shell_path(path: &Path) -> String {
    let rendered = path.display().to_string();
    if rendered.chars().any(char::is_whitespace) {
        format!("\"{}\"", rendered)
    } else {
        rendered
    }
}

pub struct MigrationTool<'a> {
    runner: CommandRunner<'a>,
    tool: String,
    project_path: PathBuf,
}

impl<'a> MigrationTool<'a> {
    pub fn new(executor: &'a dyn CommandExecutor, tool: impl Into<String>, project_path: impl Into<PathBuf>) -> Self {
        Self {
            runner: CommandRunner::new(executor),
            tool: tool.into(),
            project_path: project_path.into(),
        }
    }

    /// Generate a migration named `migration_name`, running the tool from the project directory.
    pub async fn add_migration(&self, migration_name: &str) -> Result<String, CommandError> {
        let command = add_migration_command(&self.tool, migration_name, &self.project_path);
        self.runner.run(&command, Some(self.project_path.as_path())).await
    }
}
