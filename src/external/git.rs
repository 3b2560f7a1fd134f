//! Git command abstractions
//!
//! Builds the exact git command lines the workflow issues and runs them in the
//! repository root through a [`CommandExecutor`].

use super::command::{CommandError, CommandExecutor, CommandRunner};
use std::path::{Path, PathBuf};

/// Commit message recorded for a generated migration.
pub fn commit_message(migration_name: &str) -> String {
    format!("Added migration {}", migration_name)
}

pub fn commit_command(migration_name: &str) -> String {
    format!("git commit -m \"{}\"", commit_message(migration_name))
}

pub fn checkout_command(branch: &str) -> String {
    format!("git checkout {}", branch)
}

pub fn pull_command(remote: &str, branch: &str) -> String {
    format!("git pull {} {}", remote, branch)
}

pub fn push_command(remote: &str, branch: &str) -> String {
    format!("git push {} {}", remote, branch)
}

pub const ADD_ALL_COMMAND: &str = "git add .";
pub const STATUS_COMMAND: &str = "git status --porcelain";

/// Git operations scoped to one working copy
pub struct GitClient<'a> {
    runner: CommandRunner<'a>,
    repo_root: PathBuf,
    remote: String,
}

impl<'a> GitClient<'a> {
    pub fn new(executor: &'a dyn CommandExecutor, repo_root: impl Into<PathBuf>, remote: impl Into<String>) -> Self {
        Self {
            runner: CommandRunner::new(executor),
            repo_root: repo_root.into(),
            remote: remote.into(),
        }
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    async fn execute_git_command(&self, command: &str) -> Result<String, CommandError> {
        self.runner.run(command, Some(self.repo_root.as_path())).await
    }

    pub async fn checkout(&self, branch: &str) -> Result<(), CommandError> {
        self.execute_git_command(&checkout_command(branch)).await?;
        Ok(())
    }

    /// Fetch and merge the remote tip of `branch` into the current branch.
    pub async fn pull(&self, branch: &str) -> Result<(), CommandError> {
        self.execute_git_command(&pull_command(&self.remote, branch)).await?;
        Ok(())
    }

    /// Stage every change in the working tree, unrelated edits included.
    pub async fn add_all(&self) -> Result<(), CommandError> {
        self.execute_git_command(ADD_ALL_COMMAND).await?;
        Ok(())
    }

    pub async fn commit_migration(&self, migration_name: &str) -> Result<(), CommandError> {
        self.execute_git_command(&commit_command(migration_name)).await?;
        Ok(())
    }

    pub async fn push(&self, branch: &str) -> Result<(), CommandError> {
        self.execute_git_command(&push_command(&self.remote, branch)).await?;
        Ok(())
    }

    /// Whether `git status --porcelain` reports anything.
    pub async fn has_changes(&self) -> Result<bool, CommandError> {
        let status = self.execute_git_command(STATUS_COMMAND).await?;
        Ok(!status.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::command::CommandOutput;
    use async_trait::async_trait;
    use std::sync::Mutex;

    // Replays one canned response and records every call
    struct MockCommandExecutor {
        response: CommandOutput,
        calls: Mutex<Vec<(String, Option<PathBuf>)>>,
    }

    impl MockCommandExecutor {
        fn returning(response: CommandOutput) -> Self {
            Self {
                response,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(String, Option<PathBuf>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CommandExecutor for MockCommandExecutor {
        async fn execute(
            &self,
            command: &str,
            working_dir: Option<&Path>,
        ) -> Result<CommandOutput, CommandError> {
            self.calls
                .lock()
                .unwrap()
                .push((command.to_string(), working_dir.map(Path::to_path_buf)));
            Ok(self.response.clone())
        }
    }

    #[test]
    fn test_commit_command_text() {
        assert_eq!(
            commit_command("Migration20240101120000"),
            "git commit -m \"Added migration Migration20240101120000\""
        );
    }

    #[test]
    fn test_branch_commands() {
        assert_eq!(checkout_command("AutoMigrationtest"), "git checkout AutoMigrationtest");
        assert_eq!(pull_command("origin", "AutoMigrationtest"), "git pull origin AutoMigrationtest");
        assert_eq!(push_command("origin", "AutoMigrationtest"), "git push origin AutoMigrationtest");
    }

    #[tokio::test]
    async fn test_commands_run_in_repo_root() {
        let executor = MockCommandExecutor::returning(CommandOutput::ok("Switched to branch 'AutoMigrationtest'\n"));

        let git = GitClient::new(&executor, "/srv/backend", "origin");
        git.checkout("AutoMigrationtest").await.unwrap();
        git.add_all().await.unwrap();

        assert_eq!(
            executor.calls(),
            vec![
                ("git checkout AutoMigrationtest".to_string(), Some(PathBuf::from("/srv/backend"))),
                ("git add .".to_string(), Some(PathBuf::from("/srv/backend"))),
            ]
        );
    }

    #[tokio::test]
    async fn test_pull_and_push_use_configured_remote() {
        let executor = MockCommandExecutor::returning(CommandOutput::ok("Already up to date.\n"));

        let git = GitClient::new(&executor, "/srv/backend", "upstream");
        git.pull("AutoMigrationtest").await.unwrap();
        git.push("AutoMigrationtest").await.unwrap();

        let commands: Vec<String> = executor.calls().into_iter().map(|(c, _)| c).collect();
        assert_eq!(
            commands,
            vec!["git pull upstream AutoMigrationtest", "git push upstream AutoMigrationtest"]
        );
    }

    #[tokio::test]
    async fn test_has_changes() {
        let executor = MockCommandExecutor::returning(CommandOutput::ok(
            "A  Infrastructure/Migrations/Migration20240101120000.cs\n",
        ));

        let git = GitClient::new(&executor, "/srv/backend", "origin");
        assert!(git.has_changes().await.unwrap());
        assert_eq!(executor.calls()[0].0, STATUS_COMMAND);
    }

    #[tokio::test]
    async fn test_has_changes_clean_tree() {
        let executor = MockCommandExecutor::returning(CommandOutput::ok("\n"));

        let git = GitClient::new(&executor, "/srv/backend", "origin");
        assert!(!git.has_changes().await.unwrap());
    }

    #[tokio::test]
    async fn test_push_failure_is_reported() {
        let executor = MockCommandExecutor::returning(CommandOutput {
            status_code: 128,
            stdout: String::new(),
            stderr: "fatal: could not read from remote repository\n".to_string(),
        });

        let git = GitClient::new(&executor, "/srv/backend", "origin");
        let err = git.push("AutoMigrationtest").await.unwrap_err();
        assert_eq!(err.exit_code(), Some(128));
        assert_eq!(err.command(), "git push origin AutoMigrationtest");
    }
}
