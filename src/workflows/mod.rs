//! The migration workflow: synchronize, generate, publish
//!
//! Steps run once, in order, and the first failure ends the run. Nothing is
//! rolled back: a successful pull followed by a failed generation leaves the
//! local branch advanced with no migration committed.

pub mod migrate;
pub mod publish;
pub mod sync;

use crate::config::WorkflowSettings;
use crate::external::{CommandError, CommandExecutor, GitClient, MigrationTool};
use crate::migration_name::MigrationName;
use crate::telemetry::{create_run_span, generate_run_id};
use std::fmt;
use thiserror::Error;
use tracing::{error, Instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStep {
    Synchronize,
    GenerateMigration,
    Publish,
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkflowStep::Synchronize => "synchronize",
            WorkflowStep::GenerateMigration => "generate-migration",
            WorkflowStep::Publish => "publish",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Failed to pull latest changes: {source}")]
    Synchronize { source: CommandError },
    #[error("An error occurred while adding migration {name}: {source}")]
    GenerateMigration { name: MigrationName, source: CommandError },
    #[error("An error occurred while pushing changes: {source}")]
    Publish { source: CommandError },
}

impl WorkflowError {
    pub fn step(&self) -> WorkflowStep {
        match self {
            WorkflowError::Synchronize { .. } => WorkflowStep::Synchronize,
            WorkflowError::GenerateMigration { .. } => WorkflowStep::GenerateMigration,
            WorkflowError::Publish { .. } => WorkflowStep::Publish,
        }
    }

    pub fn command_error(&self) -> &CommandError {
        match self {
            WorkflowError::Synchronize { source }
            | WorkflowError::GenerateMigration { source, .. }
            | WorkflowError::Publish { source } => source,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowOutcome {
    /// The migration was committed and pushed.
    Published { migration_name: MigrationName },
    /// The tool left the tree clean and empty commits are skipped.
    NoChanges { migration_name: MigrationName },
}

impl WorkflowOutcome {
    pub fn migration_name(&self) -> &MigrationName {
        match self {
            WorkflowOutcome::Published { migration_name } | WorkflowOutcome::NoChanges { migration_name } => {
                migration_name
            }
        }
    }
}

/// Process exit status for a finished run: 0 on any outcome, 1 on any error.
pub fn exit_status(result: &Result<WorkflowOutcome, WorkflowError>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}

/// Runs the three steps against one set of resolved settings
pub struct AutoMigrationWorkflow<'a> {
    executor: &'a dyn CommandExecutor,
    settings: &'a WorkflowSettings,
}

impl<'a> AutoMigrationWorkflow<'a> {
    pub fn new(executor: &'a dyn CommandExecutor, settings: &'a WorkflowSettings) -> Self {
        Self { executor, settings }
    }

    /// Run with a name taken from the current time.
    pub async fn run(&self) -> Result<WorkflowOutcome, WorkflowError> {
        self.run_with_name(MigrationName::generate()).await
    }

    pub async fn run_with_name(&self, migration_name: MigrationName) -> Result<WorkflowOutcome, WorkflowError> {
        let span = create_run_span(&generate_run_id(), migration_name.as_str());

        async move {
            let result = self.run_steps(migration_name).await;
            if let Err(e) = &result {
                error!(step = %e.step(), "{}", e);
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run_steps(&self, migration_name: MigrationName) -> Result<WorkflowOutcome, WorkflowError> {
        let settings = self.settings;
        let git = GitClient::new(self.executor, &settings.repo_root, &settings.remote);
        let tool = MigrationTool::new(self.executor, &settings.migration_tool, &settings.project_path);

        sync::pull_latest_changes(&git, &settings.branch).await?;
        migrate::add_migration(&tool, &migration_name).await?;
        publish::push_changes(&git, &settings.branch, migration_name, settings.skip_empty_commits).await
    }
}
