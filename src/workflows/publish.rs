use super::{WorkflowError, WorkflowOutcome};
use crate::external::{CommandError, GitClient};
use crate::migration_name::MigrationName;
use tracing::{info, warn};

/// Stage everything, commit it as `migration_name` and push `branch`.
///
/// With `skip_empty_commits`, a clean tree after staging ends the run as
/// [`WorkflowOutcome::NoChanges`] without committing or pushing. Otherwise the
/// commit is attempted regardless and git decides.
pub async fn push_changes(
    git: &GitClient<'_>,
    branch: &str,
    migration_name: MigrationName,
    skip_empty_commits: bool,
) -> Result<WorkflowOutcome, WorkflowError> {
    let into_error = |source: CommandError| WorkflowError::Publish { source };

    git.add_all().await.map_err(into_error)?;

    if skip_empty_commits && !git.has_changes().await.map_err(into_error)? {
        warn!(
            "No changes to commit after generating {}; skipping commit and push.",
            migration_name
        );
        return Ok(WorkflowOutcome::NoChanges { migration_name });
    }

    git.commit_migration(migration_name.as_str()).await.map_err(into_error)?;
    git.push(branch).await.map_err(into_error)?;
    info!("Changes pushed to repository.");

    Ok(WorkflowOutcome::Published { migration_name })
}
