use super::WorkflowError;
use crate::external::GitClient;
use tracing::info;

/// Bring the working copy to the remote tip of `branch`.
///
/// A merge conflict is reported like any other git failure.
pub async fn pull_latest_changes(git: &GitClient<'_>, branch: &str) -> Result<(), WorkflowError> {
    git.checkout(branch)
        .await
        .map_err(|source| WorkflowError::Synchronize { source })?;
    info!("Checked out {}.", branch);

    git.pull(branch)
        .await
        .map_err(|source| WorkflowError::Synchronize { source })?;
    info!(repo = %git.repo_root().display(), "Pulled last changes.");

    Ok(())
}
