use super::WorkflowError;
use crate::external::MigrationTool;
use crate::migration_name::MigrationName;
use tracing::info;

// The tool's exit status is the only check; generated files are not inspected.
pub async fn add_migration(tool: &MigrationTool<'_>, migration_name: &MigrationName) -> Result<(), WorkflowError> {
    tool.add_migration(migration_name.as_str())
        .await
        .map_err(|source| WorkflowError::GenerateMigration {
            name: migration_name.clone(),
            source,
        })?;
    info!("Migration {} added.", migration_name);
    Ok(())
}
