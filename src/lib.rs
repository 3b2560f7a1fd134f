// auto-migrate library - scheduled schema-migration generation
// Exposes the workflow pieces for the binary and for integration tests

pub mod cli;
pub mod config;
pub mod external;
pub mod migration_name;
pub mod telemetry;
pub mod workflows;

// Re-export key types for easy access
pub use config::{AutoMigrateConfig, LogConfig, LogFormat, WorkflowSettings};
pub use external::{CommandError, CommandExecutor, CommandOutput, CommandRunner, DryRunExecutor, ShellCommandExecutor};
pub use migration_name::MigrationName;
pub use telemetry::{create_run_span, generate_run_id, init_telemetry, TelemetryGuard};
pub use workflows::{exit_status, AutoMigrationWorkflow, WorkflowError, WorkflowOutcome, WorkflowStep};
