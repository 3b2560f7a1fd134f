use anyhow::{Context, Result};
use auto_migrate::cli::{Cli, Commands};
use auto_migrate::{
    exit_status, init_telemetry, AutoMigrateConfig, AutoMigrationWorkflow, CommandExecutor, DryRunExecutor,
    ShellCommandExecutor, WorkflowOutcome,
};
use clap::Parser;
use std::process::ExitCode;
use tracing::info;

/// Exit status when configuration or logging could not be set up
const SETUP_FAILURE: u8 = 2;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("auto-migrate: {e:#}");
            ExitCode::from(SETUP_FAILURE)
        }
    }
}

async fn run(cli: Cli) -> Result<u8> {
    AutoMigrateConfig::load_env_file()?;

    let loaded = AutoMigrateConfig::load(cli.config.as_deref())?;
    let mut config = loaded.config;
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    cli.apply_overrides(&mut config, &cwd);

    let settings = config.resolve(&loaded.base_dir)?;
    config.log.file = loaded.base_dir.join(&config.log.file);

    if cli.command == Some(Commands::Config) {
        config.repo_root = settings.repo_root.clone();
        config.project_path = settings.project_path.clone();
        print!("{}", config.to_toml()?);
        return Ok(0);
    }

    let _telemetry = init_telemetry(&config.log)?;
    info!(
        repo = %settings.repo_root.display(),
        project = %settings.project_path.display(),
        branch = %settings.branch,
        dry_run = cli.dry_run,
        "Starting migration run"
    );

    let executor: Box<dyn CommandExecutor> = if cli.dry_run {
        Box::new(DryRunExecutor)
    } else {
        Box::new(ShellCommandExecutor)
    };

    let result = AutoMigrationWorkflow::new(executor.as_ref(), &settings).run().await;
    match &result {
        Ok(WorkflowOutcome::Published { migration_name }) => {
            info!("Migration {} published to {}.", migration_name, settings.branch)
        }
        Ok(WorkflowOutcome::NoChanges { migration_name }) => {
            info!("Migration {} produced no changes; nothing published.", migration_name)
        }
        Err(_) => {}
    }

    Ok(exit_status(&result))
}
