use crate::config::{LogConfig, LogFormat};
use anyhow::{anyhow, Context, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

/// Keeps the file writer flushing until dropped
pub struct TelemetryGuard {
    _file_guard: WorkerGuard,
}

/// Log to stdout and append to `log.file`, both at the same level and format.
pub fn init_telemetry(log: &LogConfig) -> Result<TelemetryGuard> {
    let directory = log
        .file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = log
        .file
        .file_name()
        .ok_or_else(|| anyhow!("Log file path '{}' has no file name", log.file.display()))?;
    std::fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create log directory {}", directory.display()))?;

    // never() opens in append mode and does not rotate
    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(directory, file_name));

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&log.level)
            .with_context(|| format!("Invalid log level '{}'", log.level))?,
    };

    match log.format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stdout))
            .with(fmt::layer().with_target(false).with_ansi(false).with_writer(file_writer))
            .try_init()?,
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_current_span(true).with_writer(std::io::stdout))
            .with(fmt::layer().json().with_current_span(true).with_writer(file_writer))
            .try_init()?,
    }

    Ok(TelemetryGuard { _file_guard: guard })
}

/// Generate an id that ties together every log line of one run
pub fn generate_run_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn create_run_span(run_id: &str, migration_name: &str) -> tracing::Span {
    tracing::info_span!(
        "migration_run",
        run.id = run_id,
        migration.name = migration_name
    )
}
