use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "auto-migrate.toml";
pub const DEFAULT_BRANCH: &str = "AutoMigrationtest";

/// Main configuration structure for auto-migrate
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AutoMigrateConfig {
    /// Root of the backend git working copy
    pub repo_root: PathBuf,
    /// Project handed to the migration tool, relative to `repo_root` unless absolute
    pub project_path: PathBuf,
    /// Branch that is pulled before and pushed after generating
    pub branch: String,
    /// Remote used for pull and push
    pub remote: String,
    /// Migration generator invocation, e.g. `dotnet ef`
    pub migration_tool: String,
    /// End the run without committing when the tool changed nothing
    pub skip_empty_commits: bool,
    /// Logging settings
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    /// Append-only log file
    pub file: PathBuf,
    /// Default level when RUST_LOG is unset
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl Default for AutoMigrateConfig {
    fn default() -> Self {
        Self {
            repo_root: PathBuf::from("."),
            project_path: PathBuf::from("Infrastructure"),
            branch: DEFAULT_BRANCH.to_string(),
            remote: "origin".to_string(),
            migration_tool: "dotnet ef".to_string(),
            skip_empty_commits: false,
            log: LogConfig::default(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("migration_automation.log"),
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

/// Values fixed for the whole run, resolved once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSettings {
    pub repo_root: PathBuf,
    pub project_path: PathBuf,
    pub branch: String,
    pub remote: String,
    pub migration_tool: String,
    pub skip_empty_commits: bool,
}

/// Where a configuration was read from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AutoMigrateConfig,
    /// Directory relative paths resolve against
    pub base_dir: PathBuf,
}

impl AutoMigrateConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. `explicit_file`, or `auto-migrate.toml` in the current directory
    /// 3. Environment variables (prefixed with AUTO_MIGRATE_, nested with `__`)
    pub fn load(explicit_file: Option<&Path>) -> Result<LoadedConfig> {
        let cwd = std::env::current_dir().context("Failed to read current directory")?;

        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        let mut base_dir = cwd.clone();
        match explicit_file {
            Some(path) => {
                builder = builder.add_source(File::from(path));
                if let Some(parent) = path.parent() {
                    base_dir = cwd.join(parent);
                }
            }
            None => {
                let default_file = cwd.join(DEFAULT_CONFIG_FILE);
                if default_file.exists() {
                    builder = builder.add_source(File::from(default_file));
                }
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("AUTO_MIGRATE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: AutoMigrateConfig = builder
            .build()
            .and_then(|config| config.try_deserialize())
            .context("Failed to load configuration")?;

        Ok(LoadedConfig { config, base_dir })
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate and turn relative paths into absolute ones under `base_dir`.
    pub fn resolve(&self, base_dir: &Path) -> Result<WorkflowSettings> {
        if self.branch.trim().is_empty() || self.branch.chars().any(char::is_whitespace) {
            bail!("Invalid branch name '{}'", self.branch);
        }
        if self.remote.trim().is_empty() {
            bail!("Remote name must not be empty");
        }
        if self.migration_tool.trim().is_empty() {
            bail!("Migration tool command must not be empty");
        }

        let repo_root = base_dir.join(&self.repo_root);
        let project_path = repo_root.join(&self.project_path);

        Ok(WorkflowSettings {
            repo_root,
            project_path,
            branch: self.branch.clone(),
            remote: self.remote.clone(),
            migration_tool: self.migration_tool.trim().to_string(),
            skip_empty_commits: self.skip_empty_commits,
        })
    }
}
