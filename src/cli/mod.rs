use crate::config::AutoMigrateConfig;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "auto-migrate")]
#[command(about = "Pull a branch, generate a schema migration and push it back")]
#[command(long_about = "auto-migrate brings a backend working copy to the tip of the migration branch, \
                       runs the schema-migration generator with a timestamped name and pushes the \
                       result to the same branch. Every run creates a new migration.")]
pub struct Cli {
    /// Configuration file (defaults to ./auto-migrate.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Root of the backend git working copy, relative to the current directory
    #[arg(long, global = true)]
    pub repo_root: Option<PathBuf>,

    /// Project passed to the migration tool, relative to the repository root
    #[arg(long, global = true)]
    pub project_path: Option<PathBuf>,

    /// Branch to pull from and push to
    #[arg(long, global = true)]
    pub branch: Option<String>,

    /// Migration tool invocation, e.g. "dotnet ef"
    #[arg(long, global = true)]
    pub tool: Option<String>,

    /// Log the commands that would run without running them
    #[arg(long, help = "Show what would run without touching the repository")]
    pub dry_run: bool,

    /// Finish without committing when the migration tool changed nothing
    #[arg(long)]
    pub skip_empty_commits: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Synchronize, generate and publish one migration (default)
    Run,
    /// Print the resolved configuration as TOML
    Config,
}

impl Cli {
    /// Layer flag values over the loaded configuration.
    ///
    /// A relative `--repo-root` is anchored at `cwd` here so that it does not
    /// later resolve against the config file's directory.
    pub fn apply_overrides(&self, config: &mut AutoMigrateConfig, cwd: &Path) {
        if let Some(repo_root) = &self.repo_root {
            config.repo_root = cwd.join(repo_root);
        }
        if let Some(project_path) = &self.project_path {
            config.project_path = project_path.clone();
        }
        if let Some(branch) = &self.branch {
            config.branch = branch.clone();
        }
        if let Some(tool) = &self.tool {
            config.migration_tool = tool.clone();
        }
        if self.skip_empty_commits {
            config.skip_empty_commits = true;
        }
    }
}
