#![allow(dead_code)]

use async_trait::async_trait;
use auto_migrate::{CommandError, CommandExecutor, CommandOutput, WorkflowSettings};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

pub fn test_settings() -> WorkflowSettings {
    WorkflowSettings {
        repo_root: PathBuf::from("/srv/OnlineOrdering/Back"),
        project_path: PathBuf::from("/srv/OnlineOrdering/Back/Infrastructure"),
        branch: "AutoMigrationtest".to_string(),
        remote: "origin".to_string(),
        migration_tool: "dotnet ef".to_string(),
        skip_empty_commits: false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCommand {
    pub command: String,
    pub working_dir: Option<PathBuf>,
}

/// Records every command and succeeds unless a command starts with the failing prefix
#[derive(Default)]
pub struct RecordingExecutor {
    calls: Mutex<Vec<RecordedCommand>>,
    fail_prefix: Option<String>,
    spawn_failure: bool,
    status_output: String,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exit 1 with a recognizable stderr for commands starting with `prefix`.
    pub fn failing_on(prefix: &str) -> Self {
        Self {
            fail_prefix: Some(prefix.to_string()),
            ..Self::default()
        }
    }

    /// Refuse to start commands starting with `prefix`.
    pub fn unable_to_start(prefix: &str) -> Self {
        Self {
            fail_prefix: Some(prefix.to_string()),
            spawn_failure: true,
            ..Self::default()
        }
    }

    /// Output returned for `git status --porcelain`.
    pub fn with_status(mut self, porcelain: &str) -> Self {
        self.status_output = porcelain.to_string();
        self
    }

    pub fn calls(&self) -> Vec<RecordedCommand> {
        self.calls.lock().unwrap().clone()
    }

    pub fn commands(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.command).collect()
    }
}

#[async_trait]
impl CommandExecutor for RecordingExecutor {
    async fn execute(
        &self,
        command: &str,
        working_dir: Option<&Path>,
    ) -> Result<CommandOutput, CommandError> {
        self.calls.lock().unwrap().push(RecordedCommand {
            command: command.to_string(),
            working_dir: working_dir.map(Path::to_path_buf),
        });

        if let Some(prefix) = &self.fail_prefix {
            if command.starts_with(prefix.as_str()) {
                if self.spawn_failure {
                    return Err(CommandError::Spawn {
                        command: command.to_string(),
                        message: "No such file or directory (os error 2)".to_string(),
                    });
                }
                return Ok(CommandOutput {
                    status_code: 1,
                    stdout: String::new(),
                    stderr: format!("simulated failure of {}\n", prefix),
                });
            }
        }

        if command == "git status --porcelain" {
            return Ok(CommandOutput::ok(self.status_output.clone()));
        }
        Ok(CommandOutput::ok(format!("ok: {}\n", command)))
    }
}

#[derive(Debug, Clone)]
pub struct LogEvent {
    pub level: Level,
    pub message: String,
}

/// Log events captured on the current thread
#[derive(Clone, Default)]
pub struct LogCapture {
    events: Arc<Mutex<Vec<LogEvent>>>,
}

impl LogCapture {
    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|e| e.level == level)
            .map(|e| e.message)
            .collect()
    }

    pub fn count_at_containing(&self, level: Level, needle: &str) -> usize {
        self.messages_at(level).iter().filter(|m| m.contains(needle)).count()
    }
}

struct CaptureLayer {
    events: Arc<Mutex<Vec<LogEvent>>>,
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.events.lock().unwrap().push(LogEvent {
            level: *event.metadata().level(),
            message: visitor.message,
        });
    }
}

/// Capture everything logged on this thread until the guard drops.
pub fn capture_logs() -> (LogCapture, tracing::subscriber::DefaultGuard) {
    let capture = LogCapture::default();
    let guard = tracing_subscriber::registry()
        .with(CaptureLayer {
            events: capture.events.clone(),
        })
        .set_default();
    (capture, guard)
}
