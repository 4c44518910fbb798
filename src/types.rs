// src/types.rs

//! Small shared types: per-run context, progress events and exit outcomes.

use tracing::Span;

/// Registered task name of the worker in the pipeline.
pub const TASK_NAME: &str = "openrelik-worker-amcache-evilhunter.tasks.amcache-evilhunter";

/// Human-readable worker name, also used as a log correlation field.
pub const WORKER_DISPLAY_NAME: &str = "AmCache-EvilHunter";

/// Correlation fields for one task run.
///
/// Passed explicitly to every component instead of binding a global logger;
/// [`TaskContext::span`] gives the `tracing` span all logs of a run live in.
#[derive(Debug, Clone)]
pub struct TaskContext {
    pub task_id: String,
    pub task_name: String,
    pub worker_name: String,
    pub workflow_id: Option<String>,
}

impl TaskContext {
    pub fn new(task_id: impl Into<String>, workflow_id: Option<String>) -> Self {
        Self {
            task_id: task_id.into(),
            task_name: TASK_NAME.to_string(),
            worker_name: WORKER_DISPLAY_NAME.to_string(),
            workflow_id,
        }
    }

    /// Context with a freshly generated task id.
    pub fn generate(workflow_id: Option<String>) -> Self {
        Self::new(uuid::Uuid::new_v4().simple().to_string(), workflow_id)
    }

    pub fn span(&self) -> Span {
        tracing::info_span!(
            "task",
            task_id = %self.task_id,
            task_name = %self.task_name,
            worker_name = %self.worker_name,
            workflow_id = self.workflow_id.as_deref().unwrap_or(""),
        )
    }
}

/// Out-of-band signals emitted while a task runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskEvent {
    /// "Task is alive" heartbeat. Carries no payload.
    Progress,
}

/// Terminal outcome of one external tool invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Succeeded,
    Failed(i32),
}

impl TaskOutcome {
    pub fn from_code(code: i32) -> Self {
        if code == 0 {
            TaskOutcome::Succeeded
        } else {
            TaskOutcome::Failed(code)
        }
    }
}
