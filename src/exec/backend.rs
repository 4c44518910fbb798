// src/exec/backend.rs

//! Pluggable tool backend abstraction.
//!
//! The task engine talks to a `ToolBackend` instead of spawning processes
//! itself. This makes it easy to swap in a scripted fake in tests while
//! keeping the production implementation in [`supervisor`](super::supervisor).

use std::future::Future;
use std::pin::Pin;

use tokio::sync::mpsc;

use crate::errors::Result;
use crate::exec::supervisor::{ExitReport, Invocation, SupervisorSettings, supervise};
use crate::types::TaskEvent;

/// Trait abstracting how one tool invocation is executed.
///
/// Implementations return an [`ExitReport`] for every exit code; the engine
/// decides what a non-zero code means.
pub trait ToolBackend: Send {
    fn execute<'a>(
        &'a mut self,
        invocation: &'a Invocation,
        progress: &'a mpsc::Sender<TaskEvent>,
    ) -> Pin<Box<dyn Future<Output = Result<ExitReport>> + Send + 'a>>;
}

/// Production backend: spawns the real process under the supervisor.
#[derive(Debug, Clone, Default)]
pub struct ProcessBackend {
    settings: SupervisorSettings,
}

impl ProcessBackend {
    pub fn new(settings: SupervisorSettings) -> Self {
        Self { settings }
    }
}

impl ToolBackend for ProcessBackend {
    fn execute<'a>(
        &'a mut self,
        invocation: &'a Invocation,
        progress: &'a mpsc::Sender<TaskEvent>,
    ) -> Pin<Box<dyn Future<Output = Result<ExitReport>> + Send + 'a>> {
        Box::pin(supervise(invocation, &self.settings, progress))
    }
}
