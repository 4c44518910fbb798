use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use amcache_worker::errors::Result;
use amcache_worker::exec::{ExitReport, Invocation, LineTail, ToolBackend};
use amcache_worker::types::TaskEvent;
use tokio::sync::mpsc;

/// Scripted result of one fake tool run.
#[derive(Debug, Clone)]
pub struct FakeRun {
    pub code: i32,
    pub lines: Vec<String>,
}

impl FakeRun {
    pub fn success() -> Self {
        Self {
            code: 0,
            lines: vec!["done\n".to_string()],
        }
    }

    pub fn exit(code: i32, lines: &[&str]) -> Self {
        Self {
            code,
            lines: lines.iter().map(|l| l.to_string()).collect(),
        }
    }
}

/// A fake tool backend that:
/// - records every invocation it receives
/// - emits one heartbeat per run
/// - answers with the next scripted `FakeRun` (success when the script is
///   exhausted).
pub struct FakeToolBackend {
    script: VecDeque<FakeRun>,
    tail_lines: usize,
    invocations: Arc<Mutex<Vec<Invocation>>>,
}

impl FakeToolBackend {
    pub fn new(script: Vec<FakeRun>) -> Self {
        Self {
            script: script.into(),
            tail_lines: 80,
            invocations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared handle to the recorded invocations.
    pub fn invocations(&self) -> Arc<Mutex<Vec<Invocation>>> {
        Arc::clone(&self.invocations)
    }
}

impl ToolBackend for FakeToolBackend {
    fn execute<'a>(
        &'a mut self,
        invocation: &'a Invocation,
        progress: &'a mpsc::Sender<TaskEvent>,
    ) -> Pin<Box<dyn Future<Output = Result<ExitReport>> + Send + 'a>> {
        let run = self.script.pop_front().unwrap_or_else(FakeRun::success);
        let invocations = Arc::clone(&self.invocations);
        let tail_lines = self.tail_lines;

        Box::pin(async move {
            {
                let mut guard = invocations.lock().unwrap();
                guard.push(invocation.clone());
            }

            let _ = progress.try_send(TaskEvent::Progress);

            let tail = LineTail::from_lines(tail_lines, run.lines.iter().cloned());
            Ok(ExitReport {
                code: run.code,
                lines: run.lines.len(),
                tail,
                heartbeats: 1,
            })
        })
    }
}
