// src/exec/supervisor.rs

//! Supervised execution of one tool invocation.
//!
//! Lifecycle: `NotStarted → Running → Draining → Exited(code)`.
//!
//! - The child's stdout and stderr both go into one anonymous spool file, so
//!   the merged stream keeps its interleaving and the child never blocks on a
//!   full pipe while nobody reads.
//! - While the child runs, a separate heartbeat task emits progress events.
//!   It is stopped and joined before any result (or error) is returned.
//! - After exit, the spool is drained into the transcript file and the last
//!   lines are kept in a [`LineTail`].

use std::fmt;
use std::io::SeekFrom;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use anyhow::Context;
use tokio::fs::File;
use tokio::io::{AsyncSeekExt, BufReader};
use tokio::process::Command;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::command::ExecutionRecord;
use crate::config::WorkerConfig;
use crate::errors::{Result, WorkerError};
use crate::exec::drain::drain_output;
use crate::exec::heartbeat;
use crate::exec::tail::LineTail;
use crate::types::{TaskEvent, TaskOutcome};

/// Knobs of the supervisor, usually taken from [`WorkerConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupervisorSettings {
    pub progress_interval: Duration,
    pub tail_lines: usize,
}

impl Default for SupervisorSettings {
    fn default() -> Self {
        Self {
            progress_interval: Duration::from_secs(2),
            tail_lines: 80,
        }
    }
}

impl From<&WorkerConfig> for SupervisorSettings {
    fn from(cfg: &WorkerConfig) -> Self {
        Self {
            progress_interval: cfg.progress_interval,
            tail_lines: cfg.tail_lines,
        }
    }
}

/// One tool run: what to execute and where its transcript goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub record: ExecutionRecord,
    pub transcript: PathBuf,
}

/// What the supervisor observed once the child exited and was drained.
#[derive(Debug, Clone)]
pub struct ExitReport {
    /// Exit code; `-signum` when the process was terminated by a signal.
    pub code: i32,
    pub tail: LineTail,
    pub lines: usize,
    pub heartbeats: u64,
}

impl ExitReport {
    pub fn outcome(&self) -> TaskOutcome {
        TaskOutcome::from_code(self.code)
    }

    /// `Ok(self)` on exit code 0, `ExternalToolFailure` otherwise.
    pub fn into_result(self) -> Result<Self> {
        match self.outcome() {
            TaskOutcome::Succeeded => Ok(self),
            TaskOutcome::Failed(code) => Err(WorkerError::ExternalToolFailure {
                code,
                tail: self.tail.joined(),
                lines: self.tail.len(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    NotStarted,
    Running,
    Draining,
    Exited(i32),
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::NotStarted => f.write_str("not-started"),
            Phase::Running => f.write_str("running"),
            Phase::Draining => f.write_str("draining"),
            Phase::Exited(code) => write!(f, "exited({code})"),
        }
    }
}

fn enter(phase: &mut Phase, next: Phase) {
    debug!(from = %phase, to = %next, "supervisor phase change");
    *phase = next;
}

/// Run the invocation to completion.
///
/// Returns the exit report for any exit code; turning a non-zero code into an
/// error is up to the caller (see [`ExitReport::into_result`]).
pub async fn supervise(
    invocation: &Invocation,
    settings: &SupervisorSettings,
    progress: &mpsc::Sender<TaskEvent>,
) -> Result<ExitReport> {
    let record = &invocation.record;
    let mut phase = Phase::NotStarted;

    let spool = tempfile::tempfile().context("creating output spool file")?;
    let stdout_spool = spool.try_clone().context("duplicating spool handle")?;
    let stderr_spool = spool.try_clone().context("duplicating spool handle")?;

    let mut cmd = Command::new(record.program());
    cmd.args(record.args())
        .current_dir(&record.working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::from(stdout_spool))
        .stderr(Stdio::from(stderr_spool))
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning '{}' in {}", record.program(), record.working_dir.display()))?;
    enter(&mut phase, Phase::Running);
    info!(pid = child.id(), "waiting for {} to finish", record.program());

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let beats = tokio::spawn(heartbeat::run(
        settings.progress_interval,
        progress.clone(),
        stop_rx,
    ));

    let waited = child.wait().await;
    let _ = stop_tx.send(());
    let heartbeats = beats.await.context("joining heartbeat task")?;
    let status = waited.with_context(|| format!("waiting for '{}'", record.program()))?;
    enter(&mut phase, Phase::Draining);

    let mut spool = File::from_std(spool);
    spool
        .seek(SeekFrom::Start(0))
        .await
        .context("rewinding output spool")?;
    let mut transcript = File::create(&invocation.transcript)
        .await
        .with_context(|| format!("creating transcript {}", invocation.transcript.display()))?;
    let mut tail = LineTail::new(settings.tail_lines);
    let lines = drain_output(BufReader::new(spool), &mut transcript, &mut tail).await?;

    let code = exit_code(&status);
    enter(&mut phase, Phase::Exited(code));
    info!(
        exit_code = code,
        success = status.success(),
        lines,
        heartbeats,
        "tool process exited"
    );

    Ok(ExitReport {
        code,
        tail,
        lines,
        heartbeats,
    })
}

/// Exit code of a finished child, `-signum` for a signal death (so SIGKILL
/// reads as `-9`).
fn exit_code(status: &std::process::ExitStatus) -> i32 {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(sig) = status.signal() {
            return -sig;
        }
    }
    status.code().unwrap_or(-1)
}
