// src/exec/mod.rs

//! Process execution layer.
//!
//! This module runs the external tool with `tokio::process::Command` and
//! reports liveness while it runs.
//!
//! - [`supervisor`] owns the lifecycle of one child process.
//! - [`heartbeat`] is the timer task emitting progress events.
//! - [`drain`] copies captured output into the transcript.
//! - [`tail`] keeps the last output lines for diagnostics.
//! - [`backend`] provides the `ToolBackend` trait and the production
//!   `ProcessBackend`, which tests can replace with a fake.

pub mod backend;
pub mod drain;
pub mod heartbeat;
pub mod supervisor;
pub mod tail;

pub use backend::{ProcessBackend, ToolBackend};
pub use supervisor::{ExitReport, Invocation, SupervisorSettings, supervise};
pub use tail::LineTail;
