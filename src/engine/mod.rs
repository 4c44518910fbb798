// src/engine/mod.rs

//! Task orchestration.
//!
//! - [`task`] drives one run: select inputs, reserve artifacts, build and
//!   execute commands, finalize outputs.
//! - [`report`] assembles and encodes the task result.
//! - [`metadata`] describes the task and its config fields to the pipeline.

pub mod metadata;
pub mod report;
pub mod task;

pub use metadata::{TaskMetadata, task_metadata};
pub use report::{COMMAND_SEPARATOR, TaskResult, aggregate};
pub use task::{PlannedInput, TaskRequest, TaskRunner};
