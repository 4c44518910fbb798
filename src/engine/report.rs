// src/engine/report.rs

//! Task result assembly and its wire encoding.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::artifacts::OutputDescriptor;
use crate::command::ExecutionRecord;
use crate::errors::{Result, WorkerError};

/// Separator between the command lines of several inputs.
pub const COMMAND_SEPARATOR: &str = " && ";

/// What the worker hands back to the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResult {
    pub output_files: Vec<OutputDescriptor>,
    pub workflow_id: Option<String>,
    pub command: String,
    pub meta: Map<String, Value>,
    #[serde(default)]
    pub file_reports: Vec<Value>,
    #[serde(default)]
    pub task_report: Option<Value>,
}

impl TaskResult {
    /// base64 of the JSON form, as passed between pipeline tasks.
    pub fn encode(&self) -> Result<String> {
        let json = serde_json::to_vec(self)?;
        Ok(STANDARD.encode(json))
    }

    pub fn decode(encoded: &str) -> Result<Self> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| WorkerError::PipeResult(format!("not valid base64: {e}")))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Combine everything produced across inputs into the task result.
///
/// Fails with `NoOutputProduced` when there are no output files at all.
pub fn aggregate(
    output_files: Vec<OutputDescriptor>,
    records: &[ExecutionRecord],
    workflow_id: Option<String>,
) -> Result<TaskResult> {
    if output_files.is_empty() {
        return Err(WorkerError::NoOutputProduced);
    }

    let command = records
        .iter()
        .map(ExecutionRecord::command_line)
        .collect::<Vec<_>>()
        .join(COMMAND_SEPARATOR);

    Ok(TaskResult {
        output_files,
        workflow_id,
        command,
        meta: Map::new(),
        file_reports: Vec::new(),
        task_report: None,
    })
}
