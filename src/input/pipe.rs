// src/input/pipe.rs

//! Input hand-off from a previous pipeline task.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

use crate::errors::{Result, WorkerError};
use crate::input::descriptor::InputDescriptor;

/// Pick the task's input files.
///
/// When `pipe_result` (base64 JSON of a previous task result) is present, its
/// `output_files` replace `input_files`; a result without `output_files`
/// yields no inputs.
pub fn get_input_files(
    pipe_result: Option<&str>,
    input_files: Vec<InputDescriptor>,
) -> Result<Vec<InputDescriptor>> {
    let Some(encoded) = pipe_result.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(input_files);
    };

    let decoded = STANDARD
        .decode(encoded)
        .map_err(|e| WorkerError::PipeResult(format!("not valid base64: {e}")))?;
    let result: Value = serde_json::from_slice(&decoded)?;

    match result.get("output_files") {
        Some(Value::Array(files)) => files
            .iter()
            .cloned()
            .map(InputDescriptor::try_from)
            .collect(),
        Some(Value::Null) | None => Ok(Vec::new()),
        Some(other) => Err(WorkerError::PipeResult(format!(
            "output_files must be a list, got {other}"
        ))),
    }
}
