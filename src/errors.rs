// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("No input file ending in '{suffix}' provided among input_files")]
    NoQualifyingInput { suffix: String },

    #[error("Cannot derive a filesystem path from input descriptor: {0}")]
    UnresolvablePath(String),

    /// The external tool exited non-zero. `tail` holds the last `lines`
    /// lines of its merged stdout/stderr.
    #[error("amcache-evilhunter exited with {code}\n--- stdout (last {lines} lines) ---\n{tail}")]
    ExternalToolFailure {
        code: i32,
        tail: String,
        lines: usize,
    },

    #[error("Error processing task: no output files were produced")]
    NoOutputProduced,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid pipe result: {0}")]
    PipeResult(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, WorkerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_failure_message_embeds_code_and_tail() {
        let err = WorkerError::ExternalToolFailure {
            code: 7,
            tail: "a\nb\n".to_string(),
            lines: 2,
        };
        let msg = err.to_string();
        assert!(msg.starts_with("amcache-evilhunter exited with 7\n"));
        assert!(msg.contains("--- stdout (last 2 lines) ---\na\nb\n"));
    }
}
