// src/input/descriptor.rs

//! The input file shapes a pipeline may hand to the worker.

use std::path::PathBuf;

use serde_json::{Map, Value};

use crate::errors::WorkerError;

/// An in-process file handle: something exposing a `path` and/or a `name`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileHandle {
    pub path: Option<PathBuf>,
    pub name: Option<String>,
}

impl FileHandle {
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            name: None,
        }
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            path: None,
            name: Some(name.into()),
        }
    }
}

/// One entry of the pipeline's `input_files` list.
///
/// Resolution precedence (see [`crate::input::resolve_path`]):
/// mapping (`path`, then `name` key) → handle path → handle name → raw path.
#[derive(Debug, Clone, PartialEq)]
pub enum InputDescriptor {
    /// JSON object, usually an output file of a previous task.
    Mapping(Map<String, Value>),
    Handle(FileHandle),
    Raw(PathBuf),
}

impl InputDescriptor {
    /// Explicit `display_name` of a mapping, if it is a non-empty string.
    pub fn explicit_display_name(&self) -> Option<&str> {
        match self {
            InputDescriptor::Mapping(map) => map
                .get("display_name")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty()),
            _ => None,
        }
    }
}

impl TryFrom<Value> for InputDescriptor {
    type Error = WorkerError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(InputDescriptor::Raw(PathBuf::from(s))),
            Value::Object(map) => Ok(InputDescriptor::Mapping(map)),
            other => Err(WorkerError::UnresolvablePath(other.to_string())),
        }
    }
}

impl From<&str> for InputDescriptor {
    fn from(path: &str) -> Self {
        InputDescriptor::Raw(PathBuf::from(path))
    }
}

impl From<PathBuf> for InputDescriptor {
    fn from(path: PathBuf) -> Self {
        InputDescriptor::Raw(path)
    }
}

impl From<FileHandle> for InputDescriptor {
    fn from(handle: FileHandle) -> Self {
        InputDescriptor::Handle(handle)
    }
}

impl From<Map<String, Value>> for InputDescriptor {
    fn from(map: Map<String, Value>) -> Self {
        InputDescriptor::Mapping(map)
    }
}
