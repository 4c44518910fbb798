#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use amcache_worker::command::TaskConfig;
use amcache_worker::config::WorkerConfig;
use amcache_worker::engine::{TaskRequest, TaskRunner};
use amcache_worker::exec::ToolBackend;
use amcache_worker::input::InputDescriptor;
use serde_json::Value;

/// Builder for `TaskRequest` to simplify test setup.
pub struct TaskRequestBuilder {
    request: TaskRequest,
}

impl TaskRequestBuilder {
    pub fn new(output_path: impl AsRef<Path>) -> Self {
        Self {
            request: TaskRequest {
                output_path: output_path.as_ref().to_path_buf(),
                workflow_id: Some("workflow-test".to_string()),
                ..TaskRequest::default()
            },
        }
    }

    pub fn input(mut self, path: impl Into<PathBuf>) -> Self {
        self.request
            .input_files
            .push(InputDescriptor::Raw(path.into()));
        self
    }

    pub fn descriptor(mut self, descriptor: InputDescriptor) -> Self {
        self.request.input_files.push(descriptor);
        self
    }

    pub fn pipe_result(mut self, encoded: &str) -> Self {
        self.request.pipe_result = Some(encoded.to_string());
        self
    }

    pub fn workflow_id(mut self, id: &str) -> Self {
        self.request.workflow_id = Some(id.to_string());
        self
    }

    pub fn config(mut self, key: &str, value: Value) -> Self {
        self.request
            .task_config
            .get_or_insert_with(TaskConfig::new)
            .insert(key.to_string(), value);
        self
    }

    pub fn build(self) -> TaskRequest {
        self.request
    }
}

/// Builder for a `TaskRunner` with a controlled environment.
pub struct RunnerBuilder {
    config: WorkerConfig,
    env: HashMap<String, String>,
}

impl RunnerBuilder {
    pub fn new() -> Self {
        Self {
            config: WorkerConfig::default(),
            env: HashMap::new(),
        }
    }

    pub fn tool(mut self, binary: impl Into<String>) -> Self {
        self.config.tool_binary = binary.into();
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    pub fn worker_config(mut self, config: WorkerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build<B: ToolBackend>(self, backend: B) -> TaskRunner<B> {
        TaskRunner::new(self.config, Box::new(self.env), backend)
    }
}

impl Default for RunnerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
