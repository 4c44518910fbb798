// src/engine/task.rs

//! One task run, from the pipeline's inputs to the task result.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{Instrument, debug, info};

use crate::artifacts::{ArtifactSet, allocate, finalize};
use crate::command::{EnvSource, ExecutionRecord, TaskConfig, build_command, build_flags};
use crate::config::WorkerConfig;
use crate::engine::report::{TaskResult, aggregate};
use crate::errors::Result;
use crate::exec::{Invocation, ToolBackend};
use crate::input::{InputDescriptor, ResolvedInput, get_input_files, resolve, select};
use crate::types::{TaskContext, TaskEvent};

/// Everything the pipeline supplies for one task run.
#[derive(Debug, Clone, Default)]
pub struct TaskRequest {
    /// Encoded result of the previous task; overrides `input_files`.
    pub pipe_result: Option<String>,
    pub input_files: Vec<InputDescriptor>,
    pub output_path: PathBuf,
    pub workflow_id: Option<String>,
    pub task_config: Option<TaskConfig>,
}

/// A qualifying input with its artifacts reserved and its command built.
#[derive(Debug, Clone)]
pub struct PlannedInput {
    pub input: ResolvedInput,
    pub artifacts: ArtifactSet,
    pub invocation: Invocation,
}

/// Runs tasks against a [`ToolBackend`].
pub struct TaskRunner<B> {
    config: WorkerConfig,
    env: Box<dyn EnvSource>,
    backend: B,
}

impl<B: ToolBackend> TaskRunner<B> {
    pub fn new(config: WorkerConfig, env: Box<dyn EnvSource>, backend: B) -> Self {
        Self {
            config,
            env,
            backend,
        }
    }

    /// Resolve inputs and build every command without running anything.
    pub fn plan(&self, request: &TaskRequest) -> Result<Vec<PlannedInput>> {
        let inputs = get_input_files(request.pipe_result.as_deref(), request.input_files.clone())?;
        let hives = select(&inputs, &self.config.hive_suffix)?;
        let flags = build_flags(request.task_config.as_ref(), self.env.as_ref());

        hives
            .into_iter()
            .map(|item| plan_input(&self.config.tool_binary, item, &request.output_path, &flags))
            .collect()
    }

    /// Process every qualifying input in order and build the task result.
    ///
    /// The first failing input aborts the run; later inputs are not touched.
    /// Heartbeats go to `progress` while the tool runs.
    pub async fn run(
        &mut self,
        ctx: &TaskContext,
        request: &TaskRequest,
        progress: &mpsc::Sender<TaskEvent>,
    ) -> Result<TaskResult> {
        self.run_inner(request, progress)
            .instrument(ctx.span())
            .await
    }

    async fn run_inner(
        &mut self,
        request: &TaskRequest,
        progress: &mpsc::Sender<TaskEvent>,
    ) -> Result<TaskResult> {
        debug!(workflow_id = ?request.workflow_id, "starting task");

        let inputs = get_input_files(request.pipe_result.as_deref(), request.input_files.clone())?;
        let hives = select(&inputs, &self.config.hive_suffix)?;
        let flags = build_flags(request.task_config.as_ref(), self.env.as_ref());

        tokio::fs::create_dir_all(&request.output_path)
            .await
            .with_context(|| format!("creating output directory {}", request.output_path.display()))?;

        let mut output_files = Vec::new();
        let mut records: Vec<ExecutionRecord> = Vec::new();

        for item in hives {
            let planned = plan_input(&self.config.tool_binary, item, &request.output_path, &flags)?;
            let record = &planned.invocation.record;
            info!(
                hive = %planned.input.path.display(),
                display_name = %planned.input.display_name,
                "running AmCache-EvilHunter"
            );
            debug!(command = %record.command_line(), cwd = %record.working_dir.display(), "command");
            records.push(record.clone());

            let report = self
                .backend
                .execute(&planned.invocation, progress)
                .await?
                .into_result()?;
            info!(
                hive = %planned.input.path.display(),
                lines = report.lines,
                "AmCache-EvilHunter finished"
            );

            output_files.extend(finalize(planned.artifacts));
        }

        aggregate(output_files, &records, request.workflow_id.clone())
    }
}

fn plan_input(
    tool: &str,
    item: &InputDescriptor,
    output_root: &Path,
    flags: &[String],
) -> Result<PlannedInput> {
    let input = resolve(item)?;
    let artifacts = allocate(output_root, &input.display_name);
    let argv = build_command(tool, &artifacts.json.path, &artifacts.csv.path, &input.path, flags);

    let invocation = Invocation {
        record: ExecutionRecord::new(argv, input.working_dir.clone()),
        transcript: artifacts.stdout.path.clone(),
    };

    Ok(PlannedInput {
        input,
        artifacts,
        invocation,
    })
}
