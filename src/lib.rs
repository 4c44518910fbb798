// src/lib.rs

pub mod artifacts;
pub mod cli;
pub mod command;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod input;
pub mod logging;
pub mod types;

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::{CliArgs, Command, RunArgs};
use crate::command::{ProcessEnv, TaskConfig};
use crate::config::{WorkerConfig, resolve_config};
use crate::engine::{TaskRequest, TaskRunner, task_metadata};
use crate::errors::WorkerError;
use crate::exec::{ProcessBackend, SupervisorSettings};
use crate::input::InputDescriptor;
use crate::types::{TaskContext, TaskEvent};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the task request built from CLI arguments
/// - the process backend and the progress channel
pub async fn run(args: CliArgs) -> Result<()> {
    let config = resolve_config(args.config.as_deref())?;
    debug!(?config, "effective worker config");

    match args.command {
        Command::Metadata => {
            println!("{}", serde_json::to_string_pretty(&task_metadata())?);
            Ok(())
        }
        Command::DryRun(run_args) => {
            let request = build_request(&run_args)?;
            let runner = new_runner(config);
            print_dry_run(&runner, &request)
        }
        Command::Run(run_args) => {
            let request = build_request(&run_args)?;
            let ctx = TaskContext::new(
                run_args
                    .task_id
                    .clone()
                    .unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string()),
                request.workflow_id.clone(),
            );
            let mut runner = new_runner(config);

            let (progress_tx, progress_rx) = mpsc::channel::<TaskEvent>(64);
            let listener = tokio::spawn(log_progress(progress_rx));

            let outcome = runner.run(&ctx, &request, &progress_tx).await;
            drop(progress_tx);
            let _ = listener.await;

            let result = outcome?;
            info!(files = result.output_files.len(), "task finished");
            if run_args.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", result.encode()?);
            }
            Ok(())
        }
    }
}

fn new_runner(config: WorkerConfig) -> TaskRunner<ProcessBackend> {
    let backend = ProcessBackend::new(SupervisorSettings::from(&config));
    TaskRunner::new(config, Box::new(ProcessEnv), backend)
}

/// Drain heartbeats; the CLI has no pipeline to forward them to.
async fn log_progress(mut rx: mpsc::Receiver<TaskEvent>) {
    while let Some(event) = rx.recv().await {
        debug!(?event, "task-progress");
    }
}

/// Translate CLI arguments into a task request.
pub fn build_request(args: &RunArgs) -> Result<TaskRequest> {
    let mut input_files: Vec<InputDescriptor> = args
        .inputs
        .iter()
        .cloned()
        .map(InputDescriptor::from)
        .collect();

    if let Some(path) = &args.input_json {
        input_files.extend(read_input_json(path)?);
    }

    let task_config = match (&args.task_config, &args.task_config_file) {
        (Some(inline), _) => Some(parse_task_config(inline)?),
        (None, Some(path)) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading task config {}", path.display()))?;
            Some(parse_task_config(&text)?)
        }
        (None, None) => None,
    };

    Ok(TaskRequest {
        pipe_result: args.pipe_result.clone(),
        input_files,
        output_path: args.output_path.clone(),
        workflow_id: args.workflow_id.clone(),
        task_config,
    })
}

fn read_input_json(path: &Path) -> Result<Vec<InputDescriptor>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading input list {}", path.display()))?;
    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("parsing input list {}", path.display()))?;

    match value {
        Value::Array(items) => Ok(items
            .into_iter()
            .map(InputDescriptor::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()?),
        other => Err(WorkerError::ConfigError(format!(
            "input list {} must be a JSON array, got {other}",
            path.display()
        ))
        .into()),
    }
}

/// Task config must be a JSON object; `null` means "no config".
fn parse_task_config(text: &str) -> Result<TaskConfig> {
    match serde_json::from_str::<Value>(text).context("parsing task config JSON")? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(TaskConfig::new()),
        other => Err(WorkerError::ConfigError(format!(
            "task config must be a JSON object, got {other}"
        ))
        .into()),
    }
}

fn print_dry_run(runner: &TaskRunner<ProcessBackend>, request: &TaskRequest) -> Result<()> {
    let planned = runner.plan(request)?;

    println!("amcache-worker dry-run");
    println!("  output_path = {}", request.output_path.display());
    println!();
    println!("inputs ({}):", planned.len());
    for p in &planned {
        println!("  - {}", p.input.path.display());
        println!("      display_name: {}", p.input.display_name);
        println!("      cwd: {}", p.invocation.record.working_dir.display());
        println!("      cmd: {}", p.invocation.record.command_line());
    }

    debug!("dry-run complete (no execution)");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn run_args() -> RunArgs {
        RunArgs {
            inputs: vec![PathBuf::from("/data/Amcache.hve")],
            input_json: None,
            pipe_result: None,
            output_path: PathBuf::from("/out"),
            workflow_id: Some("wf".into()),
            task_id: None,
            task_config: None,
            task_config_file: None,
            json: false,
        }
    }

    #[test]
    fn request_from_cli_arguments() {
        let mut args = run_args();
        args.task_config = Some(r#"{"exclude_os": true}"#.into());

        let req = build_request(&args).unwrap();
        assert_eq!(req.input_files, vec![InputDescriptor::from("/data/Amcache.hve")]);
        assert_eq!(req.workflow_id.as_deref(), Some("wf"));
        assert_eq!(req.task_config.unwrap()["exclude_os"], Value::Bool(true));
    }

    #[test]
    fn non_object_task_config_is_rejected() {
        let mut args = run_args();
        args.task_config = Some("[1, 2]".into());
        assert!(build_request(&args).is_err());

        args.task_config = Some("null".into());
        assert_eq!(build_request(&args).unwrap().task_config, Some(TaskConfig::new()));
    }

    #[test]
    fn input_json_file_is_appended() {
        let dir = tempfile::tempdir().unwrap();
        let list = dir.path().join("inputs.json");
        std::fs::write(&list, r#"[{"path": "/p/x.hve", "display_name": "Amcache.hve"}, "/p/x.hve.LOG1"]"#)
            .unwrap();

        let mut args = run_args();
        args.input_json = Some(list);
        let req = build_request(&args).unwrap();
        assert_eq!(req.input_files.len(), 3);
        assert_eq!(req.input_files[1].explicit_display_name(), Some("Amcache.hve"));
    }
}
