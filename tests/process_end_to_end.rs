// tests/process_end_to_end.rs
//
// Runs the real process backend against a shell script that stands in for
// amcache-evilhunter.

#![cfg(unix)]

mod common;
use crate::common::{WELL_BEHAVED_TOOL, init_tracing, with_timeout, write_hive, write_tool};

use std::error::Error;
use std::time::Duration;

use serde_json::json;
use tokio::sync::mpsc;

use amcache_worker::config::WorkerConfig;
use amcache_worker::errors::WorkerError;
use amcache_worker::exec::{ProcessBackend, SupervisorSettings};
use amcache_worker::types::TaskContext;
use amcache_worker_test_utils::builders::{RunnerBuilder, TaskRequestBuilder};

type TestResult = Result<(), Box<dyn Error>>;

fn backend() -> ProcessBackend {
    ProcessBackend::new(SupervisorSettings {
        progress_interval: Duration::from_millis(25),
        tail_lines: 80,
    })
}

#[tokio::test]
async fn real_tool_run_produces_artifacts_and_transcript() -> TestResult {
    init_tracing();
    let tools = tempfile::tempdir()?;
    let evidence = tempfile::tempdir()?;
    let out = tempfile::tempdir()?;
    let tool = write_tool(tools.path(), WELL_BEHAVED_TOOL);
    let hive = write_hive(evidence.path());

    let mut runner = RunnerBuilder::new()
        .tool(tool.to_string_lossy())
        .build(backend());
    let request = TaskRequestBuilder::new(out.path())
        .input(&hive)
        .input(evidence.path().join("Amcache.hve.LOG1"))
        .config("exclude_os", json!(true))
        .build();
    let (tx, _rx) = mpsc::channel(64);

    let result = with_timeout(runner.run(&TaskContext::generate(None), &request, &tx)).await?;

    assert_eq!(result.output_files.len(), 3);
    let json_out = &result.output_files[0].path;
    let csv_out = &result.output_files[1].path;
    let transcript = &result.output_files[2].path;
    assert_eq!(std::fs::read_to_string(json_out)?.trim(), r#"{"records": []}"#);
    assert_eq!(std::fs::read_to_string(csv_out)?.trim(), "name,sha1");

    let transcript = std::fs::read_to_string(transcript)?;
    let canonical_evidence = std::fs::canonicalize(evidence.path())?;
    assert!(transcript.contains(&format!("cwd {}", canonical_evidence.display())));
    assert!(transcript.contains("Amcache.hve.LOG1"));
    assert!(transcript.contains("Amcache.hve.LOG2"));
    assert!(transcript.contains("arg --exclude-os"));
    assert!(result.command.ends_with("--exclude-os"));
    Ok(())
}

#[tokio::test]
async fn failing_tool_surfaces_exit_code_and_last_lines() -> TestResult {
    init_tracing();
    let tools = tempfile::tempdir()?;
    let evidence = tempfile::tempdir()?;
    let out = tempfile::tempdir()?;
    let tool = write_tool(tools.path(), "printf 'a\\n'; printf 'b\\n' >&2; exit 7");
    let hive = write_hive(evidence.path());

    let mut runner = RunnerBuilder::new()
        .tool(tool.to_string_lossy())
        .build(backend());
    let request = TaskRequestBuilder::new(out.path()).input(&hive).build();
    let (tx, _rx) = mpsc::channel(64);

    let err = with_timeout(runner.run(&TaskContext::generate(None), &request, &tx))
        .await
        .unwrap_err();

    match &err {
        WorkerError::ExternalToolFailure { code, tail, lines } => {
            assert_eq!(*code, 7);
            assert_eq!(tail, "a\nb\n");
            assert_eq!(*lines, 2);
        }
        other => panic!("expected ExternalToolFailure, got {other:?}"),
    }
    let msg = err.to_string();
    assert!(msg.contains("exited with 7"));
    assert!(msg.contains("a\nb\n"));

    // The transcript of the failed run stays on disk; nothing else was written.
    let written: Vec<_> = std::fs::read_dir(out.path())?.collect::<Result<_, _>>()?;
    assert_eq!(written.len(), 1);
    assert_eq!(written[0].path().extension().and_then(|e| e.to_str()), Some("txt"));
    Ok(())
}

#[tokio::test]
async fn noisy_tool_keeps_only_the_last_eighty_lines() -> TestResult {
    init_tracing();
    let tools = tempfile::tempdir()?;
    let evidence = tempfile::tempdir()?;
    let out = tempfile::tempdir()?;
    let tool = write_tool(
        tools.path(),
        "i=1; while [ $i -le 5000 ]; do echo \"record $i\"; i=$((i+1)); done; exit 4",
    );
    let hive = write_hive(evidence.path());

    let mut runner = RunnerBuilder::new()
        .tool(tool.to_string_lossy())
        .build(backend());
    let request = TaskRequestBuilder::new(out.path()).input(&hive).build();
    let (tx, _rx) = mpsc::channel(64);

    let err = with_timeout(runner.run(&TaskContext::generate(None), &request, &tx))
        .await
        .unwrap_err();

    let WorkerError::ExternalToolFailure { code, tail, lines } = err else {
        panic!("expected ExternalToolFailure, got {err:?}");
    };
    assert_eq!(code, 4);
    assert_eq!(lines, 80);
    assert_eq!(tail.lines().count(), 80);
    assert!(tail.starts_with("record 4921\n"));
    assert!(tail.ends_with("record 5000\n"));
    Ok(())
}

#[tokio::test]
async fn killed_tool_reports_the_signal_as_negative_code() -> TestResult {
    init_tracing();
    let tools = tempfile::tempdir()?;
    let evidence = tempfile::tempdir()?;
    let out = tempfile::tempdir()?;
    let tool = write_tool(tools.path(), "echo dying; kill -9 $$");
    let hive = write_hive(evidence.path());

    let mut runner = RunnerBuilder::new()
        .tool(tool.to_string_lossy())
        .build(backend());
    let request = TaskRequestBuilder::new(out.path()).input(&hive).build();
    let (tx, _rx) = mpsc::channel(64);

    let err = with_timeout(runner.run(&TaskContext::generate(None), &request, &tx))
        .await
        .unwrap_err();

    let WorkerError::ExternalToolFailure { code, tail, .. } = &err else {
        panic!("expected ExternalToolFailure, got {err:?}");
    };
    assert_eq!(*code, -9);
    assert_eq!(tail, "dying\n");
    assert!(err.to_string().starts_with("amcache-evilhunter exited with -9\n"));
    Ok(())
}

#[tokio::test]
async fn slow_tool_emits_heartbeats() -> TestResult {
    init_tracing();
    let tools = tempfile::tempdir()?;
    let evidence = tempfile::tempdir()?;
    let out = tempfile::tempdir()?;
    let tool = write_tool(
        tools.path(),
        &format!("sleep 0.3\n{WELL_BEHAVED_TOOL}"),
    );
    let hive = write_hive(evidence.path());

    let mut runner = RunnerBuilder::new()
        .tool(tool.to_string_lossy())
        .build(backend());
    let request = TaskRequestBuilder::new(out.path()).input(&hive).build();
    let (tx, mut rx) = mpsc::channel(64);

    with_timeout(runner.run(&TaskContext::generate(None), &request, &tx)).await?;

    let mut beats = 0;
    while rx.try_recv().is_ok() {
        beats += 1;
    }
    assert!(beats >= 3, "expected several heartbeats, got {beats}");
    Ok(())
}

#[tokio::test]
async fn missing_tool_binary_is_reported() -> TestResult {
    init_tracing();
    let evidence = tempfile::tempdir()?;
    let out = tempfile::tempdir()?;
    let hive = write_hive(evidence.path());

    let config = WorkerConfig {
        tool_binary: "/nonexistent/amcache-evilhunter".into(),
        ..WorkerConfig::default()
    };
    let mut runner = RunnerBuilder::new().worker_config(config).build(backend());
    let request = TaskRequestBuilder::new(out.path()).input(&hive).build();
    let (tx, _rx) = mpsc::channel(64);

    let err = runner
        .run(&TaskContext::generate(None), &request, &tx)
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("spawning"));
    assert_eq!(std::fs::read_dir(out.path())?.count(), 0);
    Ok(())
}
