// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! The CLI stands in for the pipeline runtime: it supplies inputs, output
//! directory, workflow id and task config, and prints the task result.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Command-line arguments for `amcache-worker`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "amcache-worker",
    version,
    about = "Run AmCache-EvilHunter against Amcache.hve hives and package its output.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the worker config file (TOML).
    ///
    /// Default: `AmcacheWorker.toml` in the current directory, if present.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `AMCACHE_WORKER_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the tool on every hive among the inputs and print the task result.
    Run(RunArgs),
    /// Print the commands that would run, without executing anything.
    DryRun(RunArgs),
    /// Print the task metadata (display name, config fields) as JSON.
    Metadata,
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Input file path; repeat for several files (hive plus LOG1/LOG2).
    #[arg(long = "input", value_name = "PATH")]
    pub inputs: Vec<PathBuf>,

    /// JSON file holding a list of input file objects or paths.
    #[arg(long, value_name = "FILE")]
    pub input_json: Option<PathBuf>,

    /// Encoded result of a previous task; its output files become the inputs.
    #[arg(long, value_name = "B64")]
    pub pipe_result: Option<String>,

    /// Directory that receives the output artifacts.
    #[arg(long, value_name = "DIR")]
    pub output_path: PathBuf,

    #[arg(long, value_name = "ID")]
    pub workflow_id: Option<String>,

    /// Task id for log correlation; generated when omitted.
    #[arg(long, value_name = "ID")]
    pub task_id: Option<String>,

    /// Task config as an inline JSON object.
    #[arg(long, value_name = "JSON", conflicts_with = "task_config_file")]
    pub task_config: Option<String>,

    /// Task config read from a JSON file.
    #[arg(long, value_name = "FILE")]
    pub task_config_file: Option<PathBuf>,

    /// Print the result as plain JSON instead of the encoded form.
    #[arg(long)]
    pub json: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_with_repeated_inputs() {
        let args = CliArgs::try_parse_from([
            "amcache-worker",
            "run",
            "--input",
            "/data/Amcache.hve",
            "--input",
            "/data/Amcache.hve.LOG1",
            "--output-path",
            "/out",
            "--task-config",
            r#"{"find_suspicious": true}"#,
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert!(matches!(args.log_level, Some(LogLevel::Debug)));
        match args.command {
            Command::Run(run) => {
                assert_eq!(run.inputs.len(), 2);
                assert_eq!(run.output_path, PathBuf::from("/out"));
                assert!(run.task_config.is_some());
                assert!(!run.json);
            }
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn inline_and_file_task_config_conflict() {
        let result = CliArgs::try_parse_from([
            "amcache-worker",
            "run",
            "--output-path",
            "/out",
            "--task-config",
            "{}",
            "--task-config-file",
            "cfg.json",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn metadata_needs_no_arguments() {
        let args = CliArgs::try_parse_from(["amcache-worker", "metadata"]).unwrap();
        assert!(matches!(args.command, Command::Metadata));
    }
}
