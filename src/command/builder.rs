// src/command/builder.rs

use std::fmt;
use std::path::{Path, PathBuf};

/// Full argument vector for one tool invocation:
/// `[tool, --json, <json>, --csv, <csv>, -i, <hive>, ...flags]`.
pub fn build_command(
    tool: &str,
    json_out: &Path,
    csv_out: &Path,
    hive_path: &Path,
    flags: &[String],
) -> Vec<String> {
    let mut argv = vec![
        tool.to_string(),
        "--json".to_string(),
        json_out.to_string_lossy().into_owned(),
        "--csv".to_string(),
        csv_out.to_string_lossy().into_owned(),
        "-i".to_string(),
        hive_path.to_string_lossy().into_owned(),
    ];
    argv.extend(flags.iter().cloned());
    argv
}

/// What was executed for one input: argv plus working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRecord {
    pub argv: Vec<String>,
    pub working_dir: PathBuf,
}

impl ExecutionRecord {
    pub fn new(argv: Vec<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            argv,
            working_dir: working_dir.into(),
        }
    }

    pub fn program(&self) -> &str {
        self.argv.first().map(String::as_str).unwrap_or_default()
    }

    pub fn args(&self) -> &[String] {
        self.argv.get(1..).unwrap_or_default()
    }

    /// argv joined by single spaces, as reported in the task result.
    pub fn command_line(&self) -> String {
        self.argv.join(" ")
    }
}

impl fmt::Display for ExecutionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}; cwd={}", self.command_line(), self.working_dir.display())
    }
}
