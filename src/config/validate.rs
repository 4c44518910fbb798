// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{RawConfigFile, WorkerConfig};
use crate::errors::{Result, WorkerError};

impl TryFrom<RawConfigFile> for WorkerConfig {
    type Error = WorkerError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let binary = validate_tool(&raw)?;
        let progress_interval = validate_supervisor(&raw)?;
        let hive_suffix = validate_input(&raw)?;

        Ok(WorkerConfig {
            tool_binary: binary,
            progress_interval,
            tail_lines: raw.supervisor.tail_lines,
            hive_suffix,
        })
    }
}

fn validate_tool(cfg: &RawConfigFile) -> Result<String> {
    let binary = cfg.tool.binary.trim();
    if binary.is_empty() {
        return Err(WorkerError::ConfigError(
            "[tool].binary must not be empty".to_string(),
        ));
    }
    Ok(binary.to_string())
}

fn validate_supervisor(cfg: &RawConfigFile) -> Result<Duration> {
    if cfg.supervisor.tail_lines == 0 {
        return Err(WorkerError::ConfigError(
            "[supervisor].tail_lines must be >= 1 (got 0)".to_string(),
        ));
    }

    let interval = parse_duration(&cfg.supervisor.progress_interval).map_err(|e| {
        WorkerError::ConfigError(format!("[supervisor].progress_interval: {e}"))
    })?;
    if interval.is_zero() {
        return Err(WorkerError::ConfigError(
            "[supervisor].progress_interval must be greater than zero".to_string(),
        ));
    }
    Ok(interval)
}

fn validate_input(cfg: &RawConfigFile) -> Result<String> {
    let suffix = cfg.input.suffix.trim().to_lowercase();
    if !suffix.starts_with('.') || suffix.len() < 2 {
        return Err(WorkerError::ConfigError(format!(
            "[input].suffix must look like \".ext\" (got {:?})",
            cfg.input.suffix
        )));
    }
    Ok(suffix)
}

/// Parse a duration like `"2s"`, `"250ms"`, `"1m"` or `"2h"`.
///
/// Values that do not fit a `Duration` in seconds are rejected.
pub fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    let idx = s
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| format!("duration '{s}' is missing a unit (ms, s, m or h)"))?;
    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{num_part}': {e}"))?;

    let secs_per_unit = match unit_part.trim().to_lowercase().as_str() {
        "ms" => return Ok(Duration::from_millis(value)),
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        other => {
            return Err(format!(
                "unsupported duration unit '{other}'; expected ms, s, m, or h"
            ));
        }
    };

    value
        .checked_mul(secs_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("duration '{s}' is too large"))
}
