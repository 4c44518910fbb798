// src/logging.rs

//! Logging setup for `amcache-worker` using `tracing` + `tracing-subscriber`.
//!
//! Filter selection, first match wins:
//! 1. `--log-level` CLI flag, applied to this crate only
//! 2. `AMCACHE_WORKER_LOG`: either a bare level (applied to this crate only)
//!    or a full filter directive such as `amcache_worker=debug,tokio=trace`
//! 3. `info` for this crate
//!
//! Other targets stay at `warn` unless a directive says otherwise. Logs go to
//! STDERR so that stdout carries only the task result.

use anyhow::{Context, Result};
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

pub const LOG_ENV_VAR: &str = "AMCACHE_WORKER_LOG";

const CRATE_TARGET: &str = env!("CARGO_CRATE_NAME");

/// Install the global subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env_value = std::env::var(LOG_ENV_VAR).ok();
    let filter = build_filter(cli_level, env_value.as_deref())?;

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing tracing subscriber: {e}"))?;

    Ok(())
}

fn build_filter(cli_level: Option<LogLevel>, env_value: Option<&str>) -> Result<EnvFilter> {
    if let Some(lvl) = cli_level {
        return Ok(crate_filter(level_from_log_level(lvl)));
    }

    match env_value.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(crate_filter(Level::INFO)),
        Some(value) => match parse_level_str(value) {
            Some(level) => Ok(crate_filter(level)),
            None => EnvFilter::try_new(value)
                .with_context(|| format!("invalid {LOG_ENV_VAR} filter '{value}'")),
        },
    }
}

fn crate_filter(level: Level) -> EnvFilter {
    EnvFilter::new(format!(
        "warn,{CRATE_TARGET}={}",
        level.as_str().to_ascii_lowercase()
    ))
}

fn level_from_log_level(lvl: LogLevel) -> Level {
    match lvl {
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    }
}

fn parse_level_str(s: &str) -> Option<Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}
