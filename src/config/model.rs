// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

/// Executable name the worker runs when nothing else is configured.
pub const DEFAULT_TOOL_BINARY: &str = "amcache-evilhunter";

/// Env var that overrides `[tool].binary`.
pub const TOOL_BINARY_ENV_VAR: &str = "AMCACHE_EVILHUNTER_BIN";

/// Worker configuration as read from a TOML file.
///
/// ```toml
/// [tool]
/// binary = "amcache-evilhunter"
///
/// [supervisor]
/// progress_interval = "2s"
/// tail_lines = 80
///
/// [input]
/// suffix = ".hve"
/// ```
///
/// All sections are optional and have reasonable defaults. Use
/// `WorkerConfig::try_from` to get a validated config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub tool: ToolSection,

    #[serde(default)]
    pub supervisor: SupervisorSection,

    #[serde(default)]
    pub input: InputSection,
}

/// `[tool]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolSection {
    /// Executable name (resolved via `PATH`) or path to the tool.
    #[serde(default = "default_binary")]
    pub binary: String,
}

fn default_binary() -> String {
    DEFAULT_TOOL_BINARY.to_string()
}

impl Default for ToolSection {
    fn default() -> Self {
        Self {
            binary: default_binary(),
        }
    }
}

/// `[supervisor]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SupervisorSection {
    /// Heartbeat cadence while the tool runs, e.g. `"2s"` or `"500ms"`.
    #[serde(default = "default_progress_interval")]
    pub progress_interval: String,

    /// How many trailing output lines are kept for failure diagnostics.
    #[serde(default = "default_tail_lines")]
    pub tail_lines: usize,
}

fn default_progress_interval() -> String {
    "2s".to_string()
}

fn default_tail_lines() -> usize {
    80
}

impl Default for SupervisorSection {
    fn default() -> Self {
        Self {
            progress_interval: default_progress_interval(),
            tail_lines: default_tail_lines(),
        }
    }
}

/// `[input]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct InputSection {
    /// Case-insensitive filename suffix of the hive artifact.
    #[serde(default = "default_suffix")]
    pub suffix: String,
}

fn default_suffix() -> String {
    ".hve".to_string()
}

impl Default for InputSection {
    fn default() -> Self {
        Self {
            suffix: default_suffix(),
        }
    }
}

/// Validated worker configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    pub tool_binary: String,
    pub progress_interval: Duration,
    pub tail_lines: usize,
    /// Always lowercase.
    pub hive_suffix: String,
}

impl WorkerConfig {
    /// Override the tool binary, e.g. from `AMCACHE_EVILHUNTER_BIN`.
    /// Blank values are ignored.
    pub fn with_tool_binary_override(mut self, binary: Option<String>) -> Self {
        if let Some(bin) = binary.map(|b| b.trim().to_string()).filter(|b| !b.is_empty()) {
            self.tool_binary = bin;
        }
        self
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            tool_binary: default_binary(),
            progress_interval: Duration::from_secs(2),
            tail_lines: default_tail_lines(),
            hive_suffix: default_suffix(),
        }
    }
}
