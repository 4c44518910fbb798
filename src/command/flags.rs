// src/command/flags.rs

//! Task config → tool flags.
//!
//! Config values never cause an error. The degradation policy is:
//!
//! - **boolean options**: JSON `true`, non-zero numbers and the strings
//!   `1`/`true`/`yes`/`on` (case-insensitive) enable the flag. Anything else
//!   (`false`, `null`, other strings, lists, objects, a missing key) leaves it
//!   off.
//! - **environment overrides**: `VT Enable` and `OpenTIP Enable` are also
//!   switched on when `VT_API_KEY` / `OPENTIP_API_KEY` hold one of
//!   `1`/`true`/`yes`/`on`.
//! - **string options**: JSON strings and numbers are stringified and trimmed.
//!   Blank results, booleans, `null`, lists and objects are treated as absent.

use std::collections::HashMap;

use serde_json::{Map, Value};

/// Task configuration as supplied by the pipeline.
pub type TaskConfig = Map<String, Value>;

/// Read access to environment variables.
pub trait EnvSource: Send + Sync {
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Boolean options: (config key, env override, flag).
const TOGGLES: &[(&str, Option<&str>, &str)] = &[
    ("VT Enable", Some("VT_API_KEY"), "--vt"),
    ("OpenTIP Enable", Some("OPENTIP_API_KEY"), "--opentip"),
    ("find_suspicious", None, "--find-suspicious"),
    ("missing_publisher", None, "--missing-publisher"),
    ("exclude_os", None, "--exclude-os"),
    ("only_detections", None, "--only-detections"),
];

/// Valued options: (config key, flag).
const VALUED: &[(&str, &str)] = &[
    ("start", "--start"),
    ("end", "--end"),
    ("search", "--search"),
];

/// Config keys that influence the command line.
pub fn recognized_keys() -> impl Iterator<Item = &'static str> {
    TOGGLES
        .iter()
        .map(|(key, _, _)| *key)
        .chain(VALUED.iter().map(|(key, _)| *key))
}

/// Build the optional flag tokens for the tool.
///
/// The order is fixed: `--vt`, `--opentip`, the four capability toggles, then
/// `--start`, `--end`, `--search` with their values. `cfg = None` behaves like
/// an empty map.
pub fn build_flags(cfg: Option<&TaskConfig>, env: &dyn EnvSource) -> Vec<String> {
    let mut flags = Vec::new();

    for (key, env_var, flag) in TOGGLES {
        if cfg_bool(cfg, key, *env_var, env) {
            flags.push(flag.to_string());
        }
    }

    for (key, flag) in VALUED {
        if let Some(value) = cfg_str(cfg, key) {
            flags.push(flag.to_string());
            flags.push(value);
        }
    }

    flags
}

/// True if `cfg[key]` is truthy or `env_var` holds a truthy word.
pub fn cfg_bool(
    cfg: Option<&TaskConfig>,
    key: &str,
    env_var: Option<&str>,
    env: &dyn EnvSource,
) -> bool {
    let from_cfg = cfg.and_then(|c| c.get(key)).is_some_and(truthy);
    from_cfg
        || env_var
            .and_then(|var| env.var(var))
            .is_some_and(|v| truthy_word(&v))
}

/// Trimmed string value of `cfg[key]`, `None` when absent or blank.
pub fn cfg_str(cfg: Option<&TaskConfig>, key: &str) -> Option<String> {
    let value = match cfg?.get(key)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!value.is_empty()).then_some(value)
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => truthy_word(s),
        _ => false,
    }
}

fn truthy_word(s: &str) -> bool {
    matches!(
        s.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
