// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{RawConfigFile, TOOL_BINARY_ENV_VAR, WorkerConfig};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; use [`load_and_validate`] for
/// semantic checks.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<WorkerConfig> {
    let raw_config = load_from_path(&path)?;
    let config = WorkerConfig::try_from(raw_config)?;
    Ok(config)
}

/// Resolve the effective worker config.
///
/// - An explicitly given path must exist and be valid.
/// - Without one, [`default_config_path`] is used if present, else defaults.
/// - `AMCACHE_EVILHUNTER_BIN` overrides the tool binary in every case.
pub fn resolve_config(explicit: Option<&Path>) -> Result<WorkerConfig> {
    let config = match explicit {
        Some(path) => load_and_validate(path)?,
        None => {
            let default_path = default_config_path();
            if default_path.is_file() {
                load_and_validate(&default_path)?
            } else {
                WorkerConfig::default()
            }
        }
    };

    Ok(config.with_tool_binary_override(std::env::var(TOOL_BINARY_ENV_VAR).ok()))
}

/// Default config location: `AmcacheWorker.toml` in the current directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("AmcacheWorker.toml")
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::Duration;

    use tempfile::NamedTempFile;

    use super::*;
    use crate::errors::WorkerError;

    #[test]
    fn loads_partial_toml_with_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[supervisor]
progress_interval = "500ms"
"#
        )
        .unwrap();

        let cfg = load_and_validate(file.path()).unwrap();
        assert_eq!(cfg.progress_interval, Duration::from_millis(500));
        assert_eq!(cfg.tail_lines, 80);
        assert_eq!(cfg.tool_binary, "amcache-evilhunter");
        assert_eq!(cfg.hive_suffix, ".hve");
    }

    #[test]
    fn malformed_toml_is_a_toml_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[tool\nbinary = ").unwrap();

        assert!(matches!(
            load_and_validate(file.path()),
            Err(WorkerError::TomlError(_))
        ));
    }

    #[test]
    fn missing_explicit_config_is_an_io_error() {
        let result = resolve_config(Some(Path::new("/nonexistent/AmcacheWorker.toml")));
        assert!(matches!(result, Err(WorkerError::IoError(_))));
    }
}
