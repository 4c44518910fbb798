// src/input/resolver.rs

//! Input selection and path normalization.
//!
//! Paths coming from the pipeline may be POSIX or Windows style regardless of
//! the host, so parent/basename splitting treats both `/` and `\` as
//! separators instead of going through `std::path`.

use std::path::PathBuf;

use serde_json::Value;
use tracing::debug;

use crate::errors::{Result, WorkerError};
use crate::input::descriptor::InputDescriptor;

/// A qualifying input with everything the worker needs to process it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInput {
    pub path: PathBuf,
    pub display_name: String,
    /// Directory the tool runs in, so `.LOG1`/`.LOG2` sidecars get replayed.
    pub working_dir: PathBuf,
}

/// Keep only descriptors whose resolved path ends with `suffix`
/// (case-insensitive).
///
/// Fails with `NoQualifyingInput` when nothing matches, and with
/// `UnresolvablePath` as soon as any descriptor has no derivable path.
pub fn select<'a>(inputs: &'a [InputDescriptor], suffix: &str) -> Result<Vec<&'a InputDescriptor>> {
    let suffix = suffix.to_lowercase();
    let mut selected = Vec::new();

    for item in inputs {
        let path = resolve_path(item)?;
        if path.to_string_lossy().to_lowercase().ends_with(&suffix) {
            selected.push(item);
        } else {
            debug!(path = %path.display(), "skipping non-hive input");
        }
    }

    if selected.is_empty() {
        return Err(WorkerError::NoQualifyingInput { suffix });
    }
    Ok(selected)
}

/// Derive the filesystem path of a descriptor.
///
/// Empty strings and non-string mapping values count as missing.
pub fn resolve_path(d: &InputDescriptor) -> Result<PathBuf> {
    let resolved = match d {
        InputDescriptor::Mapping(map) => ["path", "name"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str).filter(|s| !s.is_empty()))
            .map(PathBuf::from),
        InputDescriptor::Handle(handle) => handle
            .path
            .clone()
            .filter(|p| !p.as_os_str().is_empty())
            .or_else(|| {
                handle
                    .name
                    .as_deref()
                    .filter(|n| !n.is_empty())
                    .map(PathBuf::from)
            }),
        InputDescriptor::Raw(path) => Some(path.clone()).filter(|p| !p.as_os_str().is_empty()),
    };

    resolved.ok_or_else(|| WorkerError::UnresolvablePath(format!("{d:?}")))
}

/// Display name for output artifacts: the mapping's `display_name` when
/// present, else the base filename of the path. Never fails.
pub fn display_name(d: &InputDescriptor) -> String {
    if let Some(name) = d.explicit_display_name() {
        return name.to_string();
    }
    resolve_path(d)
        .map(|p| base_name(&p.to_string_lossy()).to_string())
        .unwrap_or_default()
}

/// Resolve everything about a selected descriptor in one go.
pub fn resolve(d: &InputDescriptor) -> Result<ResolvedInput> {
    let path = resolve_path(d)?;
    let working_dir = working_dir(&path.to_string_lossy());
    Ok(ResolvedInput {
        display_name: display_name(d),
        working_dir,
        path,
    })
}

/// Containing directory of `path`, `.` when there is none.
pub fn working_dir(path: &str) -> PathBuf {
    let dir = match path.rfind(['/', '\\']) {
        None => ".",
        Some(0) => &path[..1],
        // Keep the separator of a drive root: `C:\x.hve` -> `C:\`.
        Some(idx) if path[..idx].ends_with(':') => &path[..=idx],
        Some(idx) => &path[..idx],
    };
    PathBuf::from(dir)
}

/// Last path component, or the whole string when it has no separator.
pub fn base_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches(['/', '\\']);
    match trimmed.rfind(['/', '\\']) {
        Some(idx) => &trimmed[idx + 1..],
        None if trimmed.is_empty() => path,
        None => trimmed,
    }
}
