// src/artifacts.rs

//! Output artifacts: allocated before the tool runs, finalized after it
//! succeeded.
//!
//! Files are named `<uuid>.<extension>` inside the output root, so two inputs
//! with the same display name never collide on disk.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::input::InputDescriptor;

/// The three artifacts produced per hive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    JsonResult,
    CsvResult,
    StdoutResult,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 3] = [
        ArtifactKind::JsonResult,
        ArtifactKind::CsvResult,
        ArtifactKind::StdoutResult,
    ];

    pub fn data_type(self) -> &'static str {
        match self {
            ArtifactKind::JsonResult => "openrelik:worker:amcache-evilhunter:json_result",
            ArtifactKind::CsvResult => "openrelik:worker:amcache-evilhunter:csv_result",
            ArtifactKind::StdoutResult => "openrelik:worker:amcache-evilhunter:stdout_result",
        }
    }

    /// Suffix appended to the input's display name.
    pub fn display_suffix(self) -> &'static str {
        match self {
            ArtifactKind::JsonResult => "_RESULT.json",
            ArtifactKind::CsvResult => "_RESULT.csv",
            ArtifactKind::StdoutResult => "_RESULT.txt",
        }
    }
}

/// An output file owned by the worker until it is handed back as a
/// [`OutputDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub uuid: String,
    pub display_name: String,
    pub extension: Option<String>,
    pub data_type: String,
    pub path: PathBuf,
    pub original_path: Option<String>,
    pub source_file_id: Option<String>,
}

impl OutputFile {
    /// Reserve a new output file under `output_root`. Nothing is written to
    /// disk.
    pub fn create(output_root: &Path, display_name: &str, data_type: &str) -> Self {
        let uuid = uuid::Uuid::new_v4().simple().to_string();
        let extension = display_name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty())
            .map(str::to_string);
        let file_name = match &extension {
            Some(ext) => format!("{uuid}.{ext}"),
            None => uuid.clone(),
        };

        Self {
            path: output_root.join(file_name),
            uuid,
            display_name: display_name.to_string(),
            extension,
            data_type: data_type.to_string(),
            original_path: None,
            source_file_id: None,
        }
    }

    pub fn to_descriptor(&self) -> OutputDescriptor {
        OutputDescriptor {
            uuid: self.uuid.clone(),
            display_name: self.display_name.clone(),
            extension: self.extension.clone(),
            data_type: self.data_type.clone(),
            path: self.path.to_string_lossy().into_owned(),
            original_path: self.original_path.clone(),
            source_file_id: self.source_file_id.clone(),
        }
    }
}

/// Plain, serializable form of an output file as reported to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDescriptor {
    pub uuid: String,
    pub display_name: String,
    pub extension: Option<String>,
    pub data_type: String,
    pub path: String,
    pub original_path: Option<String>,
    pub source_file_id: Option<String>,
}

impl From<&OutputDescriptor> for InputDescriptor {
    fn from(d: &OutputDescriptor) -> Self {
        match serde_json::to_value(d) {
            Ok(Value::Object(map)) => InputDescriptor::Mapping(map),
            _ => InputDescriptor::Raw(PathBuf::from(&d.path)),
        }
    }
}

/// The JSON / CSV / transcript triple for one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSet {
    pub json: OutputFile,
    pub csv: OutputFile,
    pub stdout: OutputFile,
}

impl ArtifactSet {
    pub fn get(&self, kind: ArtifactKind) -> &OutputFile {
        match kind {
            ArtifactKind::JsonResult => &self.json,
            ArtifactKind::CsvResult => &self.csv,
            ArtifactKind::StdoutResult => &self.stdout,
        }
    }
}

/// Reserve the three output files for an input, before the tool runs.
pub fn allocate(output_root: &Path, display_name: &str) -> ArtifactSet {
    let make = |kind: ArtifactKind| {
        OutputFile::create(
            output_root,
            &format!("{display_name}{}", kind.display_suffix()),
            kind.data_type(),
        )
    };

    ArtifactSet {
        json: make(ArtifactKind::JsonResult),
        csv: make(ArtifactKind::CsvResult),
        stdout: make(ArtifactKind::StdoutResult),
    }
}

/// Turn a successful run's artifacts into descriptors (json, csv, transcript).
pub fn finalize(set: ArtifactSet) -> Vec<OutputDescriptor> {
    ArtifactKind::ALL
        .iter()
        .map(|kind| set.get(*kind).to_descriptor())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_roots_three_typed_files_under_output() {
        let set = allocate(Path::new("/out"), "Amcache.hve");

        for kind in ArtifactKind::ALL {
            let file = set.get(kind);
            assert_eq!(file.path.parent(), Some(Path::new("/out")));
            assert_eq!(file.data_type, kind.data_type());
        }
        assert_eq!(set.json.display_name, "Amcache.hve_RESULT.json");
        assert_eq!(set.csv.display_name, "Amcache.hve_RESULT.csv");
        assert_eq!(set.stdout.display_name, "Amcache.hve_RESULT.txt");
        assert_eq!(set.json.extension.as_deref(), Some("json"));
        assert!(set.json.path.to_string_lossy().ends_with(".json"));
    }

    #[test]
    fn same_display_name_never_collides() {
        let a = allocate(Path::new("/out"), "Amcache.hve");
        let b = allocate(Path::new("/out"), "Amcache.hve");
        assert_ne!(a.json.path, b.json.path);
        assert_ne!(a.stdout.uuid, b.stdout.uuid);
    }

    #[test]
    fn finalize_keeps_kind_order() {
        let set = allocate(Path::new("/out"), "x.hve");
        let json_path = set.json.path.to_string_lossy().into_owned();

        let descriptors = finalize(set);
        assert_eq!(descriptors.len(), 3);
        assert_eq!(descriptors[0].path, json_path);
        assert_eq!(descriptors[1].data_type, ArtifactKind::CsvResult.data_type());
        assert_eq!(descriptors[2].data_type, ArtifactKind::StdoutResult.data_type());
    }

    #[test]
    fn extensionless_display_name_uses_bare_uuid() {
        let file = OutputFile::create(Path::new("/out"), "transcript", "t");
        assert_eq!(file.extension, None);
        assert_eq!(file.path, Path::new("/out").join(&file.uuid));
    }

    #[test]
    fn descriptor_can_feed_a_later_task() {
        let set = allocate(Path::new("/out"), "Amcache.hve");
        let d = set.json.to_descriptor();
        let input = InputDescriptor::from(&d);
        assert_eq!(input.explicit_display_name(), Some("Amcache.hve_RESULT.json"));
    }
}
