// src/engine/metadata.rs

//! Task registration metadata: how the pipeline UI presents this worker.

use serde::Serialize;

use crate::types::WORKER_DISPLAY_NAME;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskMetadata {
    pub display_name: &'static str,
    pub description: &'static str,
    pub task_config: Vec<ConfigField>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Checkbox,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigField {
    pub name: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub required: bool,
}

const fn field(
    name: &'static str,
    label: &'static str,
    description: &'static str,
    field_type: FieldType,
) -> ConfigField {
    ConfigField {
        name,
        label,
        description,
        field_type,
        required: false,
    }
}

pub fn task_metadata() -> TaskMetadata {
    use FieldType::{Checkbox, Text};

    TaskMetadata {
        display_name: WORKER_DISPLAY_NAME,
        description: "Worker that runs AmCache-EvilHunter to parse Windows Amcache.hve.",
        task_config: vec![
            field("VT Enable", "Enable VT", "Enable VirusTotal lookups (requires VT_API_KEY).", Checkbox),
            field("OpenTIP Enable", "Enable OpenTIP", "Enable Kaspersky OpenTIP (requires OPENTIP_API_KEY).", Checkbox),
            field("start", "Start (YYYY-MM-DD)", "Only records on or after this date.", Text),
            field("end", "End (YYYY-MM-DD)", "Only records on or before this date.", Text),
            field("search", "Search terms", "Comma-separated, case-insensitive.", Text),
            field("find_suspicious", "Find suspicious", "Filter by suspicious name patterns.", Checkbox),
            field("missing_publisher", "Missing publisher", "Only records with missing Publisher.", Checkbox),
            field("exclude_os", "Exclude OS components", "Only non-OS component files.", Checkbox),
            field(
                "only_detections",
                "Only detections (≥1)",
                "Show/save only files with ≥1 detection. (requires VT_API_KEY)",
                Checkbox,
            ),
        ],
    }
}
