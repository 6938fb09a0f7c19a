use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Finding as returned by the backend.
///
/// Only `data` is modified here; the finding itself is owned by the backend
/// and never deleted by this tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub id: String,
    #[serde(rename = "project")]
    pub project_id: String,
    #[serde(default)]
    pub data: Map<String, Value>,
}
