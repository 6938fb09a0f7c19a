use serde::Deserialize;
use serde_json::{Map, Value};

/// One language variant of a template, as authored on disk.
///
/// Structural fields are typed; `fields` is the free-form content that is
/// handed to the backend untouched.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub template_id: String,
    pub lang: String,
    pub is_main: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, rename = "sysReptorFields")]
    pub fields: Map<String, Value>,
}
