use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::util::canonical::CanonicalId;

/// Data field that carries a template's canonical id on the backend.
///
/// The synchronizer searches for this value to find a template it created
/// in an earlier run.
pub const IDENTIFIER_FIELD: &str = "_my_reptor_identifier";

/// Language variant of a template, in the backend's wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub language: String,
    pub is_main: bool,
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl Translation {
    /// Canonical id embedded in `data`, if any.
    pub fn identifier(&self) -> Option<&str> {
        self.data.get(IDENTIFIER_FIELD).and_then(Value::as_str)
    }
}

/// Finding template. `id` and `details` are assigned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    pub translations: Vec<Translation>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl Template {
    /// True if any translation carries exactly `key` as its identifier.
    pub fn is_marked_with(&self, key: &CanonicalId) -> bool {
        self.translations
            .iter()
            .any(|t| t.identifier() == Some(key.as_str()))
    }

    pub fn translation_for(&self, language: &str) -> Option<&Translation> {
        self.translations.iter().find(|t| t.language == language)
    }

    pub fn main_translation(&self) -> Option<&Translation> {
        self.translations.iter().find(|t| t.is_main)
    }
}
