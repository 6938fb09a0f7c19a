use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Normalized compliance scan results.
///
/// Products, groups and controls keep the order of the source document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanReport {
    pub products: Vec<ProductResults>,
}

impl ScanReport {
    pub fn control_count(&self) -> usize {
        self.products
            .iter()
            .flat_map(|p| &p.groups)
            .map(|g| g.controls.len())
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductResults {
    pub product: String,
    pub groups: Vec<Group>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(rename = "GroupNumber")]
    pub group_number: String,
    #[serde(rename = "Controls")]
    pub controls: Vec<Control>,
    /// Remaining group fields (`GroupName`, `GroupReferenceURL`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One evaluated control. `controlId` is the normalized name of the
/// source's `Control ID` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Control {
    #[serde(rename = "controlId")]
    pub control_id: String,
    #[serde(rename = "Result")]
    pub result: String,
    #[serde(rename = "Criticality")]
    pub criticality: String,
    #[serde(rename = "Details")]
    pub details: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
