//! Scan report normalization.
//!
//! Turns the raw results document into a [`ScanReport`]. Validation
//! happens entirely here, before any backend call is made.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::{RepctlError, Result};
use crate::report::model::{Group, ProductResults, ScanReport};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const RESULTS_KEY: &str = "Results";
const SOURCE_CONTROL_ID_KEY: &str = "Control ID";
const CONTROL_ID_KEY: &str = "controlId";

/// Read and normalize a report file.
pub fn read_report_file(path: &Path) -> Result<ScanReport> {
    let bytes = fs::read(path).map_err(|e| RepctlError::io(path, e))?;
    let report = normalize_report(&bytes)?;
    debug!(
        path = %path.display(),
        products = report.products.len(),
        controls = report.control_count(),
        "normalized scan report"
    );
    Ok(report)
}

/// Normalize raw report bytes (UTF-8, optionally with a BOM).
pub fn normalize_report(bytes: &[u8]) -> Result<ScanReport> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let root: Value = serde_json::from_slice(bytes)
        .map_err(|e| RepctlError::InvalidReportFormat(format!("not valid JSON: {e}")))?;

    let results = match root {
        Value::Array(_) => {
            return Err(RepctlError::InvalidReportFormat(
                "unexpected top-level type, wrong file? \
                 (perhaps TestResults.json instead of ScubaResults_<id>.json)"
                    .to_string(),
            ));
        }
        Value::Object(mut root) => root
            .remove(RESULTS_KEY)
            .ok_or_else(missing_results)?,
        _ => return Err(missing_results()),
    };

    let Value::Object(results) = results else {
        return Err(RepctlError::InvalidReportFormat(format!(
            "{RESULTS_KEY} must map product names to groups"
        )));
    };

    let mut products = Vec::with_capacity(results.len());
    for (product, mut groups) in results {
        rename_control_ids(&mut groups);
        let groups: Vec<Group> = serde_json::from_value(groups).map_err(|e| {
            RepctlError::InvalidReportFormat(format!("malformed results for {product}: {e}"))
        })?;
        products.push(ProductResults { product, groups });
    }

    Ok(ScanReport { products })
}

fn missing_results() -> RepctlError {
    RepctlError::InvalidReportFormat(format!("missing {RESULTS_KEY} key"))
}

/// Rename `Control ID` to `controlId` on every control object, leaving all
/// other fields untouched.
fn rename_control_ids(groups: &mut Value) {
    let Some(groups) = groups.as_array_mut() else {
        return;
    };
    for group in groups {
        let Some(controls) = group.get_mut("Controls").and_then(Value::as_array_mut) else {
            continue;
        };
        for control in controls.iter_mut().filter_map(Value::as_object_mut) {
            if let Some(id) = control.remove(SOURCE_CONTROL_ID_KEY) {
                control.insert(CONTROL_ID_KEY.to_string(), id);
            }
        }
    }
}
