//! Finding projection.
//!
//! Walks a [`ScanReport`] product by product, group by group, control by
//! control. Every group yields a heading finding from its group template;
//! every control yields a finding from its control template, patched with
//! the scan result. The first failure stops the walk and nothing already
//! written is undone, so running twice creates every finding twice.

use serde_json::Value;
use tracing::{debug, info};

use crate::backend::ReportingBackend;
use crate::error::{RepctlError, Result};
use crate::findings::model::Finding;
use crate::report::model::{Control, ScanReport};
use crate::summary::ProjectionSummary;
use crate::util::canonical::canonical_id;

/// Where projected findings go.
#[derive(Debug, Clone)]
pub struct ProjectTarget {
    pub project_id: String,
    /// Template translation used for new findings, e.g. `en-US`.
    pub language: String,
}

/// Identifier of the template used as heading for a control group.
pub fn group_identifier(product: &str, group_number: &str) -> String {
    format!("{}-{group_number}", product.to_lowercase())
}

pub fn project_findings<B: ReportingBackend>(
    report: &ScanReport,
    target: &ProjectTarget,
    backend: &mut B,
) -> Result<ProjectionSummary> {
    let mut summary = ProjectionSummary {
        project_id: target.project_id.clone(),
        language: target.language.clone(),
        ..Default::default()
    };

    for product in &report.products {
        for group in &product.groups {
            let group_id = group_identifier(&product.product, &group.group_number);
            info!(
                product = %product.product,
                group = %group.group_number,
                controls = group.controls.len(),
                "importing control group"
            );
            let template_id = resolve_template(backend, &group_id)?;
            instantiate(backend, target, &template_id)?;
            summary.group_findings += 1;

            for control in &group.controls {
                let template_id = resolve_template(backend, &control.control_id)?;
                let mut finding = instantiate(backend, target, &template_id)?;
                apply_control(&mut finding, control);
                backend.update_finding(&target.project_id, &finding)?;
                debug!(control = %control.control_id, finding = %finding.id, "imported control");
                summary.control_findings += 1;
            }
        }
    }

    Ok(summary)
}

/// Backend id of the template for `raw_id`.
fn resolve_template<B: ReportingBackend>(backend: &mut B, raw_id: &str) -> Result<String> {
    backend
        .find_template(&canonical_id(raw_id))?
        .and_then(|t| t.id)
        .ok_or_else(|| RepctlError::TemplateNotFound(raw_id.to_string()))
}

fn instantiate<B: ReportingBackend>(
    backend: &mut B,
    target: &ProjectTarget,
    template_id: &str,
) -> Result<Finding> {
    backend.create_finding_from_template(&target.project_id, template_id, &target.language)
}

/// Overwrite the scan-specific fields, keeping everything else the template provided.
fn apply_control(finding: &mut Finding, control: &Control) {
    for (field, value) in [
        ("criticality", &control.criticality),
        ("result", &control.result),
        ("details", &control.details),
    ] {
        finding
            .data
            .insert(field.to_string(), Value::String(value.clone()));
    }
}
