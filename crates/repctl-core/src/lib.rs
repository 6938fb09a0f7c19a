pub mod backend;
pub mod config;
pub mod error;
pub mod findings;
pub mod report;
pub mod snippets;
pub mod summary;
pub mod templates;
pub mod util;

use std::path::Path;

use tracing::info;

use crate::backend::ReportingBackend;
use crate::error::Result;
use crate::findings::project::{ProjectTarget, project_findings};
use crate::summary::{ProjectionSummary, SyncSummary};

pub const TOOL_NAME: &str = "repctl";

/// Load template snippets from a file or directory and synchronize them.
///
/// All snippets are read and validated before the first backend call.
pub fn load_templates<B: ReportingBackend>(input: &Path, backend: &mut B) -> Result<SyncSummary> {
    let snippets = snippets::read::read_snippets(input)?;
    info!(input = %input.display(), snippets = snippets.len(), "loaded snippets");

    let templates = templates::assemble::assemble_templates(snippets)?;
    info!(templates = templates.len(), "assembled templates");

    templates::sync::sync_templates(&templates, backend)
}

/// Import a scan report into a project as findings.
///
/// The report is fully normalized before the first backend call.
pub fn import_report<B: ReportingBackend>(
    report_path: &Path,
    target: &ProjectTarget,
    backend: &mut B,
) -> Result<ProjectionSummary> {
    let report = report::normalize::read_report_file(report_path)?;
    info!(
        project = %target.project_id,
        language = %target.language,
        controls = report.control_count(),
        "importing scan report"
    );
    project_findings(&report, target, backend)
}
