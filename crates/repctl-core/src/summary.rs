//! Run summaries printed by the CLI.

use serde::Serialize;

/// Result of a template synchronization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    pub created: usize,
    pub updated: usize,
}

/// Result of projecting a scan report onto a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectionSummary {
    pub project_id: String,
    pub language: String,
    /// Heading findings, one per control group.
    pub group_findings: usize,
    /// Findings created and patched from individual controls.
    pub control_findings: usize,
}

pub fn render_sync_text(summary: &SyncSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!("Templates created: {}\n", summary.created));
    out.push_str(&format!("Templates updated: {}\n", summary.updated));
    out
}

pub fn render_projection_text(summary: &ProjectionSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Project {} ({})\n",
        summary.project_id, summary.language
    ));
    out.push_str(&format!("Group findings: {}\n", summary.group_findings));
    out.push_str(&format!("Control findings: {}\n", summary.control_findings));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_sync_counts() {
        let text = render_sync_text(&SyncSummary {
            created: 2,
            updated: 5,
        });
        assert_eq!(text, "Templates created: 2\nTemplates updated: 5\n");
    }

    #[test]
    fn projection_summary_serializes_field_names() {
        let summary = ProjectionSummary {
            project_id: "p1".into(),
            language: "en-US".into(),
            group_findings: 1,
            control_findings: 4,
        };

        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["group_findings"], 1);
        assert_eq!(value["control_findings"], 4);
        assert!(render_projection_text(&summary).contains("Control findings: 4"));
    }
}
