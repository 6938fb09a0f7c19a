use tracing::{debug, info};

use crate::backend::{ReportingBackend, Upserted};
use crate::error::Result;
use crate::summary::SyncSummary;
use crate::templates::assemble::AssembledTemplates;

/// Persist assembled templates, creating or updating each by canonical id.
///
/// Re-running with the same input leaves the backend unchanged: a template
/// already carrying the id is updated in place instead of duplicated.
/// Templates are independent of each other; they are sent in key order.
pub fn sync_templates<B: ReportingBackend>(
    templates: &AssembledTemplates,
    backend: &mut B,
) -> Result<SyncSummary> {
    let mut summary = SyncSummary::default();

    for (id, template) in templates {
        let upserted = backend.search_and_upsert(template, id)?;
        let action = match upserted {
            Upserted::Created(_) => {
                summary.created += 1;
                "created"
            }
            Upserted::Updated(_) => {
                summary.updated += 1;
                "updated"
            }
        };
        debug!(template = %id, backend_id = ?upserted.template().id, action, "synchronized template");
    }

    info!(
        created = summary.created,
        updated = summary.updated,
        "template synchronization finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::{BackendCall, InMemoryBackend};
    use crate::snippets::model::Snippet;
    use crate::templates::assemble::assemble_templates;
    use crate::util::canonical::canonical_id;
    use serde_json::{Map, json};

    fn snippets(title_suffix: &str) -> Vec<Snippet> {
        ["aad-1", "aad-2", "defender-1"]
            .iter()
            .flat_map(|id| {
                ["en-US", "de-DE"].into_iter().map(move |lang| {
                    let mut fields = Map::new();
                    fields.insert("title".into(), json!(format!("{id} {title_suffix}")));
                    Snippet {
                        template_id: id.to_string(),
                        lang: lang.to_string(),
                        is_main: lang == "en-US",
                        tags: vec!["scuba".into()],
                        fields,
                    }
                })
            })
            .collect()
    }

    #[test]
    fn first_sync_creates_every_template() {
        let templates = assemble_templates(snippets("v1")).unwrap();
        let mut backend = InMemoryBackend::new();

        let summary = sync_templates(&templates, &mut backend).unwrap();

        assert_eq!(summary.created, 3);
        assert_eq!(summary.updated, 0);
        assert_eq!(backend.templates().len(), 3);
        assert_eq!(
            backend.count_calls(|c| matches!(c, BackendCall::SearchAndUpsert { .. })),
            3
        );
    }

    #[test]
    fn repeated_sync_is_idempotent() {
        let templates = assemble_templates(snippets("v1")).unwrap();
        let mut backend = InMemoryBackend::new();

        sync_templates(&templates, &mut backend).unwrap();
        let after_first = backend.templates().to_vec();
        let summary = sync_templates(&templates, &mut backend).unwrap();

        assert_eq!(summary.created, 0);
        assert_eq!(summary.updated, 3);
        assert_eq!(backend.templates(), after_first.as_slice());
    }

    #[test]
    fn resync_overwrites_content_but_keeps_identity() {
        let mut backend = InMemoryBackend::new();
        sync_templates(&assemble_templates(snippets("v1")).unwrap(), &mut backend).unwrap();
        let key = canonical_id("aad-1");
        let before = backend.find_template(&key).unwrap().unwrap();

        sync_templates(&assemble_templates(snippets("v2")).unwrap(), &mut backend).unwrap();
        let after = backend.find_template(&key).unwrap().unwrap();

        assert_eq!(backend.templates().len(), 3);
        assert_eq!(before.id, after.id);
        assert_eq!(after.translation_for("en-US").unwrap().data["title"], "aad-1 v2");
    }
}
