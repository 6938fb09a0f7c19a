//! Reporting backend seam.
//!
//! The import pipeline only talks to the backend through
//! [`ReportingBackend`]. [`reptor::ReptorSession`] speaks HTTP to a live
//! server, [`memory::InMemoryBackend`] keeps everything in process.
//! Every call is blocking and none is retried.

pub mod memory;
pub mod reptor;

use crate::error::Result;
use crate::findings::model::Finding;
use crate::templates::model::Template;
use crate::util::canonical::CanonicalId;

/// Outcome of [`ReportingBackend::search_and_upsert`].
#[derive(Debug, Clone, PartialEq)]
pub enum Upserted {
    Created(Template),
    Updated(Template),
}

impl Upserted {
    pub fn template(&self) -> &Template {
        match self {
            Upserted::Created(t) | Upserted::Updated(t) => t,
        }
    }

    pub fn into_template(self) -> Template {
        match self {
            Upserted::Created(t) | Upserted::Updated(t) => t,
        }
    }
}

pub trait ReportingBackend {
    /// Create `template`, or overwrite the backend template carrying `key`.
    ///
    /// An existing template keeps its `id` and `details`; its translations
    /// and tags are replaced.
    fn search_and_upsert(&mut self, template: &Template, key: &CanonicalId) -> Result<Upserted>;

    /// Template carrying `key`, if the backend has one.
    fn find_template(&mut self, key: &CanonicalId) -> Result<Option<Template>>;

    /// Instantiate a finding in `project_id` from the template's `language` translation.
    fn create_finding_from_template(
        &mut self,
        project_id: &str,
        template_id: &str,
        language: &str,
    ) -> Result<Finding>;

    fn update_finding(&mut self, project_id: &str, finding: &Finding) -> Result<Finding>;
}

/// Pick the search hit actually marked with `key`.
///
/// Backend search matches substrings across all fields, so hits are
/// filtered on the exact identifier.
pub(crate) fn exact_match(candidates: Vec<Template>, key: &CanonicalId) -> Option<Template> {
    candidates.into_iter().find(|t| t.is_marked_with(key))
}

/// Merge `incoming` onto the backend's `existing` template.
pub(crate) fn merge_into_existing(existing: &Template, incoming: &Template) -> Template {
    let translations = incoming
        .translations
        .iter()
        .map(|t| {
            let mut t = t.clone();
            // Reuse the backend's translation id so the language is updated, not re-created.
            t.id = existing.translation_for(&t.language).and_then(|e| e.id.clone());
            t
        })
        .collect();

    Template {
        id: existing.id.clone(),
        details: existing.details.clone(),
        translations,
        tags: incoming.tags.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::model::{IDENTIFIER_FIELD, Translation};
    use crate::util::canonical::canonical_id;
    use serde_json::{Map, json};
    use std::collections::BTreeSet;

    fn translation(id: Option<&str>, language: &str, marker: &str) -> Translation {
        let mut data = Map::new();
        data.insert(IDENTIFIER_FIELD.into(), json!(marker));
        Translation {
            id: id.map(Into::into),
            language: language.into(),
            is_main: language == "en-US",
            data,
        }
    }

    #[test]
    fn exact_match_ignores_unmarked_hits() {
        let key = canonical_id("aad-1");
        let other = Template {
            id: Some("1".into()),
            details: None,
            translations: vec![translation(None, "en-US", "something-else")],
            tags: BTreeSet::new(),
        };
        let hit = Template {
            id: Some("2".into()),
            translations: vec![translation(None, "en-US", key.as_str())],
            ..other.clone()
        };

        let found = exact_match(vec![other, hit], &key).unwrap();
        assert_eq!(found.id.as_deref(), Some("2"));
    }

    #[test]
    fn upserted_exposes_template_for_both_outcomes() {
        let template = Template {
            id: Some("tpl-1".into()),
            details: None,
            translations: vec![],
            tags: BTreeSet::new(),
        };

        let created = Upserted::Created(template.clone());
        let updated = Upserted::Updated(template.clone());

        assert_eq!(created.template(), &template);
        assert_eq!(updated.template().id.as_deref(), Some("tpl-1"));
        assert_eq!(updated.into_template(), template);
    }

    #[test]
    fn merge_preserves_identity_and_translation_ids() {
        let existing = Template {
            id: Some("tpl-1".into()),
            details: Some(json!("/api/v1/findingtemplates/tpl-1/")),
            translations: vec![
                translation(Some("tr-en"), "en-US", "k"),
                translation(Some("tr-fr"), "fr-FR", "k"),
            ],
            tags: BTreeSet::from(["old".to_string()]),
        };
        let incoming = Template {
            id: None,
            details: None,
            translations: vec![
                translation(None, "en-US", "k"),
                translation(None, "de-DE", "k"),
            ],
            tags: BTreeSet::from(["new".to_string()]),
        };

        let merged = merge_into_existing(&existing, &incoming);

        assert_eq!(merged.id.as_deref(), Some("tpl-1"));
        assert_eq!(merged.details, existing.details);
        assert_eq!(merged.translations.len(), 2);
        assert_eq!(merged.translations[0].id.as_deref(), Some("tr-en"));
        assert!(merged.translations[1].id.is_none());
        assert_eq!(merged.tags, incoming.tags);
    }
}
