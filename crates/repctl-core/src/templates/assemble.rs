//! Template assembly.
//!
//! Snippets are merged into templates in two phases:
//!
//! 1. group every snippet under the canonical id of its `templateId`
//! 2. validate each group, then build the templates
//!
//! A validation failure therefore never leaves a partially assembled map
//! behind, and nothing is sent to the backend until every group is valid.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;
use tracing::warn;

use crate::error::{RepctlError, Result};
use crate::snippets::model::Snippet;
use crate::templates::model::{IDENTIFIER_FIELD, Template, Translation};
use crate::util::canonical::{CanonicalId, canonical_id};

/// Templates keyed by canonical id, in key order.
pub type AssembledTemplates = BTreeMap<CanonicalId, Template>;

/// Assemble templates from snippets.
///
/// Within a template, translations keep the order in which their snippets
/// were supplied.
pub fn assemble_templates(snippets: impl IntoIterator<Item = Snippet>) -> Result<AssembledTemplates> {
    let groups = group_by_canonical_id(snippets);

    for group in groups.values() {
        validate_group(group)?;
    }

    Ok(groups
        .into_iter()
        .map(|(id, group)| {
            let template = build_template(&id, group);
            (id, template)
        })
        .collect())
}

fn group_by_canonical_id(
    snippets: impl IntoIterator<Item = Snippet>,
) -> BTreeMap<CanonicalId, Vec<Snippet>> {
    let mut groups: BTreeMap<CanonicalId, Vec<Snippet>> = BTreeMap::new();
    for snippet in snippets {
        groups
            .entry(canonical_id(&snippet.template_id))
            .or_default()
            .push(snippet);
    }
    groups
}

fn validate_group(group: &[Snippet]) -> Result<()> {
    let mut main_seen = false;
    let mut langs_seen: BTreeSet<&str> = BTreeSet::new();

    for snippet in group {
        if snippet.is_main {
            if main_seen {
                return Err(RepctlError::DuplicateMainTranslation {
                    template_id: snippet.template_id.clone(),
                });
            }
            main_seen = true;
        }

        if !langs_seen.insert(snippet.lang.as_str()) {
            return Err(RepctlError::DuplicateLanguageTranslation {
                template_id: snippet.template_id.clone(),
                lang: snippet.lang.clone(),
            });
        }
    }
    Ok(())
}

fn build_template(id: &CanonicalId, group: Vec<Snippet>) -> Template {
    let mut tags = BTreeSet::new();
    let mut translations = Vec::with_capacity(group.len());

    for snippet in group {
        tags.extend(snippet.tags);

        let mut data = snippet.fields;
        data.insert(IDENTIFIER_FIELD.to_string(), Value::String(id.to_string()));

        translations.push(Translation {
            id: None,
            language: snippet.lang,
            is_main: snippet.is_main,
            data,
        });
    }

    let template = Template {
        id: None,
        details: None,
        translations,
        tags,
    };

    // Translation-only templates are accepted; the backend decides what to do with them.
    if template.main_translation().is_none() {
        warn!(template = %id, "template has no main translation");
    }

    template
}
