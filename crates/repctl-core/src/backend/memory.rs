use tracing::debug;

use crate::backend::{ReportingBackend, Upserted, exact_match, merge_into_existing};
use crate::error::{RepctlError, Result};
use crate::findings::model::Finding;
use crate::templates::model::Template;
use crate::util::canonical::CanonicalId;

/// Backend call, as recorded by [`InMemoryBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    SearchAndUpsert { key: CanonicalId },
    FindTemplate { key: CanonicalId },
    CreateFindingFromTemplate { project_id: String, template_id: String, language: String },
    UpdateFinding { project_id: String, finding_id: String },
}

/// Process-local backend with the same upsert and lookup semantics as the
/// HTTP session. Used by `load-templates --dry-run` and by tests.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    templates: Vec<Template>,
    findings: Vec<Finding>,
    calls: Vec<BackendCall>,
    next_id: u64,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    /// Number of recorded calls matching `pred`.
    pub fn count_calls(&self, pred: impl Fn(&BackendCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    fn assign_id(&mut self, kind: &str) -> String {
        self.next_id += 1;
        format!("{kind}-{}", self.next_id)
    }

    fn assign_translation_ids(&mut self, template: &mut Template) {
        for translation in &mut template.translations {
            if translation.id.is_none() {
                self.next_id += 1;
                translation.id = Some(format!("translation-{}", self.next_id));
            }
        }
    }
}

impl ReportingBackend for InMemoryBackend {
    fn search_and_upsert(&mut self, template: &Template, key: &CanonicalId) -> Result<Upserted> {
        self.calls.push(BackendCall::SearchAndUpsert { key: key.clone() });

        match self.templates.iter().position(|t| t.is_marked_with(key)) {
            Some(index) => {
                let mut merged = merge_into_existing(&self.templates[index], template);
                self.assign_translation_ids(&mut merged);
                self.templates[index] = merged.clone();
                debug!(template = %key, "updated in-memory template");
                Ok(Upserted::Updated(merged))
            }
            None => {
                let mut created = template.clone();
                created.id = Some(self.assign_id("template"));
                self.assign_translation_ids(&mut created);
                self.templates.push(created.clone());
                debug!(template = %key, "created in-memory template");
                Ok(Upserted::Created(created))
            }
        }
    }

    fn find_template(&mut self, key: &CanonicalId) -> Result<Option<Template>> {
        self.calls.push(BackendCall::FindTemplate { key: key.clone() });
        Ok(exact_match(self.templates.clone(), key))
    }

    fn create_finding_from_template(
        &mut self,
        project_id: &str,
        template_id: &str,
        language: &str,
    ) -> Result<Finding> {
        self.calls.push(BackendCall::CreateFindingFromTemplate {
            project_id: project_id.to_string(),
            template_id: template_id.to_string(),
            language: language.to_string(),
        });

        let template = self
            .templates
            .iter()
            .find(|t| t.id.as_deref() == Some(template_id))
            .ok_or_else(|| RepctlError::Backend {
                status: 404,
                body: format!("template {template_id} does not exist"),
            })?;

        let data = template
            .translation_for(language)
            .or_else(|| template.main_translation())
            .or_else(|| template.translations.first())
            .map(|t| t.data.clone())
            .unwrap_or_default();

        let finding = Finding {
            id: self.assign_id("finding"),
            project_id: project_id.to_string(),
            data,
        };
        self.findings.push(finding.clone());
        Ok(finding)
    }

    fn update_finding(&mut self, project_id: &str, finding: &Finding) -> Result<Finding> {
        self.calls.push(BackendCall::UpdateFinding {
            project_id: project_id.to_string(),
            finding_id: finding.id.clone(),
        });

        let stored = self
            .findings
            .iter_mut()
            .find(|f| f.id == finding.id && f.project_id == project_id)
            .ok_or_else(|| RepctlError::Backend {
                status: 404,
                body: format!("finding {} does not exist in project {project_id}", finding.id),
            })?;
        stored.data = finding.data.clone();
        Ok(stored.clone())
    }
}
