//! HTTP session against a SysReptor server.

use std::fmt;

use reqwest::Url;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use crate::TOOL_NAME;
use crate::backend::{ReportingBackend, Upserted, exact_match, merge_into_existing};
use crate::error::{RepctlError, Result};
use crate::findings::model::Finding;
use crate::templates::model::Template;
use crate::util::canonical::CanonicalId;

/// Connection settings for [`ReptorSession`].
#[derive(Clone)]
pub struct SessionConfig {
    pub base_url: Url,
    pub api_key: String,
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Paginated list response. Only the first page is read; the search key is
/// unique enough that a second page would never hold the match.
#[derive(Debug, Deserialize)]
struct Page<T> {
    results: Vec<T>,
}

pub struct ReptorSession {
    client: Client,
    config: SessionConfig,
}

impl ReptorSession {
    pub fn new(config: SessionConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(format!("{TOOL_NAME}/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.config
            .base_url
            .join(path)
            .map_err(|e| RepctlError::InvalidUrl {
                url: format!("{}{path}", self.config.base_url),
                reason: e.to_string(),
            })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(&self.config.api_key)
    }

    fn search_templates_request(&self, key: &CanonicalId) -> Result<RequestBuilder> {
        let url = self.url("api/v1/findingtemplates/")?;
        Ok(self.authorized(self.client.get(url).query(&[("search", key.as_str())])))
    }

    fn create_template_request(&self, template: &Template) -> Result<RequestBuilder> {
        let url = self.url("api/v1/findingtemplates/")?;
        Ok(self.authorized(self.client.post(url).json(template)))
    }

    fn update_template_request(&self, key: &CanonicalId, template: &Template) -> Result<RequestBuilder> {
        let id = template
            .id
            .as_deref()
            .ok_or_else(|| RepctlError::MissingTemplateId(key.to_string()))?;
        let url = self.url(&format!("api/v1/findingtemplates/{id}/"))?;
        Ok(self.authorized(self.client.put(url).json(template)))
    }

    fn finding_from_template_request(
        &self,
        project_id: &str,
        template_id: &str,
        language: &str,
    ) -> Result<RequestBuilder> {
        let url = self.url(&format!(
            "api/v1/pentestprojects/{project_id}/findings/fromtemplate/"
        ))?;
        let body = json!({
            "template": template_id,
            "template_language": language,
        });
        Ok(self.authorized(self.client.post(url).json(&body)))
    }

    fn update_finding_request(&self, project_id: &str, finding: &Finding) -> Result<RequestBuilder> {
        let url = self.url(&format!(
            "api/v1/pentestprojects/{project_id}/findings/{}/",
            finding.id
        ))?;
        let body = json!({ "data": finding.data });
        Ok(self.authorized(self.client.patch(url).json(&body)))
    }

    fn search_templates(&self, key: &CanonicalId) -> Result<Vec<Template>> {
        debug!(search = %key, "searching templates");
        let page: Page<Template> = send(self.search_templates_request(key)?)?;
        Ok(page.results)
    }
}

fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
    let response = request.send()?;
    Ok(check_status(response)?.json()?)
}

fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text()?;
    Err(RepctlError::Backend {
        status: status.as_u16(),
        body,
    })
}

impl ReportingBackend for ReptorSession {
    fn search_and_upsert(&mut self, template: &Template, key: &CanonicalId) -> Result<Upserted> {
        match exact_match(self.search_templates(key)?, key) {
            Some(existing) => {
                let merged = merge_into_existing(&existing, template);
                debug!(template = %key, id = ?merged.id, "updating template");
                send(self.update_template_request(key, &merged)?).map(Upserted::Updated)
            }
            None => {
                debug!(template = %key, "creating template");
                send(self.create_template_request(template)?).map(Upserted::Created)
            }
        }
    }

    fn find_template(&mut self, key: &CanonicalId) -> Result<Option<Template>> {
        Ok(exact_match(self.search_templates(key)?, key))
    }

    fn create_finding_from_template(
        &mut self,
        project_id: &str,
        template_id: &str,
        language: &str,
    ) -> Result<Finding> {
        send(self.finding_from_template_request(project_id, template_id, language)?)
    }

    fn update_finding(&mut self, project_id: &str, finding: &Finding) -> Result<Finding> {
        send(self.update_finding_request(project_id, finding)?)
    }
}
