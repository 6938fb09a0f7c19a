//! Run configuration: credentials and project references.
//!
//! Nothing here reads process state on its own; callers pass the
//! environment lookup in, which keeps resolution testable.

use reqwest::Url;

use crate::error::{RepctlError, Result};

/// Environment variable consulted when no API key flag is given.
pub const API_KEY_ENV: &str = "REPTOR_KEY";

/// Resolve the API key: the explicit value wins, then [`API_KEY_ENV`].
/// Empty values count as absent.
pub fn resolve_api_key(
    explicit: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<String> {
    explicit
        .map(str::to_string)
        .filter(|k| !k.is_empty())
        .or_else(|| env(API_KEY_ENV).filter(|k| !k.is_empty()))
        .ok_or_else(|| {
            RepctlError::Config(format!(
                "no API key provided, pass --api-key or set {API_KEY_ENV}"
            ))
        })
}

/// Parse a backend base URL, normalized to end with `/` so that API paths
/// join below it.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw).map_err(|e| RepctlError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Split a project URL such as
/// `https://reptor.example.com/projects/<id>/reporting/` into the server's
/// base URL and the project id.
pub fn parse_project_url(raw: &str) -> Result<(Url, String)> {
    let invalid = |reason: &str| RepctlError::InvalidProjectUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };

    let url = Url::parse(raw).map_err(|e| invalid(&e.to_string()))?;
    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    let position = segments
        .iter()
        .position(|seg| *seg == "projects")
        .ok_or_else(|| invalid("expected a path containing /projects/<project-id>"))?;
    let project_id = segments
        .get(position + 1)
        .ok_or_else(|| invalid("missing project id after /projects/"))?
        .to_string();

    let prefix: String = segments[..position]
        .iter()
        .map(|seg| format!("{seg}/"))
        .collect();
    let mut base = url.clone();
    base.set_path(&format!("/{prefix}"));
    base.set_query(None);
    base.set_fragment(None);

    Ok((base, project_id))
}
