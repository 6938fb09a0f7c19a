//! Error taxonomy shared by every stage of the import pipeline.
//!
//! Validation errors (`InvalidReportFormat`, the duplicate-translation
//! variants) are always raised before the backend is touched. Resolution
//! and transport errors abort whatever remains of a run; nothing already
//! written to the backend is rolled back.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepctlError {
    /// Required configuration (currently only the API key) is missing.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid project URL {url}: {reason}")]
    InvalidProjectUrl { url: String, reason: String },

    /// A server or endpoint URL could not be parsed or joined.
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The scan report is not shaped like a results file.
    #[error("invalid report format: {0}")]
    InvalidReportFormat(String),

    #[error("found multiple main translations for template {template_id}")]
    DuplicateMainTranslation { template_id: String },

    #[error("found multiple {lang} translations for template {template_id}")]
    DuplicateLanguageTranslation { template_id: String, lang: String },

    /// No template on the backend carries the given identifier.
    #[error("no template found for identifier {0}; load templates before importing findings")]
    TemplateNotFound(String),

    /// A search hit matched the identifier but the backend sent no id for it.
    #[error("backend template for identifier {0} has no id")]
    MissingTemplateId(String),

    #[error("invalid snippet {path}: {message}")]
    Snippet { path: PathBuf, message: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned {status}: {body}")]
    Backend { status: u16, body: String },
}

pub type Result<T> = std::result::Result<T, RepctlError>;

impl RepctlError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
