//! Canonical template identifiers.
//!
//! Snippet authors and scan reports spell the same control identifier in
//! different ways (`MS.AAD.1.1v1`, `ms aad 1 1v1`, ...). Both the template
//! loader and the findings importer derive the lookup key through
//! [`canonical_id`], possibly in different runs, so the mapping must depend
//! on nothing but the input text.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Stable lookup key for a template.
///
/// The value is the hex-encoded SHA-256 of the normalized identifier. A hex
/// digest is a single search token, so it doubles as the marker the backend
/// full-text search is queried with.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalId(String);

impl CanonicalId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lowercase `raw` and collapse every run of non-alphanumeric characters
/// into a single `-`, with no leading or trailing separator.
pub fn normalize_identifier(raw: &str) -> String {
    raw.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Compute the canonical id of an arbitrary identifier string.
pub fn canonical_id(raw: &str) -> CanonicalId {
    let mut hasher = Sha256::new();
    hasher.update(normalize_identifier(raw).as_bytes());
    CanonicalId(hex::encode(hasher.finalize()))
}
