use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{RepctlError, Result};
use crate::snippets::model::Snippet;

const SNIPPET_EXTENSION: &str = "json";

/// Read and parse a single snippet file.
pub fn read_snippet(path: &Path) -> Result<Snippet> {
    let bytes = fs::read(path).map_err(|e| RepctlError::io(path, e))?;
    serde_json::from_slice(&bytes).map_err(|e| RepctlError::Snippet {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Read snippets from a file or a directory tree.
///
/// A file is read as-is regardless of its extension. Directories are walked
/// recursively and every `*.json` file is read, in path order so that
/// repeated runs see snippets in the same sequence.
pub fn read_snippets(path: &Path) -> Result<Vec<Snippet>> {
    if path.is_file() {
        return Ok(vec![read_snippet(path)?]);
    }

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(path) {
        let entry = entry.map_err(|e| {
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
            RepctlError::io(path, source)
        })?;
        if entry.file_type().is_file()
            && entry.path().extension().and_then(|e| e.to_str()) == Some(SNIPPET_EXTENSION)
        {
            files.push(entry.into_path());
        }
    }
    files.sort();

    debug!(dir = %path.display(), count = files.len(), "found snippet files");
    files.iter().map(|f| read_snippet(f)).collect()
}
