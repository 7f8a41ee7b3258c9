//! Discovery of the documents named on the command line.

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Expands files and directories into the sorted list of matching documents.
///
/// Files named explicitly are kept whatever their extension; directories are walked and
/// filtered by `extensions`.
#[must_use]
pub fn find_documents(paths: Vec<PathBuf>, extensions: &[String]) -> Vec<PathBuf> {
    let mut documents = Vec::new();
    for path in paths {
        if path.is_file() {
            documents.push(path);
            continue;
        }
        for entry in WalkDir::new(&path)
            .follow_links(true)
            .into_iter()
            .filter_map(std::result::Result::ok)
        {
            if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
                documents.push(entry.into_path());
            }
        }
    }
    documents.sort();
    documents.dedup();
    documents
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|wanted| wanted == ext))
}

/// Reads a document's text.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn read_document(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::Document {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[path = "tests/input.rs"]
mod tests;
