//! Error type shared by the persistence and parsing layers.
//!
//! Nothing in the panel core surfaces these to the user: the controller logs them and carries on
//! with in-memory state.

use std::path::PathBuf;
use thiserror::Error;

/// Failures raised while loading settings, reading documents or parsing headings.
#[derive(Debug, Error)]
pub enum Error {
    /// Settings file could not be read or written.
    #[error("settings file {path}: {source}")]
    SettingsIo {
        /// Location of the settings file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// Settings could not be encoded or the stored document is not JSON.
    #[error("settings format: {0}")]
    SettingsFormat(#[from] serde_json::Error),
    /// A document could not be read from disk.
    #[error("document {path}: {source}")]
    Document {
        /// Location of the document.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The markdown grammar could not be loaded into the parser.
    #[error("tree-sitter language: {0}")]
    Language(#[from] tree_sitter::LanguageError),
    /// The heading query does not compile against the grammar.
    #[error("tree-sitter query: {0}")]
    Query(#[from] tree_sitter::QueryError),
    /// The parser produced no tree.
    #[error("tree-sitter produced no syntax tree")]
    NoTree,
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
