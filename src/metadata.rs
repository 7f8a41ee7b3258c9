//! Heading metadata extracted with tree-sitter and cached per document.
//!
//! The cache is refreshed eagerly whenever a document's text changes, so lookups never parse.
//! A document whose text failed to parse has no entry, which the panel treats the same as a
//! document without headings.

use crate::error::{Error, Result};
use crate::formats::markdown::MarkdownFormat;
use crate::formats::Format;
use crate::heading::{strip_closing_sequence, HeadingDescriptor};
use crate::host::{DocumentId, MetadataProvider};
use std::collections::HashMap;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Parser, Query, QueryCursor};

/// Runs a format's heading query over document text.
pub struct HeadingExtractor<F: Format> {
    format: F,
    parser: Parser,
    query: Query,
}

impl<F: Format> HeadingExtractor<F> {
    /// Prepares a parser and compiled query for `format`.
    ///
    /// # Errors
    ///
    /// Returns an error if the grammar cannot be loaded or the query does not compile.
    pub fn new(format: F) -> Result<Self> {
        let language = format.language();
        let mut parser = Parser::new();
        parser.set_language(&language)?;
        let query = Query::new(&language, format.heading_query())?;
        Ok(Self {
            format,
            parser,
            query,
        })
    }

    /// Extracts the headings of `text` in document order.
    ///
    /// # Errors
    ///
    /// Returns an error if the parser yields no tree.
    pub fn extract(&mut self, text: &str) -> Result<Vec<HeadingDescriptor>> {
        let tree = self.parser.parse(text, None).ok_or(Error::NoTree)?;
        let source = text.as_bytes();
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&self.query, tree.root_node(), source);

        let mut headings = Vec::new();
        while let Some(query_match) = matches.next() {
            for capture in query_match.captures {
                let node = capture.node;
                let Some(level) = self.format.heading_level(node) else {
                    continue;
                };
                let text = self
                    .format
                    .heading_content(node)
                    .and_then(|content| content.utf8_text(source).ok())
                    .map(heading_text)
                    .unwrap_or_default();
                let start = node.start_position();
                let lines = node
                    .utf8_text(source)
                    .map_or(0, |whole| whole.trim_end().matches('\n').count());
                headings.push(
                    HeadingDescriptor::new(text, level, start.row, start.column)
                        .spanning_to(start.row + lines),
                );
            }
        }

        headings.sort_by_key(|h| (h.start_line, h.start_column));
        headings.dedup();
        Ok(headings)
    }
}

/// Joins a heading's content lines with single spaces.
fn heading_text(content: &str) -> String {
    let joined = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    strip_closing_sequence(&joined).to_string()
}

/// Per-document heading metadata.
pub struct MetadataCache<F: Format = MarkdownFormat> {
    extractor: HeadingExtractor<F>,
    entries: HashMap<DocumentId, Vec<HeadingDescriptor>>,
}

impl MetadataCache<MarkdownFormat> {
    /// Cache for markdown documents.
    ///
    /// # Errors
    ///
    /// Returns an error if the markdown grammar or query cannot be loaded.
    pub fn markdown() -> Result<Self> {
        Self::new(MarkdownFormat)
    }
}

impl<F: Format> MetadataCache<F> {
    /// Empty cache for documents of `format`.
    ///
    /// # Errors
    ///
    /// Returns an error if the grammar or query cannot be loaded.
    pub fn new(format: F) -> Result<Self> {
        Ok(Self {
            extractor: HeadingExtractor::new(format)?,
            entries: HashMap::new(),
        })
    }

    /// Re-extracts the headings of `document` from its current `text`.
    ///
    /// On failure the stale entry is dropped, so the document reads as having no metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the text cannot be parsed.
    pub fn refresh(&mut self, document: &DocumentId, text: &str) -> Result<()> {
        match self.extractor.extract(text) {
            Ok(headings) => {
                self.entries.insert(document.clone(), headings);
                Ok(())
            }
            Err(e) => {
                self.entries.remove(document);
                Err(e)
            }
        }
    }

    /// Forgets `document`.
    pub fn remove(&mut self, document: &DocumentId) {
        self.entries.remove(document);
    }
}

impl<F: Format> MetadataProvider for MetadataCache<F> {
    fn headings(&self, document: &DocumentId) -> Option<&[HeadingDescriptor]> {
        self.entries.get(document).map(Vec::as_slice)
    }
}

#[cfg(test)]
#[path = "tests/metadata.rs"]
mod tests;
