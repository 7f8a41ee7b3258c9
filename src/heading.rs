//! Heading descriptors as supplied by a metadata provider.
//!
//! A table of contents needs nothing more than the flat, ordered list of headings: the level
//! gives the indent and the source position gives the scroll target. No parent/child links are
//! kept, since neither rendering nor navigation needs them.

/// Deepest heading level markdown allows.
pub const MAX_LEVEL: u8 = 6;

#[derive(Clone, Debug, PartialEq, Eq)]
/// One document heading, read-only to the panel core.
pub struct HeadingDescriptor {
    /// Heading text without markup symbols.
    pub text: String,
    /// Heading depth, 1 for `#` through 6 for `######`.
    pub level: u8,
    /// Zero-based line where the heading starts.
    pub start_line: usize,
    /// Zero-based column where the heading starts.
    pub start_column: usize,
    /// Zero-based last line of the heading, its setext underline included.
    pub end_line: usize,
}

impl HeadingDescriptor {
    #[must_use]
    /// Creates a descriptor, clamping the level into `1..=6`.
    pub fn new(text: impl Into<String>, level: u8, start_line: usize, start_column: usize) -> Self {
        Self {
            text: text.into(),
            level: level.clamp(1, MAX_LEVEL),
            start_line,
            start_column,
            end_line: start_line,
        }
    }

    #[must_use]
    /// Extends the heading over the lines up to `end_line`.
    pub fn spanning_to(mut self, end_line: usize) -> Self {
        self.end_line = end_line.max(self.start_line);
        self
    }

    #[must_use]
    /// Whether source `line` belongs to this heading.
    pub fn covers(&self, line: usize) -> bool {
        (self.start_line..=self.end_line).contains(&line)
    }
}

#[must_use]
/// Strips an optional ATX closing sequence (`## Title ##`) from heading text.
pub fn strip_closing_sequence(text: &str) -> &str {
    let trimmed = text.trim_end();
    let without_hashes = trimmed.trim_end_matches('#');
    if without_hashes.len() == trimmed.len() {
        return trimmed;
    }
    if without_hashes.is_empty() || without_hashes.ends_with([' ', '\t']) {
        without_hashes.trim_end()
    } else {
        trimmed
    }
}

#[cfg(test)]
#[path = "tests/heading.rs"]
mod tests;
