//! Format trait and implementations for document types with headings.
//!
//! A format supplies the tree-sitter grammar and a query capturing heading nodes. The metadata
//! cache runs the query and turns each capture into a heading descriptor.

pub mod markdown;

/// Grammar and heading query of one document format.
pub trait Format {
    /// Grammar used to parse documents.
    fn language(&self) -> tree_sitter::Language;
    /// Query whose `@heading` captures are heading nodes.
    fn heading_query(&self) -> &str;
    /// Heading level of a captured node, if it is a heading.
    fn heading_level(&self, node: tree_sitter::Node<'_>) -> Option<u8>;
    /// Node holding the heading text of a captured node.
    fn heading_content<'tree>(
        &self,
        node: tree_sitter::Node<'tree>,
    ) -> Option<tree_sitter::Node<'tree>>;
}
