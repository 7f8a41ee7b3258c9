//! Markdown format implementation using tree-sitter-md.
//!
//! Both ATX (`## Title`) and setext (`Title` over `---`) headings are captured. ATX levels come
//! from the marker node, setext levels from the underline.

use crate::formats::Format;

/// Tree-sitter queries for markdown headings.
pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn language(&self) -> tree_sitter::Language {
        tree_sitter_md::LANGUAGE.into()
    }

    fn heading_query(&self) -> &'static str {
        "[(atx_heading) (setext_heading)] @heading"
    }

    fn heading_level(&self, node: tree_sitter::Node<'_>) -> Option<u8> {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "atx_h1_marker" | "setext_h1_underline" => return Some(1),
                "atx_h2_marker" | "setext_h2_underline" => return Some(2),
                "atx_h3_marker" => return Some(3),
                "atx_h4_marker" => return Some(4),
                "atx_h5_marker" => return Some(5),
                "atx_h6_marker" => return Some(6),
                _ => {}
            }
        }
        None
    }

    fn heading_content<'tree>(
        &self,
        node: tree_sitter::Node<'tree>,
    ) -> Option<tree_sitter::Node<'tree>> {
        node.child_by_field_name("heading_content")
    }
}
