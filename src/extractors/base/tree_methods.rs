// Tree navigation methods for ModuleSource
//
// Kept apart from extractor.rs so the matchers only see a small navigation
// vocabulary: pre-order walks, comment-free children, field lookups.

use super::extractor::ModuleSource;
use crate::error::Result;
use tree_sitter::Node;

impl ModuleSource {
    /// Walk tree with a fallible visitor, depth-first pre-order (source order).
    /// The first visitor error stops the walk.
    #[allow(clippy::only_used_in_recursion)] // &self used in recursive calls
    pub fn walk_tree<'t, F>(&self, node: Node<'t>, visitor: &mut F) -> Result<()>
    where
        F: FnMut(Node<'t>) -> Result<()>,
    {
        visitor(node)?;

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.walk_tree(child, visitor)?;
        }
        Ok(())
    }

    /// Named children with comments removed
    pub fn significant_children<'t>(&self, node: &Node<'t>) -> Vec<Node<'t>> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|child| child.kind() != "comment")
            .collect()
    }

    /// Text of a named field, if present
    pub fn get_field_text(&self, node: &Node, field_name: &str) -> Option<&str> {
        node.child_by_field_name(field_name)
            .map(|field_node| self.get_node_text(&field_node))
    }
}
