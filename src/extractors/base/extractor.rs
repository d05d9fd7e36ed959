// Parsed upstream module shared by every shape matcher
//
// Holds the fetched text, its tree and its location, and turns nodes into
// text, positions and located errors.

use tree_sitter::{Node, Tree};

use super::types::{Provenance, SourceLocation};
use crate::error::GenError;

/// Longest node text quoted back in a shape assertion
const SNIPPET_LIMIT: usize = 80;

/// A parsed source file
pub struct ModuleSource {
    pub location: SourceLocation,
    pub content: String,
    pub tree: Tree,
}

impl ModuleSource {
    pub fn new(location: SourceLocation, content: String, tree: Tree) -> Self {
        Self {
            location,
            content,
            tree,
        }
    }

    /// Get text from a tree-sitter node
    pub fn get_node_text(&self, node: &Node) -> &str {
        node.utf8_text(self.content.as_bytes()).unwrap_or("")
    }

    /// 1-based line and column of the node start
    pub fn position(&self, node: &Node) -> (usize, usize) {
        let point = node.start_position();
        (point.row + 1, point.column + 1)
    }

    /// Provenance of a record anchored at 1-based `line` of this module
    pub fn provenance(&self, line: usize) -> Provenance {
        Provenance {
            location: self.location.clone(),
            line,
        }
    }

    /// Build the fatal error for a node that violates its shape contract
    pub fn shape_error(&self, node: &Node, message: impl Into<String>) -> GenError {
        let (line, column) = self.position(node);
        let text = self.get_node_text(node);
        let first_line = text.lines().next().unwrap_or("");
        let snippet = if first_line.chars().count() > SNIPPET_LIMIT {
            let cut: String = first_line.chars().take(SNIPPET_LIMIT).collect();
            format!("{cut}…")
        } else if first_line.len() < text.len() {
            format!("{first_line}…")
        } else {
            first_line.to_string()
        };

        GenError::ShapeAssertion {
            path: self.location.path.clone(),
            line,
            column,
            message: message.into(),
            snippet,
        }
    }
}
