//! ExtractorManager - parse a fetched module and run an extractor's shapes on it
//!
//! The manager owns the parse step so that a syntactically invalid upstream
//! file surfaces as a located `GenError::Parse` before any shape sees it.

use crate::error::{GenError, Result};
use crate::extractors::base::{ExtractionResult, ModuleSource, SourceLocation};
use crate::extractors::python::PythonExtractor;
use crate::extractors::shape::Shape;
use tree_sitter::Tree;

/// One pipeline step: an upstream file and the shapes expected in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extractor {
    /// Path relative to the repository root
    pub path: &'static str,
    pub shapes: Vec<Shape>,
}

/// Stateless entry point for parsing and extraction
#[derive(Debug, Default, Clone, Copy)]
pub struct ExtractorManager;

impl ExtractorManager {
    pub fn new() -> Self {
        Self
    }

    /// Parse Python source, failing on the first syntax error
    pub fn parse(&self, location: &SourceLocation, content: &str) -> Result<Tree> {
        let parse_failure = |line: usize, column: usize, reason: String| GenError::Parse {
            path: location.path.clone(),
            line,
            column,
            reason,
        };

        let mut parser =
            crate::language::new_parser("python").map_err(|e| parse_failure(0, 0, e.to_string()))?;
        let tree = parser
            .parse(content, None)
            .ok_or_else(|| parse_failure(0, 0, "parser returned no tree".to_string()))?;

        let root = tree.root_node();
        if root.has_error() {
            let (line, column, reason) = match first_syntax_error(root) {
                Some(node) if node.is_missing() => (
                    node.start_position().row + 1,
                    node.start_position().column + 1,
                    format!("missing `{}`", node.kind()),
                ),
                Some(node) => (
                    node.start_position().row + 1,
                    node.start_position().column + 1,
                    "invalid syntax".to_string(),
                ),
                None => (1, 1, "invalid syntax".to_string()),
            };
            return Err(parse_failure(line, column, reason));
        }

        Ok(tree)
    }

    /// Parse `content` and run `extractor`'s shapes over it
    pub fn extract(
        &self,
        location: SourceLocation,
        content: String,
        extractor: &Extractor,
    ) -> Result<ExtractionResult> {
        let tree = self.parse(&location, &content)?;
        let module = ModuleSource::new(location, content, tree);
        let result = PythonExtractor::new(module).extract(&extractor.shapes)?;

        tracing::debug!(
            "Extracted {} declarations from {} ({} shapes unmatched)",
            result.declarations.len(),
            extractor.path,
            result.unmatched.len()
        );
        Ok(result)
    }
}

/// First `ERROR` or `MISSING` node in source order
fn first_syntax_error(node: tree_sitter::Node) -> Option<tree_sitter::Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_syntax_error)
}
