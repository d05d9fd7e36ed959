/// Python extractor: runs a set of shapes over one parsed upstream module
///
/// This module is organized into focused sub-modules:
/// - literals: str / int / keyword constant decoding
/// - symbols: static tables for `module.NAME` references
/// - assignments: dict and list literals bound to a known name
/// - classes: enum member tables and per-class choice lists
pub(crate) mod assignments;
pub(crate) mod classes;
pub(crate) mod literals;
pub mod symbols;

use crate::error::Result;
use crate::extractors::base::{ExtractionResult, ModuleSource, ResultRecord};
use crate::extractors::shape::Shape;
use tracing::debug;

/// Python extractor for pulling constant tables out of one module
pub struct PythonExtractor {
    module: ModuleSource,
}

impl PythonExtractor {
    pub fn new(module: ModuleSource) -> Self {
        Self { module }
    }

    /// Visit every node in source order and offer it to each shape.
    ///
    /// Records land in the order their declarations appear in the file.
    /// Shapes that never match are listed in `unmatched`.
    pub fn extract(&self, shapes: &[Shape]) -> Result<ExtractionResult> {
        let mut result = ExtractionResult::default();
        let mut matched = vec![false; shapes.len()];

        let root = self.module.tree.root_node();
        self.module.walk_tree(root, &mut |node| {
            for (index, shape) in shapes.iter().enumerate() {
                let Some(found) = shape.match_node(&self.module, node)? else {
                    continue;
                };
                matched[index] = true;
                debug!(
                    "{} matched {} at line {} ({} records)",
                    self.module.location.path,
                    shape.describe(),
                    self.module.position(&node).0,
                    found.records.len()
                );

                for record in found.records {
                    result.declarations.insert(
                        record.name,
                        ResultRecord {
                            value: record.value,
                            provenance: self.module.provenance(record.line),
                        },
                    )?;
                }
            }
            Ok(())
        })?;

        result.unmatched = shapes
            .iter()
            .zip(matched)
            .filter(|(_, matched)| !matched)
            .map(|(shape, _)| shape.describe())
            .collect();

        Ok(result)
    }
}
