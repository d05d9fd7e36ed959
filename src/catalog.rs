//! Catalog aggregation
//!
//! Folds extraction results into the final ordered declaration list. Results
//! are merged strictly in pipeline order, whatever order they finished in.

use serde::Serialize;
use tracing::warn;

use crate::error::{GenError, Result};
use crate::extractors::{Declarations, ExtractionResult, ResultRecord};

/// What to do when one of an extractor's shapes matched nothing
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, Serialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum MissingShapePolicy {
    /// Log a warning and continue with no records for that shape
    #[default]
    Warn,
    /// Fail the run
    Error,
}

/// Final ordered mapping from declaration name to record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    declarations: Declarations,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one extractor's output. A name already in the catalog is a
    /// `CatalogCollision`; unmatched shapes are handled per `policy`.
    pub fn merge(
        &mut self,
        path: &str,
        result: ExtractionResult,
        policy: MissingShapePolicy,
    ) -> Result<()> {
        for shape in result.unmatched {
            match policy {
                MissingShapePolicy::Warn => {
                    warn!("{}: no declaration matched {}; skipping", path, shape)
                }
                MissingShapePolicy::Error => {
                    return Err(GenError::MissingShape {
                        path: path.to_string(),
                        shape,
                    })
                }
            }
        }

        for (name, record) in result.declarations {
            self.declarations.insert(name, record)?;
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ResultRecord> {
        self.declarations.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResultRecord)> {
        self.declarations.iter()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}
