//! Extraction layer
//!
//! Structural pattern matchers that find narrowly-shaped declarations in
//! upstream Python modules and turn them into ordered, typed records.
//!
//! # Architecture
//!
//! - `base` - record model and the parsed-module wrapper
//! - `shape.rs` - the `Shape` variants and their dispatch
//! - `python` - matchers for each shape, literal decoding, symbol tables
//! - `manager.rs` - parse + extract entry point
//! - `factory.rs` - the Sentry extractor table

pub mod base;
pub mod factory;
pub mod manager;
pub mod python;
pub mod shape;

// Re-export the public API
pub use base::{
    Declarations, ExtractionResult, OrderedMap, Provenance, RecordValue, ResultRecord,
    SourceLocation,
};
pub use factory::sentry_extractors;
pub use manager::{Extractor, ExtractorManager};
pub use shape::{MemberNaming, Shape, TableNames};
