// Base types shared by all shape matchers
//
// - types.rs: record model (SourceLocation, ResultRecord, Declarations, ...)
// - extractor.rs: ModuleSource, the parsed file every matcher reads from
// - tree_methods.rs: tree navigation on ModuleSource

pub mod extractor;
pub mod tree_methods;
pub mod types;

// Re-export key types for external use
pub use extractor::ModuleSource;
pub use types::{
    Declarations, ExtractionResult, OrderedMap, Provenance, RecordValue, ResultRecord,
    SourceLocation,
};
