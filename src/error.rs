//! Error types for the generator
//!
//! Every variant is terminal for a run: nothing is retried and no output is
//! written once one of these has been produced.

use thiserror::Error;

/// Errors that can occur while generating the declarations file
#[derive(Error, Debug)]
pub enum GenError {
    /// Upstream file could not be fetched (network, HTTP status, missing path)
    #[error("failed to fetch {path}: {reason}")]
    Fetch { path: String, reason: String },

    /// Upstream file is not syntactically valid Python
    #[error("failed to parse {path} at {line}:{column}: {reason}")]
    Parse {
        path: String,
        line: usize,
        column: usize,
        reason: String,
    },

    /// A node matched a shape's target but its structure is not the expected literal shape
    #[error("{path}:{line}:{column}: {message} (found `{snippet}`)")]
    ShapeAssertion {
        path: String,
        line: usize,
        column: usize,
        message: String,
        snippet: String,
    },

    /// A shape matched nothing and the missing-shape policy is `error`
    #[error("{path}: no declaration matched {shape}")]
    MissingShape { path: String, shape: String },

    /// Two records were produced under the same declaration name
    #[error("declaration `{name}` produced twice ({first} and {second})")]
    CatalogCollision {
        name: String,
        first: String,
        second: String,
    },

    /// Rendered output failed verification
    #[error("render error: {0}")]
    Render(String),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem error while reading configuration or writing output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for GenError {
    fn from(e: toml::de::Error) -> Self {
        GenError::Config(e.to_string())
    }
}

impl From<serde_json::Error> for GenError {
    fn from(e: serde_json::Error) -> Self {
        GenError::Render(e.to_string())
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, GenError>;
