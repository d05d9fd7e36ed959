//! Catalog rendering
//!
//! - `go.rs` - Go source layout and string quoting
//! - `verify.rs` - parse the rendered Go back and compare with the catalog
//!
//! Go output is always verified before it is handed to the writer.

pub mod go;
pub mod verify;

pub use go::{go_quote, GoRenderer};
pub use verify::{read_back, verify, GoDeclaration, GoFile};

use tracing::debug;

use crate::catalog::Catalog;
use crate::error::Result;

/// Output flavour of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Go source file (the generated artifact)
    #[default]
    Go,
    /// Pretty-printed JSON of the catalog, for inspection
    Json,
}

/// Render and read back Go source for `catalog`
pub fn render_go(catalog: &Catalog, package: &str) -> Result<String> {
    let renderer = GoRenderer::new(package);
    let rendered = renderer.render(catalog);
    verify(&rendered, renderer.package(), catalog)?;
    debug!(
        "rendered {} declarations ({} bytes) and verified read-back",
        catalog.len(),
        rendered.len()
    );
    Ok(rendered)
}

/// JSON dump of the catalog: name → `{value: {kind, values}, provenance}`
pub fn render_json(catalog: &Catalog) -> Result<String> {
    let mut json = serde_json::to_string_pretty(catalog)?;
    json.push('\n');
    Ok(json)
}

pub fn render(catalog: &Catalog, format: OutputFormat, package: &str) -> Result<String> {
    match format {
        OutputFormat::Go => render_go(catalog, package),
        OutputFormat::Json => render_json(catalog),
    }
}
