// sentrydata-gen - tree-sitter extraction of Sentry constant tables
//
// Reads a fixed set of Python modules from getsentry/sentry, pulls narrowly
// shaped literal declarations out of them, and renders the result as a Go
// package with a provenance URL on every group of declarations.
// Pipeline: source -> parse -> extract -> catalog -> render -> write.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod extractors;
pub mod language;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod source;

pub use catalog::{Catalog, MissingShapePolicy};
pub use cli::Cli;
pub use config::GeneratorConfig;
pub use error::{GenError, Result};
pub use output::{CheckOutcome, OutputWriter};
pub use pipeline::Pipeline;
pub use render::OutputFormat;
pub use source::{CheckoutSource, GithubSource, SourceProvider};

/// Upstream source for a configuration: a local checkout when `source_dir`
/// is set, GitHub otherwise
pub fn source_provider(config: &GeneratorConfig) -> Result<Box<dyn SourceProvider>> {
    match &config.source_dir {
        Some(dir) => Ok(Box::new(CheckoutSource::new(dir))),
        None => Ok(Box::new(GithubSource::from_config(config)?)),
    }
}

/// Run the Sentry pipeline against `provider` and render the catalog
pub fn generate(
    config: &GeneratorConfig,
    provider: &dyn SourceProvider,
    format: OutputFormat,
) -> Result<String> {
    let catalog = Pipeline::new(
        &config.repository,
        &config.revision,
        extractors::sentry_extractors(),
    )
    .with_missing_shapes(config.missing_shapes)
    .run(provider)?;

    render::render(&catalog, format, &config.package)
}
