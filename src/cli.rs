//! Command-line definition and config layering.

use std::path::PathBuf;

use clap::Parser;

use crate::catalog::MissingShapePolicy;
use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::render::OutputFormat;

/// Generate Go constant tables from Sentry's Python sources.
#[derive(Debug, Parser)]
#[command(name = "sentrydata-gen")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to ./sentrydata.toml when present)
    #[arg(short, long, env = "SENTRYDATA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Upstream repository, owner/name
    #[arg(long, env = "SENTRYDATA_REPOSITORY")]
    pub repository: Option<String>,

    /// Branch, tag or commit to read
    #[arg(long, env = "SENTRYDATA_REVISION")]
    pub revision: Option<String>,

    /// Read upstream files from a local checkout instead of GitHub
    #[arg(long, env = "SENTRYDATA_SOURCE_DIR")]
    pub source_dir: Option<PathBuf>,

    /// Raw-content host to fetch from (mirrors, GitHub Enterprise)
    #[arg(long, env = "SENTRYDATA_RAW_BASE_URL")]
    pub raw_base_url: Option<String>,

    /// Generated file path
    #[arg(short, long, env = "SENTRYDATA_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Go package name of the generated file
    #[arg(long, env = "SENTRYDATA_PACKAGE")]
    pub package: Option<String>,

    /// Skip gofmt on the generated file
    #[arg(long)]
    pub no_gofmt: bool,

    /// What to do when an expected declaration is not found upstream
    #[arg(long, value_enum, env = "SENTRYDATA_MISSING_SHAPES")]
    pub missing_shapes: Option<MissingShapePolicy>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Go)]
    pub format: OutputFormat,

    /// Compare with the existing file instead of writing; exit 1 on drift
    #[arg(long, conflicts_with = "stdout")]
    pub check: bool,

    /// Print the result instead of writing it
    #[arg(long)]
    pub stdout: bool,

    /// More logging (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Load the config file and apply flag and environment overrides on top
    pub fn resolve_config(&self) -> Result<GeneratorConfig> {
        let mut config = GeneratorConfig::load(self.config.as_deref())?;

        if let Some(repository) = &self.repository {
            config.repository = repository.clone();
        }
        if let Some(revision) = &self.revision {
            config.revision = revision.clone();
        }
        if let Some(source_dir) = &self.source_dir {
            config.source_dir = Some(source_dir.clone());
        }
        if let Some(raw_base_url) = &self.raw_base_url {
            config.raw_base_url = Some(raw_base_url.clone());
        }
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(package) = &self.package {
            config.package = package.clone();
        }
        if self.no_gofmt {
            config.gofmt = false;
        }
        if let Some(policy) = self.missing_shapes {
            config.missing_shapes = policy;
        }

        config.validate()?;
        Ok(config)
    }

    /// Default tracing filter for the requested verbosity
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "sentrydata_gen=info",
            1 => "sentrydata_gen=debug",
            _ => "sentrydata_gen=trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenError;
    use clap::CommandFactory;
    use tempfile::TempDir;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sentrydata.toml");
        std::fs::write(&path, "revision = \"24.1.0\"\npackage = \"fromfile\"\n").unwrap();

        let cli = Cli::try_parse_from([
            "sentrydata-gen",
            "--config",
            path.to_str().unwrap(),
            "--package",
            "fromflag",
            "--no-gofmt",
            "--missing-shapes",
            "error",
            "--raw-base-url",
            "https://mirror.example",
        ])
        .unwrap();
        let config = cli.resolve_config().unwrap();

        assert_eq!(config.revision, "24.1.0");
        assert_eq!(config.package, "fromflag");
        assert!(!config.gofmt);
        assert_eq!(config.missing_shapes, MissingShapePolicy::Error);
        assert_eq!(config.raw_base_url.as_deref(), Some("https://mirror.example"));
    }

    #[test]
    fn test_overrides_are_validated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.toml");
        std::fs::write(&path, "").unwrap();

        let cli = Cli::try_parse_from([
            "sentrydata-gen",
            "--config",
            path.to_str().unwrap(),
            "--repository",
            "not-a-repo",
        ])
        .unwrap();
        assert!(matches!(cli.resolve_config(), Err(GenError::Config(_))));
    }

    #[test]
    fn test_format_and_modes() {
        let cli = Cli::try_parse_from(["sentrydata-gen", "--format", "json", "--stdout", "-vv"])
            .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.stdout);
        assert_eq!(cli.log_filter(), "sentrydata_gen=trace");

        assert!(Cli::try_parse_from(["sentrydata-gen", "--check", "--stdout"]).is_err());
    }
}
