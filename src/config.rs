//! Generator configuration
//!
//! Loaded from an optional TOML file; every key has a default so an absent
//! file is a valid configuration. Command-line flags are layered on top by
//! the binary (see `cli.rs`).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::catalog::MissingShapePolicy;
use crate::error::{GenError, Result};

/// File looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "sentrydata.toml";

static REPOSITORY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]+/[A-Za-z0-9_.-]+$").expect("valid regex"));
static PACKAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z_][a-z0-9_]*$").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Upstream repository, `owner/name`
    pub repository: String,
    /// Branch, tag or commit to read
    pub revision: String,
    /// Destination of the generated file
    pub output: PathBuf,
    /// Go package name of the generated file
    pub package: String,
    /// Run `gofmt -w` on the generated file before it replaces the old one
    pub gofmt: bool,
    pub missing_shapes: MissingShapePolicy,
    /// HTTP timeout per upstream file
    pub timeout_secs: u64,
    /// Read upstream files from a local checkout instead of GitHub
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_dir: Option<PathBuf>,
    /// Raw-content host to fetch from instead of raw.githubusercontent.com
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_base_url: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            repository: "getsentry/sentry".to_string(),
            revision: "master".to_string(),
            output: PathBuf::from("internal/sentrydata/sentrydata.go"),
            package: "sentrydata".to_string(),
            gofmt: true,
            missing_shapes: MissingShapePolicy::Warn,
            timeout_secs: 30,
            source_dir: None,
            raw_base_url: None,
        }
    }
}

impl GeneratorConfig {
    /// Parse and validate a TOML document
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: GeneratorConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path`, or [`DEFAULT_CONFIG_FILE`] when it exists, or defaults.
    /// An explicitly named file that does not exist is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let contents = fs::read_to_string(&path).map_err(|e| {
            GenError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml(&contents).map_err(|e| match e {
            GenError::Config(message) => {
                GenError::Config(format!("{}: {message}", path.display()))
            }
            other => other,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if !REPOSITORY_RE.is_match(&self.repository) {
            return Err(GenError::Config(format!(
                "repository `{}` is not of the form owner/name",
                self.repository
            )));
        }
        if self.revision.trim().is_empty() || self.revision.contains(char::is_whitespace) {
            return Err(GenError::Config(format!(
                "revision `{}` is not a valid branch, tag or commit",
                self.revision
            )));
        }
        if !PACKAGE_RE.is_match(&self.package) {
            return Err(GenError::Config(format!(
                "package `{}` is not a valid Go package name",
                self.package
            )));
        }
        if self.timeout_secs == 0 {
            return Err(GenError::Config("timeout_secs must be positive".to_string()));
        }
        if let Some(base) = &self.raw_base_url {
            if !(base.starts_with("https://") || base.starts_with("http://")) {
                return Err(GenError::Config(format!(
                    "raw_base_url `{base}` must be an http(s) URL"
                )));
            }
        }
        if self.output.as_os_str().is_empty() {
            return Err(GenError::Config("output path is empty".to_string()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
