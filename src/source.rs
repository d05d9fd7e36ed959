//! Source providers
//!
//! Return the raw text of an upstream file. Fetching is the only blocking
//! part of a run; providers are shared across the rayon pool, hence
//! `Send + Sync`.

use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::config::GeneratorConfig;
use crate::error::{GenError, Result};
use crate::extractors::SourceLocation;

const RAW_CONTENT_BASE: &str = "https://raw.githubusercontent.com";

pub trait SourceProvider: Send + Sync {
    /// Raw text of the file at `location`
    fn fetch(&self, location: &SourceLocation) -> Result<String>;
}

/// Reads files from GitHub's raw-content host
pub struct GithubSource {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl GithubSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GenError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: RAW_CONTENT_BASE.to_string(),
        })
    }

    /// Client for a configuration, honouring `timeout_secs` and `raw_base_url`
    pub fn from_config(config: &GeneratorConfig) -> Result<Self> {
        let source = Self::new(config.timeout())?;
        Ok(match &config.raw_base_url {
            Some(base_url) => source.with_base_url(base_url.as_str()),
            None => source,
        })
    }

    /// Point at a different raw-content host (mirrors, GitHub Enterprise)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// `{base}/{repository}/{revision}/{path}`; works for branches, tags and commits
    pub fn raw_url(&self, location: &SourceLocation) -> String {
        format!(
            "{}/{}/{}/{}",
            self.base_url, location.repository, location.revision, location.path
        )
    }
}

impl SourceProvider for GithubSource {
    fn fetch(&self, location: &SourceLocation) -> Result<String> {
        let url = self.raw_url(location);
        debug!("GET {}", url);

        let fetch_failure = |reason: String| GenError::Fetch {
            path: location.path.clone(),
            reason,
        };

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| fetch_failure(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(fetch_failure(format!("{url} returned {status}")));
        }
        response.text().map_err(|e| fetch_failure(e.to_string()))
    }
}

/// Reads files from a local clone of the upstream repository
///
/// The clone is assumed to be checked out at the configured revision; the
/// revision is only used in provenance URLs.
pub struct CheckoutSource {
    root: PathBuf,
}

impl CheckoutSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Join a repository-relative path onto the checkout root, refusing to
    /// leave it
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return None;
        }
        Some(self.root.join(relative))
    }
}

impl SourceProvider for CheckoutSource {
    fn fetch(&self, location: &SourceLocation) -> Result<String> {
        let full_path = self.resolve(&location.path).ok_or_else(|| GenError::Fetch {
            path: location.path.clone(),
            reason: "path escapes the checkout root".to_string(),
        })?;
        debug!("reading {}", full_path.display());

        std::fs::read_to_string(&full_path).map_err(|e| GenError::Fetch {
            path: location.path.clone(),
            reason: format!("{}: {e}", full_path.display()),
        })
    }
}

/// In-memory provider for pipeline tests
#[cfg(test)]
pub(crate) struct MemorySource {
    pub files: std::collections::HashMap<String, String>,
}

#[cfg(test)]
impl SourceProvider for MemorySource {
    fn fetch(&self, location: &SourceLocation) -> Result<String> {
        self.files
            .get(&location.path)
            .cloned()
            .ok_or_else(|| GenError::Fetch {
                path: location.path.clone(),
                reason: "404 Not Found".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_raw_url_follows_config() {
        let location = SourceLocation::new("getsentry/sentry", "24.1.0", "src/sentry/constants.py");

        let default = GithubSource::from_config(&GeneratorConfig::default()).unwrap();
        assert_eq!(
            default.raw_url(&location),
            "https://raw.githubusercontent.com/getsentry/sentry/24.1.0/src/sentry/constants.py"
        );

        let config = GeneratorConfig {
            raw_base_url: Some("https://mirror.example/".to_string()),
            ..GeneratorConfig::default()
        };
        let mirrored = GithubSource::from_config(&config).unwrap();
        assert_eq!(
            mirrored.raw_url(&location),
            "https://mirror.example/getsentry/sentry/24.1.0/src/sentry/constants.py"
        );
    }

    #[test]
    fn test_checkout_source_reads_relative_paths() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("src/sentry")).unwrap();
        std::fs::write(dir.path().join("src/sentry/constants.py"), "X = 1\n").unwrap();

        let source = CheckoutSource::new(dir.path());
        let location = SourceLocation::new("getsentry/sentry", "master", "src/sentry/constants.py");
        assert_eq!(source.fetch(&location).unwrap(), "X = 1\n");
    }

    #[test]
    fn test_checkout_source_failures() {
        let dir = TempDir::new().unwrap();
        let source = CheckoutSource::new(dir.path());

        let missing = SourceLocation::new("getsentry/sentry", "master", "src/missing.py");
        assert!(matches!(
            source.fetch(&missing),
            Err(GenError::Fetch { .. })
        ));

        let escaping = SourceLocation::new("getsentry/sentry", "master", "../etc/passwd");
        let err = source.fetch(&escaping).unwrap_err();
        assert!(err.to_string().contains("escapes the checkout root"));
    }
}
