//! Generation pipeline
//!
//! Fetches every extractor's upstream file and runs its shapes, then folds
//! the results into a [`Catalog`] in pipeline order.
//!
//! Fetch and extraction for different files are independent, so they run on
//! the rayon pool. `collect::<Result<Vec<_>>>` keeps the input order and
//! stops on the first error, which makes the merge step order-deterministic
//! regardless of which file finished first.

use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::catalog::{Catalog, MissingShapePolicy};
use crate::error::Result;
use crate::extractors::{ExtractionResult, Extractor, ExtractorManager, SourceLocation};
use crate::source::SourceProvider;

/// A configured run over one upstream revision
#[derive(Debug, Clone)]
pub struct Pipeline {
    pub repository: String,
    pub revision: String,
    pub extractors: Vec<Extractor>,
    pub missing_shapes: MissingShapePolicy,
}

impl Pipeline {
    pub fn new(repository: &str, revision: &str, extractors: Vec<Extractor>) -> Self {
        Self {
            repository: repository.to_string(),
            revision: revision.to_string(),
            extractors,
            missing_shapes: MissingShapePolicy::default(),
        }
    }

    pub fn with_missing_shapes(mut self, policy: MissingShapePolicy) -> Self {
        self.missing_shapes = policy;
        self
    }

    fn location(&self, extractor: &Extractor) -> SourceLocation {
        SourceLocation::new(&self.repository, &self.revision, extractor.path)
    }

    /// Run every extractor and build the catalog. Any fetch, parse or shape
    /// failure aborts the whole run; there is no partial catalog.
    pub fn run(&self, provider: &dyn SourceProvider) -> Result<Catalog> {
        let started = Instant::now();
        let manager = ExtractorManager::new();

        let results: Vec<ExtractionResult> = self
            .extractors
            .par_iter()
            .map(|extractor| {
                let location = self.location(extractor);
                let content = provider.fetch(&location)?;
                debug!("fetched {} ({} bytes)", extractor.path, content.len());
                manager.extract(location, content, extractor)
            })
            .collect::<Result<Vec<_>>>()?;

        let mut catalog = Catalog::new();
        for (extractor, result) in self.extractors.iter().zip(results) {
            catalog.merge(extractor.path, result, self.missing_shapes)?;
        }

        info!(
            "Extracted {} declarations from {} files of {}@{} in {:?}",
            catalog.len(),
            self.extractors.len(),
            self.repository,
            self.revision,
            started.elapsed()
        );
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenError;
    use crate::extractors::{sentry_extractors, RecordValue};
    use crate::source::MemorySource;
    use std::collections::HashMap;

    const CONSTANTS: &str = r#"import logging

LOG_LEVELS = {
    logging.NOTSET: "sample",
    logging.DEBUG: "debug",
    logging.INFO: "info",
    logging.WARNING: "warning",
    logging.ERROR: "error",
    logging.FATAL: "fatal",
}
"#;

    const GROUPTYPE: &str = r#"from enum import IntEnum


class GroupCategory(IntEnum):
    ERROR = 1
    PERFORMANCE = 2
    PROFILE = 3  # deprecated
    CRON = 4
    REPLAY = 5
    FEEDBACK = 6
    UPTIME = 7
"#;

    const EVENT_ATTRIBUTE: &str = r#"ATTR_CHOICES = {
    "message": Columns.MESSAGE,
    "platform": Columns.PLATFORM,
    "environment": Columns.ENVIRONMENT,
}
"#;

    const MATCH: &str = r#"from sentry.utils import metrics


class MatchType:
    CONTAINS = "co"
    ENDS_WITH = "ew"
    EQUAL = "eq"
    GREATER_OR_EQUAL = "gte"


LEVEL_MATCH_CHOICES = {
    MatchType.EQUAL: "equal to",
    MatchType.GREATER_OR_EQUAL: "greater than or equal to",
}
"#;

    const DASHBOARD_WIDGET: &str = r#"class DashboardWidgetDisplayTypes(TypesClass):
    LINE_CHART = 0
    AREA_CHART = 1
    TYPES = [
        (LINE_CHART, "line"),
        (AREA_CHART, "area"),
    ]


class DashboardWidgetTypes(TypesClass):
    DISCOVER = 0
    TYPES = [(DISCOVER, "discover")]
"#;

    const PROJECT: &str = r#"GETTING_STARTED_DOCS_PLATFORMS = [
    "android",
    "python",
    "go",
]
"#;

    fn sentry_tree() -> HashMap<String, String> {
        [
            ("src/sentry/constants.py", CONSTANTS),
            ("src/sentry/issues/grouptype.py", GROUPTYPE),
            ("src/sentry/rules/conditions/event_attribute.py", EVENT_ATTRIBUTE),
            ("src/sentry/rules/match.py", MATCH),
            ("src/sentry/models/dashboard_widget.py", DASHBOARD_WIDGET),
            ("src/sentry/models/project.py", PROJECT),
        ]
        .into_iter()
        .map(|(path, content)| (path.to_string(), content.to_string()))
        .collect()
    }

    fn pipeline() -> Pipeline {
        Pipeline::new("getsentry/sentry", "master", sentry_extractors())
    }

    fn list(values: &[&str]) -> RecordValue {
        RecordValue::List(values.iter().map(|v| v.to_string()).collect())
    }

    #[test]
    fn test_full_sentry_run() {
        let provider = MemorySource {
            files: sentry_tree(),
        };
        let catalog = pipeline().run(&provider).unwrap();

        let names: Vec<_> = catalog.iter().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            vec![
                "LogLevels",
                "LogLevelNameToId",
                "LogLevelIdToName",
                "IssueGroupCategories",
                "IssueGroupCategoryNameToId",
                "IssueGroupCategoryIdToName",
                "EventAttributes",
                "MatchTypes",
                "MatchTypeNameToId",
                "MatchTypeIdToName",
                "LevelMatchTypes",
                "DashboardWidgetDisplayTypes",
                "DashboardWidgetTypes",
                "Platforms",
            ]
        );

        assert_eq!(
            catalog.get("LogLevels").unwrap().value,
            list(&["sample", "debug", "info", "warning", "error", "fatal"])
        );
        assert_eq!(
            catalog.get("IssueGroupCategories").unwrap().value,
            list(&["Error", "Performance", "Profile", "Cron", "Replay", "Feedback", "Uptime"])
        );
        assert_eq!(
            catalog.get("EventAttributes").unwrap().value,
            list(&["message", "platform", "environment"])
        );
        assert_eq!(
            catalog.get("LevelMatchTypes").unwrap().value,
            list(&["EQUAL", "GREATER_OR_EQUAL"])
        );
        assert_eq!(
            catalog.get("DashboardWidgetTypes").unwrap().value,
            list(&["discover"])
        );
        assert_eq!(
            catalog.get("Platforms").unwrap().value,
            list(&["other", "android", "python", "go"])
        );

        let log_levels = catalog.get("LogLevels").unwrap();
        assert_eq!(
            log_levels.provenance.url(),
            "https://github.com/getsentry/sentry/blob/master/src/sentry/constants.py#L3"
        );
        let level_match = catalog.get("LevelMatchTypes").unwrap();
        assert_eq!(level_match.provenance.line, 11);
    }

    #[test]
    fn test_run_is_deterministic() {
        let provider = MemorySource {
            files: sentry_tree(),
        };
        let first = pipeline().run(&provider).unwrap();
        let rendered = crate::render::render_go(&first, "sentrydata").unwrap();
        for _ in 0..5 {
            let catalog = pipeline().run(&provider).unwrap();
            assert_eq!(catalog, first);
            assert_eq!(
                crate::render::render_go(&catalog, "sentrydata").unwrap(),
                rendered
            );
        }
    }

    #[test]
    fn test_fetch_failure_aborts_run() {
        let mut files = sentry_tree();
        files.remove("src/sentry/rules/match.py");
        let provider = MemorySource { files };

        let err = pipeline().run(&provider).unwrap_err();
        match err {
            GenError::Fetch { path, .. } => assert_eq!(path, "src/sentry/rules/match.py"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_shape_failure_aborts_run() {
        let mut files = sentry_tree();
        files.insert(
            "src/sentry/models/project.py".to_string(),
            "GETTING_STARTED_DOCS_PLATFORMS = [\"python\", PLATFORM_GO]\n".to_string(),
        );
        let provider = MemorySource { files };

        let err = pipeline().run(&provider).unwrap_err();
        assert!(matches!(err, GenError::ShapeAssertion { .. }), "{err}");
    }

    #[test]
    fn test_missing_shape_policy_is_applied() {
        let mut files = sentry_tree();
        files.insert(
            "src/sentry/models/project.py".to_string(),
            "PLATFORMS = []\n".to_string(),
        );
        let provider = MemorySource { files };

        let catalog = pipeline().run(&provider).unwrap();
        assert!(catalog.get("Platforms").is_none());

        let err = pipeline()
            .with_missing_shapes(MissingShapePolicy::Error)
            .run(&provider)
            .unwrap_err();
        assert!(matches!(err, GenError::MissingShape { .. }));
    }

    #[test]
    fn test_cross_file_collision_is_fatal() {
        // A class whose name clashes with a fixed declaration name
        let mut files = sentry_tree();
        files.insert(
            "src/sentry/models/dashboard_widget.py".to_string(),
            "class Platforms:\n    A = 0\n    TYPES = [(A, \"a\")]\n".to_string(),
        );
        let provider = MemorySource { files };

        let err = pipeline().run(&provider).unwrap_err();
        assert!(matches!(err, GenError::CatalogCollision { .. }), "{err}");
    }
}
