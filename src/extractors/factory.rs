//! Sentry extractor table - single source of truth for what gets generated
//!
//! The order of this list is the order of declarations in the generated
//! file. Adding a table means adding a shape here; nothing else enumerates
//! upstream files.

use crate::extractors::manager::Extractor;
use crate::extractors::python::symbols::LOGGING_LEVELS;
use crate::extractors::shape::{MemberNaming, Shape, TableNames};

/// Extractors for `getsentry/sentry`, in output order
pub fn sentry_extractors() -> Vec<Extractor> {
    vec![
        Extractor {
            path: "src/sentry/constants.py",
            shapes: vec![Shape::SymbolKeyedDict {
                target: "LOG_LEVELS",
                symbols: LOGGING_LEVELS,
                names: TableNames {
                    list: "LogLevels",
                    name_to_id: "LogLevelNameToId",
                    id_to_name: "LogLevelIdToName",
                },
            }],
        },
        Extractor {
            path: "src/sentry/issues/grouptype.py",
            shapes: vec![Shape::EnumClass {
                class: "GroupCategory",
                naming: MemberNaming::TitleCase,
                names: TableNames {
                    list: "IssueGroupCategories",
                    name_to_id: "IssueGroupCategoryNameToId",
                    id_to_name: "IssueGroupCategoryIdToName",
                },
            }],
        },
        Extractor {
            path: "src/sentry/rules/conditions/event_attribute.py",
            shapes: vec![Shape::StringKeyedDict {
                target: "ATTR_CHOICES",
                name: "EventAttributes",
            }],
        },
        Extractor {
            path: "src/sentry/rules/match.py",
            shapes: vec![
                Shape::EnumClass {
                    class: "MatchType",
                    naming: MemberNaming::Verbatim,
                    names: TableNames {
                        list: "MatchTypes",
                        name_to_id: "MatchTypeNameToId",
                        id_to_name: "MatchTypeIdToName",
                    },
                },
                Shape::AttributeKeyedDict {
                    target: "LEVEL_MATCH_CHOICES",
                    name: "LevelMatchTypes",
                },
            ],
        },
        Extractor {
            path: "src/sentry/models/dashboard_widget.py",
            shapes: vec![Shape::ChoicesPerClass { attribute: "TYPES" }],
        },
        Extractor {
            path: "src/sentry/models/project.py",
            shapes: vec![Shape::StringList {
                target: "GETTING_STARTED_DOCS_PLATFORMS",
                name: "Platforms",
                sentinel: Some("other"),
            }],
        },
    ]
}
