/// Class-body shapes
/// Enum-style member tables and per-class `(NAME, "label")` choice lists
use super::assignments::{assigned_value, list_elements};
use super::literals::{constant_text, string_value};
use crate::error::Result;
use crate::extractors::base::{ModuleSource, OrderedMap, RecordValue};
use crate::extractors::shape::{MatchedRecord, MemberNaming, ShapeMatch, TableNames};
use tree_sitter::Node;

/// Python's `name.upper() == name`: no lower-case letters
pub fn is_upper_case(identifier: &str) -> bool {
    !identifier.chars().any(char::is_lowercase)
}

/// `PERFORMANCE_N_PLUS_ONE_DB_QUERIES` → `Performance_N_Plus_One_Db_Queries`
///
/// Same result as lower-casing, swapping `_` for spaces, `str.title()` and
/// swapping back: a letter is upper-cased when it follows a non-letter.
pub fn normalize_member_name(identifier: &str) -> String {
    let mut out = String::with_capacity(identifier.len());
    let mut previous_is_letter = false;
    for c in identifier.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(c);
            previous_is_letter = false;
        }
    }
    out
}

/// Assignment statements directly in a class body, in order
fn body_assignments<'t>(module: &ModuleSource, class: &Node<'t>) -> Vec<Node<'t>> {
    let Some(body) = class.child_by_field_name("body") else {
        return Vec::new();
    };
    module
        .significant_children(&body)
        .into_iter()
        .filter(|statement| statement.kind() == "expression_statement")
        .flat_map(|statement| module.significant_children(&statement))
        .filter(|expression| expression.kind() == "assignment")
        .collect()
}

fn class_name<'a>(module: &'a ModuleSource, node: &Node) -> Option<&'a str> {
    if node.kind() != "class_definition" {
        return None;
    }
    module.get_field_text(node, "name")
}

pub(crate) fn match_enum_class(
    module: &ModuleSource,
    node: Node,
    class: &str,
    naming: MemberNaming,
    names: &TableNames,
) -> Result<Option<ShapeMatch>> {
    if class_name(module, &node) != Some(class) {
        return Ok(None);
    }

    let mut list = Vec::new();
    let mut name_to_id = OrderedMap::new();
    let mut id_to_name = OrderedMap::new();
    for assignment in body_assignments(module, &node) {
        let Some(left) = assignment.child_by_field_name("left") else {
            continue;
        };
        let identifier = module.get_node_text(&left);
        if left.kind() != "identifier" || !is_upper_case(identifier) {
            continue;
        }

        let Some(value) = assigned_value(module, assignment, identifier)? else {
            continue;
        };
        let id = constant_text(module, value).ok_or_else(|| {
            module.shape_error(
                &value,
                format!("member `{class}.{identifier}` must be a literal"),
            )
        })?;
        let name = naming.apply(identifier);

        name_to_id
            .insert(name.as_str(), id.as_str())
            .map_err(|_| module.shape_error(&left, format!("duplicate member `{name}`")))?;
        id_to_name.insert(id.as_str(), name.as_str()).map_err(|_| {
            module.shape_error(&value, format!("duplicate value `{id}` in `{class}`"))
        })?;
        list.push(name);
    }

    let line = module.position(&node).0;
    Ok(Some(ShapeMatch {
        records: vec![
            MatchedRecord {
                name: names.list.to_string(),
                line,
                value: RecordValue::List(list),
            },
            MatchedRecord {
                name: names.name_to_id.to_string(),
                line,
                value: RecordValue::Map(name_to_id),
            },
            MatchedRecord {
                name: names.id_to_name.to_string(),
                line,
                value: RecordValue::Map(id_to_name),
            },
        ],
    }))
}

pub(crate) fn match_choices_per_class(
    module: &ModuleSource,
    node: Node,
    attribute: &str,
) -> Result<Option<ShapeMatch>> {
    let Some(class) = class_name(module, &node) else {
        return Ok(None);
    };

    let mut matched = None;
    for assignment in body_assignments(module, &node) {
        let Some(value) = assigned_value(module, assignment, attribute)? else {
            continue;
        };
        let target = format!("{class}.{attribute}");

        let mut labels = Vec::new();
        for element in list_elements(module, value, &target)? {
            labels.push(choice_label(module, element, &target)?);
        }

        let found = matched.get_or_insert_with(ShapeMatch::default);
        if !labels.is_empty() {
            found.records.push(MatchedRecord {
                name: class.to_string(),
                line: module.position(&assignment).0,
                value: RecordValue::List(labels),
            });
        }
    }

    Ok(matched)
}

/// Label of one `(UPPER_NAME, "label")` choice
fn choice_label(module: &ModuleSource, element: Node, target: &str) -> Result<String> {
    let malformed = || {
        module.shape_error(
            &element,
            format!("`{target}` entries must be `(UPPER_NAME, \"label\")` tuples"),
        )
    };

    if element.kind() != "tuple" {
        return Err(malformed());
    }
    match module.significant_children(&element).as_slice() {
        [name, label]
            if name.kind() == "identifier" && is_upper_case(module.get_node_text(name)) =>
        {
            string_value(module, *label).ok_or_else(malformed)
        }
        _ => Err(malformed()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenError;
    use crate::extractors::python::test_support::{find_all, parse_module};

    const CATEGORY_NAMES: TableNames = TableNames {
        list: "IssueGroupCategories",
        name_to_id: "IssueGroupCategoryNameToId",
        id_to_name: "IssueGroupCategoryIdToName",
    };

    fn enum_match(code: &str, class: &str, naming: MemberNaming) -> Result<Option<ShapeMatch>> {
        let module = parse_module(code);
        let mut result = Ok(None);
        for node in find_all(&module, "class_definition") {
            if let Some(found) = match_enum_class(&module, node, class, naming, &CATEGORY_NAMES)? {
                result = Ok(Some(found));
            }
        }
        result
    }

    fn values(record: &MatchedRecord) -> Vec<String> {
        match &record.value {
            RecordValue::List(values) => values.clone(),
            RecordValue::Map(map) => map.iter().map(|(k, v)| format!("{k}={v}")).collect(),
        }
    }

    #[test]
    fn test_normalize_member_name() {
        assert_eq!(
            normalize_member_name("PERFORMANCE_N_PLUS_ONE_DB_QUERIES"),
            "Performance_N_Plus_One_Db_Queries"
        );
        assert_eq!(normalize_member_name("METRIC_ALERT"), "Metric_Alert");
        assert_eq!(normalize_member_name("ERROR"), "Error");
        assert_eq!(normalize_member_name("HTTP2_CLIENT"), "Http2_Client");
        assert_eq!(normalize_member_name("V2X"), "V2X");
    }

    #[test]
    fn test_upper_case_check() {
        assert!(is_upper_case("METRIC_ALERT"));
        assert!(is_upper_case("V2"));
        assert!(!is_upper_case("choices"));
        assert!(!is_upper_case("Error"));
    }

    #[test]
    fn test_enum_class_members_in_order() {
        let code = r#"
@unique
class GroupCategory(IntEnum):
    """Categories of issues."""

    ERROR = 1
    PERFORMANCE = 2
    # cron monitors
    METRIC_ALERT = 8

    label = "ignored"

    def describe(self):
        NESTED = 99
        return NESTED
"#;
        let found = enum_match(code, "GroupCategory", MemberNaming::TitleCase)
            .unwrap()
            .unwrap();
        assert_eq!(found.records.len(), 3);
        assert_eq!(found.records[0].line, 3);
        assert_eq!(values(&found.records[0]), vec!["Error", "Performance", "Metric_Alert"]);
        assert_eq!(
            values(&found.records[1]),
            vec!["Error=1", "Performance=2", "Metric_Alert=8"]
        );
        assert_eq!(
            values(&found.records[2]),
            vec!["1=Error", "2=Performance", "8=Metric_Alert"]
        );
    }

    #[test]
    fn test_enum_class_string_values_verbatim() {
        let code = "class MatchType(StrEnum):\n    EQUAL = \"eq\"\n    IS_SET = \"is\"\n";
        let found = enum_match(code, "MatchType", MemberNaming::Verbatim)
            .unwrap()
            .unwrap();
        assert_eq!(values(&found.records[0]), vec!["EQUAL", "IS_SET"]);
        assert_eq!(values(&found.records[2]), vec!["eq=EQUAL", "is=IS_SET"]);
    }

    #[test]
    fn test_other_classes_are_ignored() {
        let code = "class Other:\n    A = 1\n";
        assert_eq!(
            enum_match(code, "GroupCategory", MemberNaming::TitleCase).unwrap(),
            None
        );
    }

    #[test]
    fn test_enum_member_call_is_fatal() {
        let code = "class GroupCategory(IntEnum):\n    ERROR = auto()\n";
        let err = enum_match(code, "GroupCategory", MemberNaming::TitleCase).unwrap_err();
        match err {
            GenError::ShapeAssertion { line, message, .. } => {
                assert_eq!(line, 2);
                assert!(message.contains("GroupCategory.ERROR"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_enum_duplicate_value_is_fatal() {
        let code = "class GroupCategory(IntEnum):\n    ERROR = 1\n    ISSUE = 1\n";
        let err = enum_match(code, "GroupCategory", MemberNaming::TitleCase).unwrap_err();
        assert!(err.to_string().contains("duplicate value `1`"));
    }

    #[test]
    fn test_choices_per_class() {
        let code = r#"
class DashboardWidgetQueryOrder(Model):
    pass

class DashboardWidgetDisplayTypes(TypesClass):
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
        let module = parse_module(code);
        let mut records = Vec::new();
        let mut matched_classes = 0;
        for node in find_all(&module, "class_definition") {
            if let Some(found) = match_choices_per_class(&module, node, "TYPES").unwrap() {
                matched_classes += 1;
                records.extend(found.records);
            }
        }
        assert_eq!(matched_classes, 2);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "DashboardWidgetDisplayTypes");
        assert_eq!(records[0].line, 8);
        assert_eq!(values(&records[0]), vec!["line", "area"]);
        assert_eq!(records[1].name, "DashboardWidgetTypes");
        assert_eq!(values(&records[1]), vec!["discover"]);
    }

    #[test]
    fn test_empty_choices_contribute_nothing() {
        let module = parse_module("class Empty:\n    TYPES = []\n");
        let node = find_all(&module, "class_definition")[0];
        let found = match_choices_per_class(&module, node, "TYPES").unwrap().unwrap();
        assert!(found.records.is_empty());
    }

    #[test]
    fn test_bare_annotations_are_skipped() {
        let code = r#"
class TypesClass:
    TYPES: list[tuple[int, str]]

class DashboardWidgetTypes(TypesClass):
    DISCOVER = 0
    TYPES = [(DISCOVER, "discover")]
"#;
        let module = parse_module(code);
        let classes = find_all(&module, "class_definition");
        assert_eq!(match_choices_per_class(&module, classes[0], "TYPES").unwrap(), None);

        let found = match_choices_per_class(&module, classes[1], "TYPES")
            .unwrap()
            .unwrap();
        assert_eq!(found.records.len(), 1);
        assert_eq!(found.records[0].name, "DashboardWidgetTypes");
        assert_eq!(values(&found.records[0]), vec!["discover"]);

        let code = "class GroupCategory(IntEnum):\n    ERROR: int\n    PERFORMANCE = 2\n";
        let found = enum_match(code, "GroupCategory", MemberNaming::TitleCase)
            .unwrap()
            .unwrap();
        assert_eq!(values(&found.records[0]), vec!["Performance"]);
    }

    #[test]
    fn test_malformed_choice_is_fatal() {
        for body in [
            "TYPES = [(LINE, \"line\", 3)]",
            "TYPES = [(line, \"line\")]",
            "TYPES = [(LINE, label())]",
            "TYPES = [\"line\"]",
            "TYPES = build_types()",
        ] {
            let code = format!("class Widget:\n    {body}\n");
            let module = parse_module(&code);
            let node = find_all(&module, "class_definition")[0];
            let err = match_choices_per_class(&module, node, "TYPES").unwrap_err();
            assert!(
                matches!(err, GenError::ShapeAssertion { line: 2, .. }),
                "{body}: {err}"
            );
        }
    }
}
