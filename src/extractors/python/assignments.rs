/// Module-level assignment shapes
/// Dict and list literals bound to a known name, annotated or not
use super::literals::string_value;
use super::symbols::SymbolTable;
use crate::error::Result;
use crate::extractors::base::{ModuleSource, OrderedMap, RecordValue};
use crate::extractors::shape::{MatchedRecord, ShapeMatch, TableNames};
use tree_sitter::Node;

/// Value node of `target = value` / `target: T = value` when `node` is that assignment.
/// A bare annotation (`target: T`) binds nothing and does not match.
pub(super) fn assigned_value<'t>(
    module: &ModuleSource,
    node: Node<'t>,
    target: &str,
) -> Result<Option<Node<'t>>> {
    if node.kind() != "assignment" {
        return Ok(None);
    }
    let Some(left) = node.child_by_field_name("left") else {
        return Ok(None);
    };
    if left.kind() != "identifier" || module.get_node_text(&left) != target {
        return Ok(None);
    }
    Ok(node.child_by_field_name("right"))
}

/// `(key, value)` nodes of a dict literal; splats and comprehensions are rejected
pub(super) fn dict_pairs<'t>(
    module: &ModuleSource,
    value: Node<'t>,
    target: &str,
) -> Result<Vec<(Node<'t>, Node<'t>)>> {
    if value.kind() != "dictionary" {
        return Err(module.shape_error(&value, format!("`{target}` must be a dict literal")));
    }

    let mut pairs = Vec::new();
    for child in module.significant_children(&value) {
        let key = child.child_by_field_name("key");
        let val = child.child_by_field_name("value");
        match (child.kind(), key, val) {
            ("pair", Some(key), Some(val)) => pairs.push((key, val)),
            _ => {
                return Err(module.shape_error(
                    &child,
                    format!("`{target}` entries must be `key: value` pairs"),
                ))
            }
        }
    }
    Ok(pairs)
}

/// Element nodes of a list literal; splats and comprehensions are rejected
pub(super) fn list_elements<'t>(
    module: &ModuleSource,
    value: Node<'t>,
    target: &str,
) -> Result<Vec<Node<'t>>> {
    if value.kind() != "list" {
        return Err(module.shape_error(&value, format!("`{target}` must be a list literal")));
    }
    let elements = module.significant_children(&value);
    if let Some(splat) = elements.iter().find(|e| e.kind() == "list_splat") {
        return Err(module.shape_error(splat, format!("`{target}` must not unpack other lists")));
    }
    Ok(elements)
}

fn require_string(module: &ModuleSource, node: Node, what: &str) -> Result<String> {
    string_value(module, node)
        .ok_or_else(|| module.shape_error(&node, format!("{what} must be a string literal")))
}

/// Resolve `module.SYMBOL` through the table to its textual value
fn resolve_symbol(module: &ModuleSource, key: Node, symbols: &SymbolTable) -> Result<String> {
    if key.kind() != "attribute" {
        return Err(module.shape_error(
            &key,
            format!("key must be a `{}.NAME` reference", symbols.module),
        ));
    }
    let object = module.get_field_text(&key, "object").unwrap_or("");
    let attribute = module.get_field_text(&key, "attribute").unwrap_or("");
    if object != symbols.module {
        return Err(module.shape_error(
            &key,
            format!("key must reference module `{}`", symbols.module),
        ));
    }
    symbols
        .resolve(attribute)
        .map(|value| value.to_string())
        .ok_or_else(|| {
            module.shape_error(
                &key,
                format!("unknown symbol `{}.{attribute}`", symbols.module),
            )
        })
}

pub(crate) fn match_symbol_keyed_dict(
    module: &ModuleSource,
    node: Node,
    target: &str,
    symbols: &SymbolTable,
    names: &TableNames,
) -> Result<Option<ShapeMatch>> {
    let Some(value) = assigned_value(module, node, target)? else {
        return Ok(None);
    };

    let mut list = Vec::new();
    let mut name_to_id = OrderedMap::new();
    let mut id_to_name = OrderedMap::new();
    for (key, val) in dict_pairs(module, value, target)? {
        let id = resolve_symbol(module, key, symbols)?;
        let name = require_string(module, val, &format!("`{target}` value"))?;

        name_to_id
            .insert(name.as_str(), id.as_str())
            .map_err(|_| module.shape_error(&val, format!("duplicate name `{name}`")))?;
        id_to_name
            .insert(id.as_str(), name.as_str())
            .map_err(|_| module.shape_error(&key, format!("duplicate id `{id}`")))?;
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

pub(crate) fn match_string_keyed_dict(
    module: &ModuleSource,
    node: Node,
    target: &str,
    name: &str,
) -> Result<Option<ShapeMatch>> {
    let Some(value) = assigned_value(module, node, target)? else {
        return Ok(None);
    };

    let keys = dict_pairs(module, value, target)?
        .into_iter()
        .map(|(key, _)| require_string(module, key, &format!("`{target}` key")))
        .collect::<Result<Vec<_>>>()?;

    Ok(Some(single_list(module, node, name, keys)))
}

pub(crate) fn match_attribute_keyed_dict(
    module: &ModuleSource,
    node: Node,
    target: &str,
    name: &str,
) -> Result<Option<ShapeMatch>> {
    let Some(value) = assigned_value(module, node, target)? else {
        return Ok(None);
    };

    let mut attributes = Vec::new();
    for (key, _) in dict_pairs(module, value, target)? {
        let attribute = (key.kind() == "attribute")
            .then(|| module.get_field_text(&key, "attribute"))
            .flatten()
            .ok_or_else(|| {
                module.shape_error(&key, format!("`{target}` keys must be `Owner.NAME` references"))
            })?;
        attributes.push(attribute.to_string());
    }

    Ok(Some(single_list(module, node, name, attributes)))
}

pub(crate) fn match_string_list(
    module: &ModuleSource,
    node: Node,
    target: &str,
    name: &str,
    sentinel: Option<&str>,
) -> Result<Option<ShapeMatch>> {
    let Some(value) = assigned_value(module, node, target)? else {
        return Ok(None);
    };

    let mut values: Vec<String> = sentinel.iter().map(|s| s.to_string()).collect();
    for element in list_elements(module, value, target)? {
        let item = require_string(module, element, &format!("`{target}` element"))?;
        if sentinel == Some(item.as_str()) {
            return Err(module.shape_error(
                &element,
                format!("`{target}` already contains the sentinel `{item}`"),
            ));
        }
        values.push(item);
    }

    Ok(Some(single_list(module, node, name, values)))
}

fn single_list(module: &ModuleSource, node: Node, name: &str, values: Vec<String>) -> ShapeMatch {
    ShapeMatch {
        records: vec![MatchedRecord {
            name: name.to_string(),
            line: module.position(&node).0,
            value: RecordValue::List(values),
        }],
    }
}
