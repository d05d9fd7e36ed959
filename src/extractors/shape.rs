//! Recognized declaration shapes
//!
//! A [`Shape`] is one narrowly-defined syntactic pattern. Matching a node is a
//! three-way outcome:
//!
//! - `Ok(None)`: the node is not this shape's target, keep walking
//! - `Ok(Some(_))`: the target was found and has the expected literal structure
//! - `Err(GenError::ShapeAssertion)`: the target was found but its structure
//!   changed upstream

use tree_sitter::Node;

use crate::error::Result;
use crate::extractors::base::{ModuleSource, RecordValue};
use crate::extractors::python::symbols::SymbolTable;
use crate::extractors::python::{assignments, classes};

/// Declaration names for the list / name→id / id→name triple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableNames {
    pub list: &'static str,
    pub name_to_id: &'static str,
    pub id_to_name: &'static str,
}

/// How enum member identifiers become record names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberNaming {
    /// `IS_SET` stays `IS_SET`
    Verbatim,
    /// `METRIC_ALERT` becomes `Metric_Alert`
    TitleCase,
}

impl MemberNaming {
    pub fn apply(&self, identifier: &str) -> String {
        match self {
            MemberNaming::Verbatim => identifier.to_string(),
            MemberNaming::TitleCase => classes::normalize_member_name(identifier),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// `TARGET = {module.SYMBOL: "name", ...}` resolved through a symbol table
    SymbolKeyedDict {
        target: &'static str,
        symbols: SymbolTable,
        names: TableNames,
    },
    /// `class CLASS: UPPER_NAME = <literal>` members
    EnumClass {
        class: &'static str,
        naming: MemberNaming,
        names: TableNames,
    },
    /// `TARGET[: T] = {"key": ..., ...}`, keys only
    StringKeyedDict {
        target: &'static str,
        name: &'static str,
    },
    /// `TARGET = {Owner.ATTR: ..., ...}`, final attribute segment of each key
    AttributeKeyedDict {
        target: &'static str,
        name: &'static str,
    },
    /// `ATTRIBUTE = [(UPPER_NAME, "label"), ...]` inside any class, one record per class
    ChoicesPerClass { attribute: &'static str },
    /// `TARGET = ["a", "b", ...]`, optionally led by a sentinel entry
    StringList {
        target: &'static str,
        name: &'static str,
        sentinel: Option<&'static str>,
    },
}

/// One record produced by a match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedRecord {
    pub name: String,
    /// 1-based line the record is anchored to
    pub line: usize,
    pub value: RecordValue,
}

/// Successful match of a shape at one node. May hold zero records when the
/// shape is present but empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShapeMatch {
    pub records: Vec<MatchedRecord>,
}

impl Shape {
    pub fn match_node(&self, module: &ModuleSource, node: Node) -> Result<Option<ShapeMatch>> {
        match self {
            Shape::SymbolKeyedDict {
                target,
                symbols,
                names,
            } => assignments::match_symbol_keyed_dict(module, node, target, symbols, names),
            Shape::EnumClass {
                class,
                naming,
                names,
            } => classes::match_enum_class(module, node, class, *naming, names),
            Shape::StringKeyedDict { target, name } => {
                assignments::match_string_keyed_dict(module, node, target, name)
            }
            Shape::AttributeKeyedDict { target, name } => {
                assignments::match_attribute_keyed_dict(module, node, target, name)
            }
            Shape::ChoicesPerClass { attribute } => {
                classes::match_choices_per_class(module, node, attribute)
            }
            Shape::StringList {
                target,
                name,
                sentinel,
            } => assignments::match_string_list(module, node, target, name, *sentinel),
        }
    }

    /// Human-readable description used in logs and `MissingShape` errors
    pub fn describe(&self) -> String {
        match self {
            Shape::SymbolKeyedDict { target, symbols, .. } => {
                format!("`{target}` dict keyed by `{}` symbols", symbols.module)
            }
            Shape::EnumClass { class, .. } => format!("enum members of class `{class}`"),
            Shape::StringKeyedDict { target, .. } => format!("`{target}` dict keyed by strings"),
            Shape::AttributeKeyedDict { target, .. } => {
                format!("`{target}` dict keyed by attributes")
            }
            Shape::ChoicesPerClass { attribute } => format!("`{attribute}` choices in any class"),
            Shape::StringList { target, .. } => format!("`{target}` list of strings"),
        }
    }
}
