// Read-back check for rendered Go
//
// The rendered file is parsed with the Go grammar and its `var` declarations
// decoded back into names and string values. The result has to equal the
// catalog it was rendered from, entry for entry.

use tree_sitter::Node;

use crate::catalog::Catalog;
use crate::error::{GenError, Result};
use crate::extractors::{OrderedMap, RecordValue};

/// A declaration recovered from Go source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoDeclaration {
    pub name: String,
    pub value: RecordValue,
}

/// Parsed view of a generated Go file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoFile {
    pub package: String,
    pub declarations: Vec<GoDeclaration>,
}

/// Parse generated Go source back into its package and declarations
pub fn read_back(source: &str) -> Result<GoFile> {
    let mut parser = crate::language::new_parser("go").map_err(|e| GenError::Render(e.to_string()))?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| GenError::Render("Go parser returned no tree".to_string()))?;
    let root = tree.root_node();
    if root.has_error() {
        let at = first_error_position(root).unwrap_or((1, 1));
        return Err(GenError::Render(format!(
            "generated Go is not syntactically valid at line {} column {}",
            at.0, at.1
        )));
    }

    let reader = Reader { source };
    let mut file = GoFile {
        package: String::new(),
        declarations: Vec::new(),
    };

    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        match child.kind() {
            "package_clause" => {
                let mut inner = child.walk();
                let name = child
                    .named_children(&mut inner)
                    .find(|n| n.kind() == "package_identifier");
                if let Some(name) = name {
                    file.package = reader.text(&name).to_string();
                }
            }
            "var_declaration" => {
                let mut inner = child.walk();
                for spec in child.named_children(&mut inner) {
                    match spec.kind() {
                        "var_spec" => file.declarations.push(reader.var_spec(spec)?),
                        "var_spec_list" => {
                            let mut nested = spec.walk();
                            for nested_spec in spec.named_children(&mut nested) {
                                if nested_spec.kind() == "var_spec" {
                                    file.declarations.push(reader.var_spec(nested_spec)?);
                                }
                            }
                        }
                        _ => {}
                    }
                }
            }
            "comment" => {}
            other => {
                return Err(GenError::Render(format!(
                    "unexpected top-level `{other}` in generated Go"
                )))
            }
        }
    }

    Ok(file)
}

/// Check that `source` declares exactly the catalog's entries, in order
pub fn verify(source: &str, package: &str, catalog: &Catalog) -> Result<()> {
    let file = read_back(source)?;
    if file.package != package {
        return Err(GenError::Render(format!(
            "generated package is `{}`, expected `{package}`",
            file.package
        )));
    }
    if file.declarations.len() != catalog.len() {
        return Err(GenError::Render(format!(
            "generated Go declares {} names, catalog has {}",
            file.declarations.len(),
            catalog.len()
        )));
    }

    for (declaration, (name, record)) in file.declarations.iter().zip(catalog.iter()) {
        if declaration.name != name {
            return Err(GenError::Render(format!(
                "generated Go declares `{}` where `{name}` was expected",
                declaration.name
            )));
        }
        if declaration.value != record.value {
            return Err(GenError::Render(format!(
                "value of `{name}` does not survive rendering"
            )));
        }
    }
    Ok(())
}

fn first_error_position(node: Node) -> Option<(usize, usize)> {
    if node.is_error() || node.is_missing() {
        let start = node.start_position();
        return Some((start.row + 1, start.column + 1));
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error() || child.is_missing())
        .find_map(first_error_position)
}

struct Reader<'s> {
    source: &'s str,
}

impl<'s> Reader<'s> {
    fn text(&self, node: &Node) -> &'s str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn malformed(&self, node: &Node, what: &str) -> GenError {
        GenError::Render(format!(
            "line {}: {what}, found `{}`",
            node.start_position().row + 1,
            self.text(node)
        ))
    }

    /// `Name = []string{...}` or `Name = map[string]string{...}`
    fn var_spec(&self, spec: Node) -> Result<GoDeclaration> {
        let name = spec
            .child_by_field_name("name")
            .ok_or_else(|| self.malformed(&spec, "declaration without a name"))?;
        let values = spec
            .child_by_field_name("value")
            .ok_or_else(|| self.malformed(&spec, "declaration without a value"))?;

        let mut cursor = values.walk();
        let expressions: Vec<_> = values.named_children(&mut cursor).collect();
        let [literal] = expressions.as_slice() else {
            return Err(self.malformed(&values, "expected a single value"));
        };
        if literal.kind() != "composite_literal" {
            return Err(self.malformed(literal, "expected a composite literal"));
        }

        let literal_type = literal
            .child_by_field_name("type")
            .map(|t| self.text(&t).split_whitespace().collect::<String>())
            .unwrap_or_default();
        let body = literal
            .child_by_field_name("body")
            .ok_or_else(|| self.malformed(literal, "composite literal without a body"))?;

        let value = match literal_type.as_str() {
            "[]string" => RecordValue::List(self.list_body(body)?),
            "map[string]string" => RecordValue::Map(self.map_body(body)?),
            _ => return Err(self.malformed(literal, "expected []string or map[string]string")),
        };

        Ok(GoDeclaration {
            name: self.text(&name).to_string(),
            value,
        })
    }

    fn elements<'t>(&self, body: Node<'t>) -> Vec<Node<'t>> {
        let mut cursor = body.walk();
        body.named_children(&mut cursor)
            .filter(|n| n.kind() != "comment")
            .collect()
    }

    fn list_body(&self, body: Node) -> Result<Vec<String>> {
        self.elements(body)
            .into_iter()
            .map(|element| {
                if element.kind() == "keyed_element" {
                    return Err(self.malformed(&element, "keyed element in a slice"));
                }
                self.string(element)
            })
            .collect()
    }

    fn map_body(&self, body: Node) -> Result<OrderedMap> {
        let mut map = OrderedMap::new();
        for element in self.elements(body) {
            if element.kind() != "keyed_element" {
                return Err(self.malformed(&element, "map element without a key"));
            }
            let parts = self.elements(element);
            let [key, value] = parts.as_slice() else {
                return Err(self.malformed(&element, "expected `key: value`"));
            };
            let key = self.string(*key)?;
            map.insert(key.as_str(), self.string(*value)?)
                .map_err(|_| self.malformed(&element, "duplicate map key"))?;
        }
        Ok(map)
    }

    /// Decode a string literal, looking through `literal_element` wrappers
    fn string(&self, node: Node) -> Result<String> {
        let node = if node.kind() == "literal_element" {
            node.named_child(0)
                .ok_or_else(|| self.malformed(&node, "empty element"))?
        } else {
            node
        };
        match node.kind() {
            "interpreted_string_literal" => go_unquote(self.text(&node))
                .ok_or_else(|| self.malformed(&node, "invalid string literal")),
            "raw_string_literal" => {
                let text = self.text(&node);
                Ok(text.trim_start_matches('`').trim_end_matches('`').to_string())
            }
            _ => Err(self.malformed(&node, "expected a string literal")),
        }
    }
}

/// Decode a Go interpreted string literal, quotes included
pub fn go_unquote(literal: &str) -> Option<String> {
    let inner = literal.strip_prefix('"')?.strip_suffix('"')?;
    let mut bytes = Vec::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0u8; 4];
            bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        let escaped = chars.next()?;
        let simple = match escaped {
            'a' => Some(0x07),
            'b' => Some(0x08),
            'f' => Some(0x0c),
            'n' => Some(b'\n'),
            'r' => Some(b'\r'),
            't' => Some(b'\t'),
            'v' => Some(0x0b),
            '\\' => Some(b'\\'),
            '"' => Some(b'"'),
            _ => None,
        };
        if let Some(byte) = simple {
            bytes.push(byte);
            continue;
        }

        match escaped {
            'x' => bytes.push(u8::from_str_radix(&take(&mut chars, 2)?, 16).ok()?),
            'u' | 'U' => {
                let digits = take(&mut chars, if escaped == 'u' { 4 } else { 8 })?;
                let decoded = char::from_u32(u32::from_str_radix(&digits, 16).ok()?)?;
                let mut buf = [0u8; 4];
                bytes.extend_from_slice(decoded.encode_utf8(&mut buf).as_bytes());
            }
            '0'..='7' => {
                let rest = take(&mut chars, 2)?;
                let octal = format!("{escaped}{rest}");
                bytes.push(u8::from_str_radix(&octal, 8).ok()?);
            }
            _ => return None,
        }
    }

    String::from_utf8(bytes).ok()
}

fn take(chars: &mut std::str::Chars, count: usize) -> Option<String> {
    let taken: String = chars.take(count).collect();
    (taken.chars().count() == count).then_some(taken)
}
