// Go source rendering
//
// Layout mirrors what `gofmt` produces for this input so that formatting is a
// no-op in the common case: tab indentation, one element per line, trailing
// commas, map values aligned on the widest key.

use crate::catalog::Catalog;
use crate::extractors::{OrderedMap, RecordValue, ResultRecord};

/// Tool name written into the generated-file header
pub const GENERATOR: &str = env!("CARGO_PKG_NAME");

/// Quote `value` as a Go interpreted string literal
///
/// Printable characters are kept as-is (the file is UTF-8); the usual C
/// escapes are used where Go has them, `\x` for any other ASCII control
/// byte, `\u` for non-ASCII control characters.
pub fn go_quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            '\u{0b}' => out.push_str("\\v"),
            c if c.is_ascii_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Renders a catalog as a Go file in one package
#[derive(Debug, Clone)]
pub struct GoRenderer {
    package: String,
}

impl GoRenderer {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
        }
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    /// Render without verifying; see [`super::render_go`] for the checked path
    pub fn render(&self, catalog: &Catalog) -> String {
        let mut out = format!(
            "// Code generated by {GENERATOR}. DO NOT EDIT.\n\npackage {}\n",
            self.package
        );

        for group in group_by_provenance(catalog) {
            out.push('\n');
            out.push_str("// ");
            out.push_str(&group.url);
            out.push_str("\nvar (\n");
            for (name, record) in group.entries {
                render_declaration(&mut out, name, record);
            }
            out.push_str(")\n");
        }
        out
    }
}

struct Group<'c> {
    url: String,
    entries: Vec<(&'c str, &'c ResultRecord)>,
}

/// Consecutive catalog entries that share a provenance URL
fn group_by_provenance(catalog: &Catalog) -> Vec<Group<'_>> {
    let mut groups: Vec<Group> = Vec::new();
    for (name, record) in catalog.iter() {
        let url = record.provenance.url();
        match groups.last_mut() {
            Some(group) if group.url == url => group.entries.push((name, record)),
            _ => groups.push(Group {
                url,
                entries: vec![(name, record)],
            }),
        }
    }
    groups
}

fn render_declaration(out: &mut String, name: &str, record: &ResultRecord) {
    match &record.value {
        RecordValue::List(values) => {
            if values.is_empty() {
                out.push_str(&format!("\t{name} = []string{{}}\n"));
                return;
            }
            out.push_str(&format!("\t{name} = []string{{\n"));
            for value in values {
                out.push_str(&format!("\t\t{},\n", go_quote(value)));
            }
            out.push_str("\t}\n");
        }
        RecordValue::Map(map) => {
            if map.is_empty() {
                out.push_str(&format!("\t{name} = map[string]string{{}}\n"));
                return;
            }
            out.push_str(&format!("\t{name} = map[string]string{{\n"));
            render_map_entries(out, map);
            out.push_str("\t}\n");
        }
    }
}

fn render_map_entries(out: &mut String, map: &OrderedMap) {
    let keys: Vec<String> = map.keys().map(|key| format!("{}:", go_quote(key))).collect();
    let width = keys.iter().map(|key| key.chars().count()).max().unwrap_or(0);

    for (key, (_, value)) in keys.iter().zip(map.iter()) {
        out.push_str(&format!("\t\t{key:<width$} {},\n", go_quote(value)));
    }
}
