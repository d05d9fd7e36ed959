/// Literal decoding for Python constant expressions
/// Covers what `ast.Constant` would hold: str, int, True/False/None
use crate::extractors::base::ModuleSource;
use tree_sitter::Node;

/// Textual form of a constant literal, or `None` when `node` is not one.
///
/// Strings are decoded, integers are rendered in decimal, and the keyword
/// constants keep their Python spelling.
pub fn constant_text(module: &ModuleSource, node: Node) -> Option<String> {
    match node.kind() {
        "string" | "concatenated_string" => string_value(module, node),
        "integer" => integer_value(module.get_node_text(&node)),
        "true" => Some("True".to_string()),
        "false" => Some("False".to_string()),
        "none" => Some("None".to_string()),
        "unary_operator" => {
            let operator = module.get_field_text(&node, "operator")?;
            let argument = node.child_by_field_name("argument")?;
            if argument.kind() != "integer" {
                return None;
            }
            let value = integer_value(module.get_node_text(&argument))?;
            match operator {
                "-" if value == "0" => Some(value),
                "-" => Some(format!("-{value}")),
                "+" => Some(value),
                _ => None,
            }
        }
        "parenthesized_expression" => match module.significant_children(&node).as_slice() {
            [inner] => constant_text(module, *inner),
            _ => None,
        },
        _ => None,
    }
}

/// Decoded value of a `str` literal, or `None` for anything else
/// (bytes, f-strings with interpolations, non-string nodes).
pub fn string_value(module: &ModuleSource, node: Node) -> Option<String> {
    match node.kind() {
        "string" => {
            let mut cursor = node.walk();
            if node
                .children(&mut cursor)
                .any(|child| child.kind() == "interpolation")
            {
                return None;
            }
            decode_string_literal(module.get_node_text(&node))
        }
        "concatenated_string" => {
            let mut out = String::new();
            for part in module.significant_children(&node) {
                out.push_str(&string_value(module, part)?);
            }
            Some(out)
        }
        "parenthesized_expression" => match module.significant_children(&node).as_slice() {
            [inner] => string_value(module, *inner),
            _ => None,
        },
        _ => None,
    }
}

/// Decode the source text of a single string literal, prefix and quotes included
pub fn decode_string_literal(text: &str) -> Option<String> {
    let quote_start = text.find(['"', '\''])?;
    let prefix = text[..quote_start].to_ascii_lowercase();
    if prefix.contains('b') || !prefix.chars().all(|c| matches!(c, 'r' | 'u' | 'f')) {
        return None;
    }
    let raw = prefix.contains('r');

    let quoted = &text[quote_start..];
    let delimiters = ["\"\"\"", "'''", "\"", "'"];
    let delimiter = delimiters.iter().find(|d| quoted.starts_with(**d))?;
    if quoted.len() < delimiter.len() * 2 || !quoted.ends_with(delimiter) {
        return None;
    }
    let body = &quoted[delimiter.len()..quoted.len() - delimiter.len()];

    if raw {
        Some(body.to_string())
    } else {
        Some(unescape(body))
    }
}

fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(escaped) = chars.next() else {
            out.push('\\');
            break;
        };
        match escaped {
            '\n' => {}
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0c}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\u{0b}'),
            '0'..='7' => {
                let mut digits = escaped.to_string();
                while digits.len() < 3 {
                    match chars.peek() {
                        Some(d @ '0'..='7') => {
                            digits.push(*d);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                match u32::from_str_radix(&digits, 8).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push('\\');
                        out.push_str(&digits);
                    }
                }
            }
            'x' | 'u' | 'U' => {
                let width = match escaped {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let hex: String = chars.clone().take(width).collect();
                let decoded = (hex.len() == width)
                    .then(|| u32::from_str_radix(&hex, 16).ok())
                    .flatten()
                    .and_then(char::from_u32);
                match decoded {
                    Some(decoded) => {
                        out.push(decoded);
                        for _ in 0..width {
                            chars.next();
                        }
                    }
                    None => {
                        out.push('\\');
                        out.push(escaped);
                    }
                }
            }
            other => {
                // Unknown escapes are kept verbatim, as Python does
                out.push('\\');
                out.push(other);
            }
        }
    }

    out
}

/// Decimal form of an integer literal (`0x1F`, `0o17`, `1_000`, ...)
pub fn integer_value(text: &str) -> Option<String> {
    let cleaned = text.replace('_', "").to_ascii_lowercase();
    let (digits, radix) = if let Some(rest) = cleaned.strip_prefix("0x") {
        (rest, 16)
    } else if let Some(rest) = cleaned.strip_prefix("0o") {
        (rest, 8)
    } else if let Some(rest) = cleaned.strip_prefix("0b") {
        (rest, 2)
    } else {
        (cleaned.as_str(), 10)
    };
    if digits.is_empty() {
        return None;
    }
    u128::from_str_radix(digits, radix)
        .ok()
        .map(|value| value.to_string())
}
