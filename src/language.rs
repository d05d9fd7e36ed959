//! Language Support - Shared tree-sitter language configuration
//!
//! The generator reads Python (upstream Sentry modules) and writes Go (the
//! generated package). ALL tree-sitter grammar wiring lives here so the
//! extractors and the renderer's verification pass agree on versions.

use anyhow::Result;
use tree_sitter::Parser;

/// Get tree-sitter language parser for a given language name
///
/// **Input**: Python
/// **Output verification**: Go
pub fn get_tree_sitter_language(language: &str) -> Result<tree_sitter::Language> {
    match language {
        "python" => Ok(tree_sitter_python::LANGUAGE.into()),
        "go" => Ok(tree_sitter_go::LANGUAGE.into()),
        _ => Err(anyhow::anyhow!(
            "Unsupported language: '{}'. Supported languages: python, go",
            language
        )),
    }
}

/// Detect language from file extension
///
/// Returns the language name that can be passed to `get_tree_sitter_language()`.
pub fn detect_language_from_extension(extension: &str) -> Option<&'static str> {
    match extension {
        "py" | "pyi" => Some("python"),
        "go" => Some("go"),
        _ => None,
    }
}

/// Build a parser already configured for `language`
pub fn new_parser(language: &str) -> Result<Parser> {
    let mut parser = Parser::new();
    let tree_sitter_language = get_tree_sitter_language(language)?;
    parser
        .set_language(&tree_sitter_language)
        .map_err(|e| anyhow::anyhow!("Failed to set parser language for {}: {}", language, e))?;
    Ok(parser)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_languages_parse() {
        let mut python = new_parser("python").unwrap();
        let tree = python.parse("X = 1\n", None).unwrap();
        assert!(!tree.root_node().has_error());

        let mut go = new_parser("go").unwrap();
        let tree = go.parse("package x\n", None).unwrap();
        assert!(!tree.root_node().has_error());
    }

    #[test]
    fn test_unknown_language_is_rejected() {
        let err = get_tree_sitter_language("cobol").unwrap_err();
        assert!(err.to_string().contains("Unsupported language"));
    }

    #[test]
    fn test_extension_detection() {
        assert_eq!(detect_language_from_extension("py"), Some("python"));
        assert_eq!(detect_language_from_extension("go"), Some("go"));
        assert_eq!(detect_language_from_extension("rs"), None);
    }
}
