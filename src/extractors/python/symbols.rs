/// Static symbol tables for attribute references in upstream dict keys
///
/// Upstream keys such as `logging.DEBUG` name values that live in Python's
/// standard library. Those values are frozen here instead of being looked up.

/// A module's named integer constants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolTable {
    /// Module the references must be qualified with, e.g. `logging`
    pub module: &'static str,
    pub entries: &'static [(&'static str, i64)],
}

impl SymbolTable {
    pub fn resolve(&self, name: &str) -> Option<i64> {
        self.entries
            .iter()
            .find(|(symbol, _)| *symbol == name)
            .map(|(_, value)| *value)
    }
}

/// Python `logging` level constants
pub const LOGGING_LEVELS: SymbolTable = SymbolTable {
    module: "logging",
    entries: &[
        ("CRITICAL", 50),
        ("FATAL", 50),
        ("ERROR", 40),
        ("WARNING", 30),
        ("WARN", 30),
        ("INFO", 20),
        ("DEBUG", 10),
        ("NOTSET", 0),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_levels() {
        assert_eq!(LOGGING_LEVELS.resolve("DEBUG"), Some(10));
        assert_eq!(LOGGING_LEVELS.resolve("NOTSET"), Some(0));
        assert_eq!(LOGGING_LEVELS.resolve("FATAL"), LOGGING_LEVELS.resolve("CRITICAL"));
        assert_eq!(LOGGING_LEVELS.resolve("debug"), None);
    }
}
