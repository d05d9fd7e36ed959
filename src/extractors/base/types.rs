// Record model for extracted constant tables
//
// Everything an extractor produces and the catalog consumes: where a record
// came from, what it holds, and the ordered name → record containers.

use crate::error::{GenError, Result};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A file at a specific revision of an upstream repository
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SourceLocation {
    /// Repository identifier, `owner/name`
    pub repository: String,
    /// Branch, tag or commit the file was read at
    pub revision: String,
    /// Path relative to the repository root, `/`-separated
    pub path: String,
}

impl SourceLocation {
    pub fn new(repository: &str, revision: &str, path: &str) -> Self {
        Self {
            repository: repository.to_string(),
            revision: revision.to_string(),
            path: path.trim_start_matches('/').to_string(),
        }
    }

    /// Canonical browsable URL of the file
    pub fn url(&self) -> String {
        format!(
            "https://github.com/{}/blob/{}/{}",
            self.repository, self.revision, self.path
        )
    }
}

/// Where a single record was derived from: a file plus the declaration line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Provenance {
    pub location: SourceLocation,
    /// 1-based line of the matched declaration
    pub line: usize,
}

impl Provenance {
    pub fn url(&self) -> String {
        format!("{}#L{}", self.location.url(), self.line)
    }
}

/// Insertion-ordered string → string map with unique keys
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedMap {
    entries: Vec<(String, String)>,
}

impl OrderedMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pair. A key that is already present is rejected and the
    /// existing value returned, leaving the map unchanged.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> std::result::Result<(), String> {
        let key = key.into();
        if let Some(existing) = self.get(&key) {
            return Err(existing.to_string());
        }
        self.entries.push((key, value.into()));
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Serialized as a JSON object; serde_json keeps insertion order for
// `serialize_map` output since it streams entries.
impl Serialize for OrderedMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// The value of a record: an ordered list or an ordered map
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum RecordValue {
    /// Sequence; order significant, duplicates permitted
    List(Vec<String>),
    /// Key/value pairs; order significant, keys unique
    Map(OrderedMap),
}

/// A named constant table together with its provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRecord {
    pub value: RecordValue,
    pub provenance: Provenance,
}

/// Ordered declaration name → record mapping with unique names
///
/// Shared by extraction results and the final catalog so that a repeated
/// name is rejected the same way at both levels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Declarations {
    entries: Vec<(String, ResultRecord)>,
}

impl Declarations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record; a name that is already declared is a `CatalogCollision`.
    pub fn insert(&mut self, name: impl Into<String>, record: ResultRecord) -> Result<()> {
        let name = name.into();
        if let Some(existing) = self.get(&name) {
            return Err(GenError::CatalogCollision {
                first: existing.provenance.url(),
                second: record.provenance.url(),
                name,
            });
        }
        self.entries.push((name, record));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ResultRecord> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, r)| r)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResultRecord)> {
        self.entries.iter().map(|(n, r)| (n.as_str(), r))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for Declarations {
    type Item = (String, ResultRecord);
    type IntoIter = std::vec::IntoIter<(String, ResultRecord)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for Declarations {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, record) in &self.entries {
            map.serialize_entry(name, record)?;
        }
        map.end()
    }
}

/// Output of one extractor invocation against one module
#[derive(Debug, Clone, Default)]
pub struct ExtractionResult {
    pub declarations: Declarations,
    /// Descriptions of the extractor's shapes that matched no node
    pub unmatched: Vec<String>,
}
