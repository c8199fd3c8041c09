//! The icon catalog.
//!
//! A catalog is an ordered list of [`IconEntry`] values loaded once from a
//! static `{ "name": ["tag", ...] }` document. Insertion order is the display
//! order when no search filter is active.
//!
//! Filtering is a plain case-insensitive substring scan over `name` followed
//! by the tags, each separated by a single space. Matches keep catalog order.
//!
//! ```
//! use horizon_icons::IconCatalog;
//!
//! let catalog = IconCatalog::from_json_str(r#"{
//!     "rocket": ["launch", "space"],
//!     "settings": ["gear", "config"],
//!     "rocket-ship": ["launch"]
//! }"#).unwrap();
//!
//! assert_eq!(catalog.filter("launch"), ["rocket", "rocket-ship"]);
//! assert_eq!(catalog.filter("GEAR "), ["settings"]);
//! assert!(catalog.filter("zzz").is_empty());
//! ```

use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::Path;

use horizon_icons_core::PerfSpan;
use horizon_icons_core::logging::span_names;
use serde::de::{Deserializer, MapAccess, Visitor};

use crate::error::{IconError, Result};
use crate::markup::sanitize_icon_name;

/// One selectable icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconEntry {
    /// Unique kebab-case identifier.
    pub name: String,
    /// Search tags in source order.
    pub tags: Vec<String>,
}

impl IconEntry {
    /// Create an entry.
    pub fn new<I, S>(name: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// `name` and tags joined by single spaces, lowercased.
    fn search_text(&self) -> String {
        let mut text = self.name.to_lowercase();
        for tag in &self.tags {
            text.push(' ');
            text.push_str(&tag.to_lowercase());
        }
        text
    }
}

/// In-memory index of all icons.
#[derive(Debug, Clone, Default)]
pub struct IconCatalog {
    entries: Vec<IconEntry>,
    search_text: Vec<String>,
    index: HashMap<String, usize>,
}

impl IconCatalog {
    /// Build a catalog from entries in display order.
    ///
    /// Fails when a name is duplicated or is not a safe icon token.
    pub fn from_entries(entries: impl IntoIterator<Item = IconEntry>) -> Result<Self> {
        let mut catalog = Self::default();
        for entry in entries {
            match sanitize_icon_name(&entry.name) {
                Some(safe) if safe == entry.name => {}
                _ => {
                    return Err(IconError::Catalog(format!(
                        "invalid icon name {:?}",
                        entry.name
                    )));
                }
            }
            if catalog.index.contains_key(&entry.name) {
                return Err(IconError::Catalog(format!(
                    "duplicate icon name {:?}",
                    entry.name
                )));
            }
            catalog
                .index
                .insert(entry.name.clone(), catalog.entries.len());
            catalog.search_text.push(entry.search_text());
            catalog.entries.push(entry);
        }

        tracing::debug!(
            target: "horizon_icons::catalog",
            icons = catalog.entries.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Parse a `{ name: [tags] }` JSON document, keeping key order.
    pub fn from_json_str(source: &str) -> Result<Self> {
        let mut de = serde_json::Deserializer::from_str(source);
        let entries = de.deserialize_map(EntriesVisitor)?;
        de.end()?;
        Self::from_entries(entries)
    }

    /// Parse a JSON document from a reader.
    pub fn from_json_reader(reader: impl Read) -> Result<Self> {
        let mut de = serde_json::Deserializer::from_reader(reader);
        let entries = de.deserialize_map(EntriesVisitor)?;
        de.end()?;
        Self::from_entries(entries)
    }

    /// Load a JSON catalog file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| IconError::io(path, e))?;
        Self::from_json_reader(std::io::BufReader::new(file))
    }

    /// Number of icons.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog holds no icons.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by name.
    pub fn get(&self, name: &str) -> Option<&IconEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// Whether `name` is in the catalog.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Display position of `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// All entries in display order.
    pub fn entries(&self) -> &[IconEntry] {
        &self.entries
    }

    /// Entry at a display position.
    pub fn entry_at(&self, position: usize) -> Option<&IconEntry> {
        self.entries.get(position)
    }

    /// All names in display order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Positions of the entries matching `query`, in display order.
    pub fn filter_indices(&self, query: &str) -> Vec<usize> {
        let _span = PerfSpan::new(span_names::FILTER);
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return (0..self.entries.len()).collect();
        }

        let matches: Vec<usize> = self
            .search_text
            .iter()
            .enumerate()
            .filter(|(_, text)| text.contains(&needle))
            .map(|(i, _)| i)
            .collect();

        tracing::trace!(
            target: "horizon_icons::catalog",
            query = %needle,
            matches = matches.len(),
            "filtered catalog"
        );
        matches
    }

    /// Names matching `query`, in display order.
    pub fn filter(&self, query: &str) -> Vec<&str> {
        self.filter_indices(query)
            .into_iter()
            .map(|i| self.entries[i].name.as_str())
            .collect()
    }
}

struct EntriesVisitor;

impl<'de> Visitor<'de> for EntriesVisitor {
    type Value = Vec<IconEntry>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of icon names to tag lists")
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((name, tags)) = map.next_entry::<String, Vec<String>>()? {
            entries.push(IconEntry { name, tags });
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> IconCatalog {
        IconCatalog::from_entries([
            IconEntry::new("rocket", ["launch", "space"]),
            IconEntry::new("settings", ["gear", "config"]),
            IconEntry::new("rocket-ship", ["launch"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_query_returns_all_in_order() {
        let catalog = scenario();
        assert_eq!(catalog.filter(""), ["rocket", "settings", "rocket-ship"]);
        assert_eq!(catalog.filter("   "), ["rocket", "settings", "rocket-ship"]);
    }

    #[test]
    fn test_tag_and_name_matches() {
        let catalog = scenario();
        assert_eq!(catalog.filter("launch"), ["rocket", "rocket-ship"]);
        assert_eq!(catalog.filter("gear"), ["settings"]);
        assert_eq!(catalog.filter("ship"), ["rocket-ship"]);
        assert!(catalog.filter("zzz").is_empty());
    }

    #[test]
    fn test_query_spanning_name_and_tag() {
        let catalog = scenario();
        // The composite string is "rocket launch space".
        assert_eq!(catalog.filter("rocket launch"), ["rocket"]);
        assert_eq!(catalog.filter("ch sp"), ["rocket"]);
    }

    #[test]
    fn test_case_insensitive() {
        let catalog = IconCatalog::from_entries([IconEntry::new("star", ["Favorite"])]).unwrap();
        assert_eq!(catalog.filter("FAVOR"), ["star"]);
    }

    #[test]
    fn test_json_preserves_order() {
        let catalog =
            IconCatalog::from_json_str(r#"{"zap": ["bolt"], "anchor": [], "moon": ["night"]}"#)
                .unwrap();
        assert_eq!(catalog.names().collect::<Vec<_>>(), ["zap", "anchor", "moon"]);
        assert_eq!(catalog.position("moon"), Some(2));
        assert_eq!(catalog.get("zap").unwrap().tags, ["bolt"]);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = IconCatalog::from_json_str(r#"{"zap": [], "zap": ["bolt"]}"#).unwrap_err();
        assert!(matches!(err, IconError::Catalog(_)));
    }

    #[test]
    fn test_unsafe_names_rejected() {
        let err = IconCatalog::from_entries([IconEntry::new("../up", Vec::<String>::new())])
            .unwrap_err();
        assert!(matches!(err, IconError::Catalog(_)));
    }

    #[test]
    fn test_malformed_json() {
        let err = IconCatalog::from_json_str(r#"{"zap": "bolt"}"#).unwrap_err();
        assert!(matches!(err, IconError::Json(_)));
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icons.json");
        std::fs::write(&path, r#"{"rocket": ["launch"]}"#).unwrap();

        let catalog = IconCatalog::from_path(&path).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.contains("rocket"));

        let missing = IconCatalog::from_path(dir.path().join("none.json")).unwrap_err();
        assert!(matches!(missing, IconError::Io { .. }));
    }
}
