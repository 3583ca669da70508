// Canonical line identifiers keyed by area and external (published) name
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MappingEntry {
    #[serde(default)]
    pub canonical: String,
    #[serde(default)]
    pub capacity_mw: Option<f64>,
}

/// On-disk mapping document: `{ "map": { "<area>::<external>": { ... } } }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MappingDocument {
    #[serde(default)]
    pub map: HashMap<String, MappingEntry>,
}

/// Read-only mapping for one run. Keys are exact `area::external` strings.
#[derive(Debug, Clone, Default)]
pub struct LineMapping {
    entries: HashMap<String, MappingEntry>,
}

impl LineMapping {
    pub fn new(entries: HashMap<String, MappingEntry>) -> Self {
        Self { entries }
    }

    /// Mapping that resolves every line to its own external name.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        let doc: MappingDocument = serde_json::from_str(text)?;
        Ok(Self::new(doc.map))
    }

    pub fn key(area: &str, external: &str) -> String {
        format!("{}::{}", area, external)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    fn entry(&self, area: &str, external: &str) -> Option<&MappingEntry> {
        self.entries.get(&Self::key(area, external))
    }

    /// Canonical ID for a published line. Unmapped lines keep their external
    /// name so they still show up and can be reconciled later.
    pub fn resolve(&self, area: &str, external: &str) -> String {
        match self.entry(area, external) {
            Some(entry) if !entry.canonical.is_empty() => entry.canonical.clone(),
            _ => external.to_string(),
        }
    }

    pub fn fallback_capacity(&self, area: &str, external: &str) -> Option<f64> {
        self.entry(area, external).and_then(|e| e.capacity_mw)
    }
}
