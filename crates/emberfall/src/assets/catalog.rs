use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Opaque draw token. The core never inspects what it names; it only hands
/// it back to the surface with each draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetId(pub u32);

/// Name → token catalog, loaded from JSON next to the host's atlas data.
///
/// Lookups fail fast: a missing name is a content/build error baked into the
/// shipped data, not something gameplay can recover from at runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetCatalog {
    entries: HashMap<String, AssetId>,
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog from a JSON string of `{ "name": id, ... }` pairs.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let entries: HashMap<String, u32> = serde_json::from_str(json)?;
        Ok(AssetCatalog {
            entries: entries
                .into_iter()
                .map(|(name, id)| (name, AssetId(id)))
                .collect(),
        })
    }

    pub fn insert(&mut self, name: impl Into<String>, id: AssetId) {
        self.entries.insert(name.into(), id);
    }

    /// Resolve a named asset. Panics when the name is unknown.
    pub fn id(&self, name: &str) -> AssetId {
        match self.entries.get(name) {
            Some(id) => *id,
            None => panic!("unknown asset name: {}", name),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
