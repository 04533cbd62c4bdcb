use std::collections::HashMap;

use serde::Deserialize;

const BLOCK_FAMILIES: [&str; 8] = [
    "Brick", "Dirt", "Elements", "Metal", "Plaster", "Stone", "Tile", "Wood",
];
const TILES_PER_FAMILY: u32 = 20;

/// Tile id -> texture path lookup with a fallback for unresolved ids.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetCatalog {
    missing: String,
    #[serde(default)]
    tiles: HashMap<u32, String>,
}

impl AssetCatalog {
    /// Empty catalog whose unknown ids resolve to `missing`.
    pub fn new(missing: impl Into<String>) -> Self {
        Self {
            missing: missing.into(),
            tiles: HashMap::new(),
        }
    }

    /// The stock block set: ids 1..=160, twenty per family. Id 0 stays unmapped.
    pub fn builtin(missing: impl Into<String>) -> Self {
        let mut catalog = Self::new(missing);
        for (family_idx, family) in BLOCK_FAMILIES.iter().enumerate() {
            for n in 1..=TILES_PER_FAMILY {
                let id = family_idx as u32 * TILES_PER_FAMILY + n;
                catalog.insert(
                    id,
                    format!("texture/block/{family}/{family}_{n:02}-256x256.png"),
                );
            }
        }
        catalog
    }

    /// Parses a catalog from JSON: `{ "missing": ..., "tiles": { "1": path } }`.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Maps `id` to `path`, replacing any earlier entry.
    pub fn insert(&mut self, id: u32, path: impl Into<String>) {
        self.tiles.insert(id, path.into());
    }

    /// Texture path registered for `id`.
    #[inline]
    pub fn get(&self, id: u32) -> Option<&str> {
        self.tiles.get(&id).map(String::as_str)
    }

    /// Mapped path, or the missing-asset path for id 0 and unknown ids.
    #[inline]
    pub fn resolve(&self, id: u32) -> &str {
        self.get(id).unwrap_or(&self.missing)
    }

    /// Fallback texture path.
    pub fn missing(&self) -> &str {
        &self.missing
    }

    /// Number of registered tile ids.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether no tile ids are registered.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}
