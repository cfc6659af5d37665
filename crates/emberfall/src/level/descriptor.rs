use glam::Vec2;
use serde::{Deserialize, Serialize};

/// 2-bit side-connectivity mask: which of a chunk's left/right halves carry
/// an opening on that boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideMask(u8);

impl SideMask {
    pub fn new(left: bool, right: bool) -> SideMask {
        SideMask((left as u8) | ((right as u8) << 1))
    }

    pub fn left(self) -> bool {
        self.0 & 1 != 0
    }

    pub fn right(self) -> bool {
        self.0 & 2 != 0
    }

    /// The mask as seen after mirroring the level horizontally.
    pub fn mirrored(self) -> SideMask {
        SideMask::new(self.right(), self.left())
    }
}

/// A typed object placed in a level, in level-local coordinates (pixels from
/// the level's top-left corner; rects are center + full size).
///
/// Decorative classes exist for the renderer and are ignored by chunk
/// instantiation. An unrecognized class fails JSON parsing outright — a
/// content error, not a runtime condition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Placement {
    Wall { x: f32, y: f32, w: f32, h: f32 },
    Water { x: f32, y: f32, w: f32, h: f32 },
    Torch { x: f32, y: f32 },
    Decor { x: f32, y: f32, sprite: String },
}

/// Read-only description of one level asset. The world never mutates these;
/// it samples them into chunks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelDescriptor {
    pub name: String,
    /// Side length of one tile in world units.
    pub tile_size: f32,
    /// Footprint in tiles. Every level in a library shares one footprint.
    pub width: u32,
    pub height: u32,
    pub enters_left: bool,
    pub enters_right: bool,
    pub exits_left: bool,
    pub exits_right: bool,
    #[serde(default)]
    pub placements: Vec<Placement>,
}

impl LevelDescriptor {
    pub fn entry_mask(&self) -> SideMask {
        SideMask::new(self.enters_left, self.enters_right)
    }

    pub fn exit_mask(&self) -> SideMask {
        SideMask::new(self.exits_left, self.exits_right)
    }

    /// Level footprint in world units.
    pub fn pixel_size(&self) -> Vec2 {
        Vec2::new(
            self.width as f32 * self.tile_size,
            self.height as f32 * self.tile_size,
        )
    }
}

/// The set of levels chunks are sampled from. Owned by the asset layer,
/// borrowed read-only by the world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelLibrary {
    levels: Vec<LevelDescriptor>,
}

impl LevelLibrary {
    /// Build a library, enforcing the content invariants every chunk
    /// generator relies on. Violations are content/build errors and panic.
    pub fn new(levels: Vec<LevelDescriptor>) -> Self {
        assert!(!levels.is_empty(), "level library is empty");
        let footprint = (levels[0].tile_size, levels[0].width, levels[0].height);
        for level in &levels {
            assert!(
                (level.tile_size, level.width, level.height) == footprint,
                "level {} does not share the library footprint",
                level.name
            );
        }
        LevelLibrary { levels }
    }

    /// Parse a library from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let parsed: LevelLibrary = serde_json::from_str(json)?;
        Ok(LevelLibrary::new(parsed.levels))
    }

    pub fn get(&self, index: usize) -> &LevelDescriptor {
        &self.levels[index]
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelDescriptor> {
        self.levels.iter()
    }

    /// The shared chunk footprint in world units.
    pub fn chunk_size(&self) -> Vec2 {
        self.levels[0].pixel_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library_json() -> &'static str {
        r#"{
            "levels": [
                {
                    "name": "drop_shaft",
                    "tile_size": 16.0,
                    "width": 20,
                    "height": 15,
                    "enters_left": true,
                    "enters_right": false,
                    "exits_left": false,
                    "exits_right": true,
                    "placements": [
                        { "kind": "wall", "x": 160.0, "y": 232.0, "w": 320.0, "h": 16.0 },
                        { "kind": "torch", "x": 48.0, "y": 120.0 },
                        { "kind": "decor", "x": 80.0, "y": 64.0, "sprite": "moss" }
                    ]
                },
                {
                    "name": "flooded_gallery",
                    "tile_size": 16.0,
                    "width": 20,
                    "height": 15,
                    "enters_left": false,
                    "enters_right": true,
                    "exits_left": true,
                    "exits_right": true,
                    "placements": [
                        { "kind": "water", "x": 160.0, "y": 200.0, "w": 128.0, "h": 32.0 }
                    ]
                }
            ]
        }"#
    }

    #[test]
    fn parses_levels_and_masks() {
        let lib = LevelLibrary::from_json(library_json()).unwrap();
        assert_eq!(lib.len(), 2);

        let shaft = lib.get(0);
        assert_eq!(shaft.name, "drop_shaft");
        assert!(shaft.entry_mask().left());
        assert!(!shaft.entry_mask().right());
        assert!(shaft.exit_mask().right());
        assert_eq!(shaft.placements.len(), 3);
    }

    #[test]
    fn mirrored_mask_swaps_sides() {
        let mask = SideMask::new(true, false);
        let flipped = mask.mirrored();
        assert!(!flipped.left());
        assert!(flipped.right());
        assert_eq!(mask.mirrored().mirrored(), mask);
    }

    #[test]
    fn chunk_size_from_footprint() {
        let lib = LevelLibrary::from_json(library_json()).unwrap();
        assert_eq!(lib.chunk_size(), Vec2::new(320.0, 240.0));
    }

    #[test]
    fn unknown_placement_kind_fails_parsing() {
        let json = r#"{
            "levels": [{
                "name": "bad",
                "tile_size": 16.0,
                "width": 20,
                "height": 15,
                "enters_left": true,
                "enters_right": true,
                "exits_left": true,
                "exits_right": true,
                "placements": [{ "kind": "teleporter", "x": 0.0, "y": 0.0 }]
            }]
        }"#;
        assert!(LevelLibrary::from_json(json).is_err());
    }

    #[test]
    #[should_panic(expected = "level library is empty")]
    fn empty_library_is_a_content_error() {
        let _ = LevelLibrary::new(Vec::new());
    }

    #[test]
    #[should_panic(expected = "does not share the library footprint")]
    fn mismatched_footprint_is_a_content_error() {
        let mut lib = LevelLibrary::from_json(library_json()).unwrap();
        let mut odd = lib.get(0).clone();
        odd.name = "odd_one".to_string();
        odd.width = 10;
        lib.levels.push(odd);
        let _ = LevelLibrary::new(lib.levels);
    }
}
