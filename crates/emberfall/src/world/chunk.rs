use crate::api::types::ChunkId;
use crate::core::rng::RandomSource;
use crate::level::{LevelLibrary, SideMask};

/// One streamed segment of the shaft: a level asset stamped at
/// `id * chunk_height`, possibly mirrored.
#[derive(Debug, Clone)]
pub struct Chunk {
    pub id: ChunkId,
    /// Index into the level library.
    pub level: usize,
    pub flipped: bool,
    /// Set once the level's placements have been spawned as entities;
    /// instantiation happens exactly once per chunk.
    pub instantiated: bool,
}

impl Chunk {
    pub fn new(id: ChunkId, level: usize, flipped: bool) -> Self {
        Self {
            id,
            level,
            flipped,
            instantiated: false,
        }
    }

    /// The entry mask as seen in world space (flip-aware).
    pub fn entry_mask(&self, levels: &LevelLibrary) -> SideMask {
        let mask = levels.get(self.level).entry_mask();
        if self.flipped {
            mask.mirrored()
        } else {
            mask
        }
    }

    /// The exit mask as seen in world space (flip-aware).
    pub fn exit_mask(&self, levels: &LevelLibrary) -> SideMask {
        let mask = levels.get(self.level).exit_mask();
        if self.flipped {
            mask.mirrored()
        } else {
            mask
        }
    }
}

/// Pick the level and orientation for the chunk below one exiting through
/// `prev_exit`: uniform over every (level, orientation) whose world-space
/// entry mask matches. No match means the level set cannot continue the
/// shaft — a content error.
pub(crate) fn select_next(
    levels: &LevelLibrary,
    prev_exit: SideMask,
    rng: &mut dyn RandomSource,
) -> (usize, bool) {
    let mut candidates = Vec::new();
    for (index, level) in levels.iter().enumerate() {
        if level.entry_mask() == prev_exit {
            candidates.push((index, false));
        }
        if level.entry_mask().mirrored() == prev_exit {
            candidates.push((index, true));
        }
    }
    assert!(
        !candidates.is_empty(),
        "no level enters from {:?}",
        prev_exit
    );
    candidates[rng.next_int(candidates.len() as u32) as usize]
}
