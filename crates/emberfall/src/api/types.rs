/// Unique identifier for an entity in the world.
/// Ids are handed out by a monotonic counter and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u64);

/// Identifier of a vertically-stacked world chunk.
/// Chunk 0 is the topmost; ids grow as the player descends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkId(pub u32);

impl ChunkId {
    pub fn next(self) -> ChunkId {
        ChunkId(self.0 + 1)
    }
}

/// Set of capability tags carried by an entity.
///
/// The physics core and the world filter entities by capability, never by
/// variant identity — a new variant joins the collider scan by carrying
/// `SOLID`, not by being special-cased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TagSet(u32);

impl TagSet {
    pub const EMPTY: TagSet = TagSet(0);
    /// Static collider consumed by the swept-collision scan.
    pub const SOLID: TagSet = TagSet(1);
    /// Liquid marker; damps movement of entities that care to check.
    pub const LIQUID: TagSet = TagSet(1 << 1);
    /// The pursuing hazard hunts entities with this tag.
    pub const HAZARD_TARGET: TagSet = TagSet(1 << 2);

    pub fn with(self, other: TagSet) -> TagSet {
        TagSet(self.0 | other.0)
    }

    /// True when every tag in `other` is present in `self`.
    pub fn contains(self, other: TagSet) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// A simulation event surfaced to the embedding host.
/// Drained by the caller after each batch of ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Danger saturated; the stalker is now live.
    StalkerSpawned,
    /// Danger fully soothed while the stalker was live; it is gone.
    StalkerGone,
    /// The stalker touched the player. Gameplay outcome, not an error.
    SessionOver,
}
