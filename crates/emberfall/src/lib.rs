pub mod api;
pub mod assets;
pub mod core;
pub mod entities;
pub mod geometry;
pub mod input;
pub mod level;
pub mod physics;
pub mod render;
pub mod world;

// Re-export key types at crate root for convenience
pub use api::types::{ChunkId, EntityId, GameEvent, TagSet};
pub use assets::{AssetCatalog, AssetId};
pub use crate::core::rng::{RandomSource, XorShiftRng};
pub use crate::core::time::{TickClock, MAX_TICKS_PER_FRAME, TICK_DT};
pub use entities::{Entity, EntityKind, LightSource, Player, Stalker, Torch, TorchMode};
pub use geometry::{hit_distance, hit_test, HitSide, Hitbox, EPSILON};
pub use input::{Action, InputSnapshot};
pub use level::{LevelDescriptor, LevelLibrary, Placement, SideMask};
pub use physics::{Contacts, Motion, MotionState, MAX_SPEED, MAX_SUBSTEP_ENERGY};
pub use render::{LightDraw, RenderBuffer, SpriteDraw, Surface};
pub use world::{Camera, Chunk, World, WorldConfig};
