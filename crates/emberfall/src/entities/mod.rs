pub mod player;
pub mod stalker;
pub mod terrain;
pub mod torch;

use std::cell::Cell;

use glam::Vec2;

use crate::api::types::{ChunkId, EntityId, TagSet};
use crate::assets::AssetId;
use crate::geometry::Hitbox;
use crate::physics::Motion;
use crate::world::World;

pub use player::Player;
pub use stalker::Stalker;
pub use torch::{Torch, TorchMode};

/// A light circle attached to an entity.
#[derive(Debug, Clone, Copy)]
pub struct LightSource {
    /// Offset from the entity position.
    pub offset: Vec2,
    pub radius: f32,
    pub visible: bool,
    /// Whether the light also calms the danger meter's *visual* mask.
    /// The danger scan itself counts every visible light regardless.
    pub soothes: bool,
}

impl LightSource {
    pub fn new(offset: Vec2, radius: f32, soothes: bool) -> Self {
        Self {
            offset,
            radius,
            visible: true,
            soothes,
        }
    }
}

/// The closed set of entity variants. Behavior is dispatched on this tag;
/// anything that needs to treat entities uniformly (collider scans, the
/// danger scan, rendering) goes through capability tags or shared fields
/// instead.
#[derive(Debug)]
pub enum EntityKind {
    Player(Player),
    Torch(Torch),
    Stalker(Stalker),
    Wall,
    Water,
}

impl EntityKind {
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Player(_) => "player",
            EntityKind::Torch(_) => "torch",
            EntityKind::Stalker(_) => "stalker",
            EntityKind::Wall => "wall",
            EntityKind::Water => "water",
        }
    }
}

/// Fat entity — one struct, optional capabilities. Owned exclusively by the
/// `World` registry.
#[derive(Debug)]
pub struct Entity {
    pub id: EntityId,
    /// Chunk affiliation; `None` marks a global, always-simulated entity.
    pub chunk: Option<ChunkId>,
    pub tags: TagSet,
    /// Local-space collision shape, if any.
    pub hitbox: Option<Hitbox>,
    /// Whether movement goes through the swept-collision loop.
    pub physics: bool,
    pub motion: Motion,
    pub lights: Vec<LightSource>,
    pub sprite: Option<AssetId>,
    /// Marked by behaviors to request removal at end of tick.
    pub detached: bool,
    /// Guards against double updates when a dependency forces an early one.
    pub last_update_tick: Option<u64>,
    pub kind: EntityKind,
    /// World-space hitbox memo, keyed by the position it was derived at.
    world_hitbox_memo: Cell<Option<(Vec2, Hitbox)>>,
}

impl Entity {
    pub fn new(id: EntityId, kind: EntityKind) -> Self {
        Self {
            id,
            chunk: None,
            tags: TagSet::EMPTY,
            hitbox: None,
            physics: false,
            motion: Motion::default(),
            lights: Vec::new(),
            sprite: None,
            detached: false,
            last_update_tick: None,
            kind,
            world_hitbox_memo: Cell::new(None),
        }
    }

    // -- Builder pattern --

    pub fn bound_to(mut self, chunk: ChunkId) -> Self {
        self.chunk = Some(chunk);
        self
    }

    pub fn with_tags(mut self, tags: TagSet) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_hitbox(mut self, hitbox: Hitbox) -> Self {
        self.hitbox = Some(hitbox);
        self
    }

    pub fn with_physics(mut self) -> Self {
        self.physics = true;
        self
    }

    pub fn at(mut self, pos: Vec2) -> Self {
        self.motion = Motion::at(pos);
        self
    }

    pub fn with_light(mut self, light: LightSource) -> Self {
        self.lights.push(light);
        self
    }

    pub fn with_sprite(mut self, sprite: AssetId) -> Self {
        self.sprite = Some(sprite);
        self
    }

    // -- Queries --

    pub fn pos(&self) -> Vec2 {
        self.motion.current.pos
    }

    /// The entity's hitbox in world space, derived from the local shape and
    /// the current position. Memoized; recomputed only when the position
    /// has changed since the last derivation.
    pub fn world_hitbox(&self) -> Option<Hitbox> {
        let local = self.hitbox?;
        let pos = self.motion.current.pos;
        if let Some((at, memo)) = self.world_hitbox_memo.get() {
            if at == pos {
                return Some(memo);
            }
        }
        let world = local.translated(pos);
        self.world_hitbox_memo.set(Some((pos, world)));
        Some(world)
    }

    /// World-space circles of the currently visible attached lights.
    pub fn visible_lights(&self) -> impl Iterator<Item = (Hitbox, &LightSource)> {
        let pos = self.motion.current.pos;
        self.lights
            .iter()
            .filter(|l| l.visible)
            .map(move |l| (Hitbox::circle(pos + l.offset, l.radius), l))
    }
}

/// Run one entity's per-tick update, dispatched on its variant tag.
///
/// Idempotent per tick: the update stamp is written before the behavior
/// runs, so a behavior that forces an early update of a dependency (a held
/// torch updating its owner first) cannot cause a double update. The entity
/// is taken out of the registry for the duration so its behavior can borrow
/// the world freely; secondary indices are untouched by the round trip.
pub(crate) fn update_entity(world: &mut World, id: EntityId, tick: u64) {
    let mut entity = match world.take_entity(id) {
        Some(entity) => entity,
        None => return,
    };
    if entity.last_update_tick == Some(tick) {
        world.put_entity(entity);
        return;
    }
    entity.last_update_tick = Some(tick);

    match entity.kind {
        EntityKind::Player(_) => player::update(&mut entity, world, tick),
        EntityKind::Torch(_) => torch::update(&mut entity, world, tick),
        EntityKind::Stalker(_) => stalker::update(&mut entity, world, tick),
        // pure tag-bearing geometry; nothing to do
        EntityKind::Wall | EntityKind::Water => {}
    }

    world.put_entity(entity);
}
