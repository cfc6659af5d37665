use glam::Vec2;

use crate::api::types::{EntityId, TagSet};
use crate::assets::AssetId;
use crate::core::time::TICK_DT;
use crate::entities::{Entity, EntityKind, TorchMode};
use crate::geometry::Hitbox;
use crate::input::Action;
use crate::physics::resolve_swept;
use crate::world::World;

// Movement tuning. World units are pixels at a 16 px tile.
const RUN_ACCEL: f32 = 1800.0;
const MAX_RUN_SPEED: f32 = 160.0;
/// Per-tick horizontal decay while grounded with no input held.
const GROUND_DRAG: f32 = 0.78;
const JUMP_SPEED: f32 = -320.0;
/// Grace window after leaving the ground during which a jump still fires.
const COYOTE_TICKS: u64 = 6;
/// A ceiling hit within this window of the jump starts the gravity hold.
const BONK_WINDOW_TICKS: u64 = 10;
/// Gravity stays suspended this long after a head bonk.
const BONK_HOLD_TICKS: u64 = 12;
/// Per-tick velocity decay while overlapping water.
const SWIM_DRAG: f32 = 0.92;
const SWIM_GRAVITY_SCALE: f32 = 0.4;
const GRAB_RANGE: f32 = 28.0;
/// Holding Use this long charges a throw to full power.
const CHARGE_FULL_TICKS: u64 = 45;
const THROW_MIN_SPEED: f32 = 120.0;
const THROW_MAX_SPEED: f32 = 420.0;

const HITBOX_HALF: Vec2 = Vec2::new(6.0, 10.0);

/// Player control state. The motion itself lives in the shared physics
/// buffer; this is only what the control policy needs to remember.
#[derive(Debug)]
pub struct Player {
    /// Last non-zero horizontal input direction (-1 or 1).
    pub facing: f32,
    pub last_grounded: Option<u64>,
    /// Set on jump, cleared on the next ground contact; blocks re-jumps
    /// inside the coyote window.
    pub jumped_since_ground: bool,
    pub jump_tick: Option<u64>,
    /// Gravity is suspended until this tick after a head bonk.
    pub float_until: Option<u64>,
    /// Held torches, newest last. The slot index is the position here.
    pub held: Vec<EntityId>,
    /// Tick at which the current Use press began, for the throw charge.
    pub charge_since: Option<u64>,
}

impl Player {
    pub fn new() -> Self {
        Self {
            facing: 1.0,
            last_grounded: None,
            jumped_since_ground: false,
            jump_tick: None,
            float_until: None,
            held: Vec::new(),
            charge_since: None,
        }
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a player entity at `pos`.
pub fn entity(id: EntityId, pos: Vec2, sprite: AssetId) -> Entity {
    Entity::new(id, EntityKind::Player(Player::new()))
        .with_tags(TagSet::HAZARD_TARGET)
        .with_hitbox(Hitbox::rect(Vec2::ZERO, HITBOX_HALF))
        .with_physics()
        .at(pos)
        .with_sprite(sprite)
}

pub(crate) fn update(entity: &mut Entity, world: &mut World, tick: u64) {
    let input = *world.input();
    let gravity = world.config().gravity;
    let pos = entity.motion.current.pos;
    let colliders = world.solid_hitboxes_near(pos);
    let in_water = match entity.world_hitbox() {
        Some(hb) => world.overlaps_tag(&hb, TagSet::LIQUID),
        None => false,
    };
    let contacts = entity.motion.current.contacts;
    let mut vel = entity.motion.current.vel;

    let player = match &mut entity.kind {
        EntityKind::Player(player) => player,
        _ => return,
    };

    if contacts.ground {
        player.last_grounded = Some(tick);
        player.jumped_since_ground = false;
    }

    // -- horizontal drive --
    let mut drive = 0.0;
    if input.active(Action::Left) {
        drive -= 1.0;
    }
    if input.active(Action::Right) {
        drive += 1.0;
    }
    if drive != 0.0 {
        player.facing = drive;
        vel.x += drive * RUN_ACCEL * TICK_DT;
    } else if contacts.ground {
        vel.x *= GROUND_DRAG;
    }
    vel.x = vel.x.clamp(-MAX_RUN_SPEED, MAX_RUN_SPEED);

    // -- jump --
    // Edge-triggered; allowed within the coyote window after leaving the
    // ground, but only once until the next ground contact.
    let jump_pressed = input.pressed_at(Action::Jump) == Some(tick);
    let recently_grounded = player
        .last_grounded
        .map_or(false, |t| tick - t <= COYOTE_TICKS);
    if jump_pressed && recently_grounded && !player.jumped_since_ground {
        vel.y = JUMP_SPEED;
        player.jumped_since_ground = true;
        player.jump_tick = Some(tick);
    }

    // -- head bonk float --
    if contacts.ceiling
        && player
            .jump_tick
            .map_or(false, |t| tick - t <= BONK_WINDOW_TICKS)
    {
        player.float_until = Some(tick + BONK_HOLD_TICKS);
    }
    let floating = player.float_until.map_or(false, |t| tick < t);

    let mut gravity_scale = if floating { 0.0 } else { 1.0 };
    if in_water {
        gravity_scale *= SWIM_GRAVITY_SCALE;
        vel *= SWIM_DRAG;
    }

    entity.motion.pending.vel = vel;
    entity.motion.pending.acc = Vec2::new(0.0, gravity * gravity_scale);
    if let Some(hitbox) = entity.hitbox {
        resolve_swept(&mut entity.motion, &hitbox, &colliders, TICK_DT);
    }

    handle_torches(entity, world, tick, &input);
}

/// Grab on Use press, throw the newest held torch on release with a
/// charge-duration → power curve.
fn handle_torches(entity: &mut Entity, world: &mut World, tick: u64, input: &crate::input::InputSnapshot) {
    let pos = entity.motion.current.pos;
    let id = entity.id;
    let use_pressed = input.pressed_at(Action::Use) == Some(tick);
    let use_active = input.active(Action::Use);

    let player = match &mut entity.kind {
        EntityKind::Player(player) => player,
        _ => return,
    };

    if use_pressed {
        player.charge_since = Some(tick);
        if let Some(torch_id) = nearest_free_torch(world, pos) {
            let slot = player.held.len();
            if let Some(torch_entity) = world.entity_mut(torch_id) {
                torch_entity.physics = false;
                if let EntityKind::Torch(torch) = &mut torch_entity.kind {
                    torch.mode = TorchMode::Held {
                        owner: id,
                        slot,
                        grabbed_tick: tick,
                    };
                }
                player.held.push(torch_id);
            }
        }
    }

    if !use_active {
        if let Some(since) = player.charge_since.take() {
            if let Some(torch_id) = player.held.last().copied() {
                let charge =
                    (tick.saturating_sub(since) as f32 / CHARGE_FULL_TICKS as f32).min(1.0);
                // ease-out: most of the power arrives early in the charge
                let power = charge * (2.0 - charge);
                let speed = THROW_MIN_SPEED + (THROW_MAX_SPEED - THROW_MIN_SPEED) * power;
                let vel = Vec2::new(player.facing * speed, -0.45 * speed);
                if let Some(torch_entity) = world.entity_mut(torch_id) {
                    torch_entity.physics = true;
                    torch_entity.motion.current.vel = vel;
                    torch_entity.motion.pending.vel = vel;
                    if let EntityKind::Torch(torch) = &mut torch_entity.kind {
                        torch.mode = TorchMode::Free;
                    }
                    player.held.pop();
                }
            }
        }
    }
}

fn nearest_free_torch(world: &World, pos: Vec2) -> Option<EntityId> {
    let mut best: Option<(f32, EntityId)> = None;
    for id in world.query_nearby(pos, 1) {
        let candidate = match world.entity(id) {
            Some(candidate) => candidate,
            None => continue,
        };
        if let EntityKind::Torch(torch) = &candidate.kind {
            if !matches!(torch.mode, TorchMode::Free) {
                continue;
            }
            let dist_sq = candidate.pos().distance_squared(pos);
            if dist_sq <= GRAB_RANGE * GRAB_RANGE
                && best.map_or(true, |(b, _)| dist_sq < b)
            {
                best = Some((dist_sq, id));
            }
        }
    }
    best.map(|(_, id)| id)
}
