use glam::Vec2;

use crate::api::types::{ChunkId, EntityId};
use crate::assets::AssetId;
use crate::core::time::TICK_DT;
use crate::entities::{self, Entity, EntityKind, LightSource};
use crate::geometry::Hitbox;
use crate::physics::{integrate_direct, resolve_swept};
use crate::world::World;

/// Total burn life in ticks (one minute).
const BURN_TICKS: u32 = 3600;
/// Over the last stretch of its life the light radius shrinks to nothing.
const DIM_TICKS: u32 = 600;
const LIGHT_RADIUS: f32 = 90.0;
/// Free-fall bounce response.
const RESTITUTION: f32 = 0.45;
const GROUND_FRICTION: f32 = 0.75;
/// Impacts slower than this stick instead of bouncing.
const BOUNCE_MIN_SPEED: f32 = 30.0;
/// Held torches chase their carry slot at this rate (per second)...
const CHASE_RATE: f32 = 12.0;
/// ...and snap in faster right after being grabbed.
const SNAP_RATE: f32 = 30.0;
const SNAP_TICKS: u64 = 12;

const HITBOX_RADIUS: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TorchMode {
    /// Falling and bouncing under physics.
    Free,
    /// Kinematically chasing a carry slot on the owner.
    Held {
        owner: EntityId,
        slot: usize,
        grabbed_tick: u64,
    },
}

/// A throwable, finite-life light source.
#[derive(Debug)]
pub struct Torch {
    pub mode: TorchMode,
    /// Remaining burn life in ticks; 0 = extinguished.
    pub burn_left: u32,
}

impl Torch {
    pub fn new() -> Self {
        Self {
            mode: TorchMode::Free,
            burn_left: BURN_TICKS,
        }
    }
}

impl Default for Torch {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a free torch entity at `pos`, optionally bound to a chunk.
pub fn entity(id: EntityId, chunk: Option<ChunkId>, pos: Vec2, sprite: AssetId) -> Entity {
    let mut torch = Entity::new(id, EntityKind::Torch(Torch::new()))
        .with_hitbox(Hitbox::circle(Vec2::ZERO, HITBOX_RADIUS))
        .with_physics()
        .at(pos)
        .with_light(LightSource::new(Vec2::new(0.0, -2.0), LIGHT_RADIUS, true))
        .with_sprite(sprite);
    if let Some(chunk) = chunk {
        torch = torch.bound_to(chunk);
    }
    torch
}

pub(crate) fn update(entity: &mut Entity, world: &mut World, tick: u64) {
    let mode = match &entity.kind {
        EntityKind::Torch(torch) => torch.mode,
        _ => return,
    };

    match mode {
        TorchMode::Held {
            owner,
            slot,
            grabbed_tick,
        } => {
            // the carry target depends on the owner's position this tick,
            // so force its update first (idempotent if it already ran)
            entities::update_entity(world, owner, tick);
            match carry_target(world, owner, slot) {
                Some(target) => {
                    let rate = if tick.saturating_sub(grabbed_tick) < SNAP_TICKS {
                        SNAP_RATE
                    } else {
                        CHASE_RATE
                    };
                    entity.motion.pending.vel = (target - entity.motion.current.pos) * rate;
                    entity.motion.pending.acc = Vec2::ZERO;
                    integrate_direct(&mut entity.motion, TICK_DT);
                }
                None => {
                    // owner vanished; drop back to free fall
                    if let EntityKind::Torch(torch) = &mut entity.kind {
                        torch.mode = TorchMode::Free;
                    }
                    entity.physics = true;
                }
            }
        }
        TorchMode::Free => {
            let colliders = world.solid_hitboxes_near(entity.motion.current.pos);
            let contacts = entity.motion.current.contacts;
            let impact = entity.motion.old.vel;
            let mut vel = entity.motion.current.vel;

            // bounce off whatever was struck last tick; the pre-impact
            // velocity survives in the old snapshot
            if contacts.ground {
                if impact.y > BOUNCE_MIN_SPEED {
                    vel.y = -impact.y * RESTITUTION;
                }
                vel.x *= GROUND_FRICTION;
            }
            if contacts.ceiling && impact.y < -BOUNCE_MIN_SPEED {
                vel.y = -impact.y * RESTITUTION;
            }
            if contacts.wall_left && impact.x < -BOUNCE_MIN_SPEED {
                vel.x = -impact.x * RESTITUTION;
            }
            if contacts.wall_right && impact.x > BOUNCE_MIN_SPEED {
                vel.x = -impact.x * RESTITUTION;
            }

            entity.motion.pending.vel = vel;
            entity.motion.pending.acc = Vec2::new(0.0, world.config().gravity);
            if let Some(hitbox) = entity.hitbox {
                resolve_swept(&mut entity.motion, &hitbox, &colliders, TICK_DT);
            }
        }
    }

    burn_down(entity);
}

/// Carry slots stack up and trail behind the owner in held order.
fn carry_target(world: &World, owner: EntityId, slot: usize) -> Option<Vec2> {
    let owner = world.entity(owner)?;
    let facing = match &owner.kind {
        EntityKind::Player(player) => player.facing,
        _ => 1.0,
    };
    let offset = Vec2::new(
        -facing * (12.0 + 6.0 * slot as f32),
        -18.0 - 6.0 * slot as f32,
    );
    Some(owner.pos() + offset)
}

/// Tick the burn life; the light shrinks through the dim phase, goes out at
/// zero, and a spent torch detaches once it is lying free.
fn burn_down(entity: &mut Entity) {
    let torch = match &mut entity.kind {
        EntityKind::Torch(torch) => torch,
        _ => return,
    };
    if torch.burn_left > 0 {
        torch.burn_left -= 1;
        let fade = (torch.burn_left as f32 / DIM_TICKS as f32).min(1.0);
        if let Some(light) = entity.lights.first_mut() {
            light.radius = LIGHT_RADIUS * fade;
            if torch.burn_left == 0 {
                light.visible = false;
            }
        }
    }
    if torch.burn_left == 0 && matches!(torch.mode, TorchMode::Free) {
        entity.detached = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Action;
    use crate::world::testutil::{run, world_with_floor};

    #[test]
    fn free_torch_bounces_off_the_floor() {
        let (mut world, _player) = world_with_floor();
        let torch = world.spawn_torch(Vec2::new(60.0, 120.0));

        let mut bounced = false;
        let mut tick = world.tick();
        for _ in 0..120 {
            tick += 1;
            world.advance_tick(tick);
            let vel = world.entity(torch).unwrap().motion.current.vel;
            if vel.y < -50.0 {
                bounced = true;
                break;
            }
        }
        assert!(bounced, "torch should rebound upward after impact");
    }

    #[test]
    fn free_torch_comes_to_rest_eventually() {
        let (mut world, _player) = world_with_floor();
        let torch = world.spawn_torch(Vec2::new(60.0, 150.0));
        run(&mut world, 400);

        let entity = world.entity(torch).unwrap();
        assert!(entity.motion.current.contacts.ground);
        assert!(
            entity.motion.current.vel.length() < 40.0,
            "vel = {:?}",
            entity.motion.current.vel
        );
    }

    #[test]
    fn held_torch_chases_its_carry_slot() {
        let (mut world, player) = world_with_floor();
        run(&mut world, 30);
        let player_pos = world.entity(player).unwrap().pos();
        let torch = world.spawn_torch(player_pos + Vec2::new(14.0, 0.0));

        let tick = world.tick() + 1;
        world.input_mut().press(Action::Use, tick);
        world.advance_tick(tick);
        run(&mut world, 40);

        let player_pos = world.entity(player).unwrap().pos();
        let torch_pos = world.entity(torch).unwrap().pos();
        // carried above the shoulder, trailing the facing direction
        assert!(torch_pos.y < player_pos.y, "torch at {:?}", torch_pos);
        assert!(
            torch_pos.distance(player_pos) < 40.0,
            "torch strayed {} units away",
            torch_pos.distance(player_pos)
        );
    }

    #[test]
    fn light_dims_through_the_final_phase() {
        let (mut world, _player) = world_with_floor();
        let torch = world.spawn_torch(Vec2::new(60.0, 150.0));
        match &mut world.entity_mut(torch).unwrap().kind {
            EntityKind::Torch(t) => t.burn_left = DIM_TICKS / 2,
            _ => unreachable!(),
        }
        run(&mut world, 2);

        let light = world.entity(torch).unwrap().lights[0];
        assert!(
            light.radius < LIGHT_RADIUS * 0.6,
            "radius = {}",
            light.radius
        );
        assert!(light.visible);
    }

    #[test]
    fn burned_out_free_torch_detaches() {
        let (mut world, _player) = world_with_floor();
        let torch = world.spawn_torch(Vec2::new(60.0, 150.0));
        match &mut world.entity_mut(torch).unwrap().kind {
            EntityKind::Torch(t) => t.burn_left = 3,
            _ => unreachable!(),
        }
        run(&mut world, 10);
        assert!(world.entity(torch).is_none(), "spent torch should be removed");
    }

    #[test]
    fn held_torch_survives_burnout_until_thrown() {
        let (mut world, player) = world_with_floor();
        run(&mut world, 30);
        let player_pos = world.entity(player).unwrap().pos();
        let torch = world.spawn_torch(player_pos + Vec2::new(14.0, 0.0));

        let tick = world.tick() + 1;
        world.input_mut().press(Action::Use, tick);
        world.advance_tick(tick);
        match &mut world.entity_mut(torch).unwrap().kind {
            EntityKind::Torch(t) => t.burn_left = 2,
            _ => unreachable!(),
        }
        run(&mut world, 10);

        // spent but still in hand
        let entity = world.entity(torch).expect("held torch stays attached");
        assert!(!entity.lights[0].visible);

        world.input_mut().release(Action::Use);
        run(&mut world, 3);
        assert!(world.entity(torch).is_none(), "released spent torch detaches");
    }
}
