use std::f32::consts::PI;

use glam::Vec2;

use crate::api::types::{EntityId, TagSet};
use crate::assets::AssetId;
use crate::core::time::TICK_DT;
use crate::entities::{Entity, EntityKind, LightSource};
use crate::geometry::{hit_test, Hitbox};
use crate::physics::integrate_direct;
use crate::world::World;

const BASE_SPEED: f32 = 40.0;
const BASE_TURN_RATE: f32 = 1.2;
/// Escalation applied every tick: multiplicative growth plus a flat boost,
/// with no ceiling. The longer it lives, the worse it gets. The turn rate
/// grows faster than the speed so the turning radius tightens over time —
/// circling just out of reach only works for a while.
const SPEED_GROWTH: f32 = 1.0008;
const SPEED_BOOST: f32 = 0.02;
const TURN_GROWTH: f32 = 1.0012;
const TURN_BOOST: f32 = 0.0005;
/// Below this danger level its light flickers in and out.
const FLICKER_BELOW: f32 = 0.35;
const LIGHT_RADIUS: f32 = 60.0;

const HITBOX_RADIUS: f32 = 10.0;

/// The pursuing hazard. Ignores level geometry entirely; it only ever
/// steers toward its target.
#[derive(Debug)]
pub struct Stalker {
    /// Current heading in radians.
    pub heading: f32,
    pub speed: f32,
    pub turn_rate: f32,
}

impl Stalker {
    pub fn new() -> Self {
        Self {
            heading: PI / 2.0,
            speed: BASE_SPEED,
            turn_rate: BASE_TURN_RATE,
        }
    }
}

impl Default for Stalker {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the stalker as a global (always-simulated) entity.
pub fn entity(id: EntityId, pos: Vec2, sprite: AssetId) -> Entity {
    Entity::new(id, EntityKind::Stalker(Stalker::new()))
        .with_hitbox(Hitbox::circle(Vec2::ZERO, HITBOX_RADIUS))
        .at(pos)
        .with_light(LightSource::new(Vec2::ZERO, LIGHT_RADIUS, false))
        .with_sprite(sprite)
}

pub(crate) fn update(entity: &mut Entity, world: &mut World, _tick: u64) {
    let target = match world.find_tagged(TagSet::HAZARD_TARGET) {
        Some(id) => id,
        None => return,
    };
    let target_pos = match world.entity(target) {
        Some(target) => target.pos(),
        None => return,
    };
    let target_hitbox = world.entity(target).and_then(|t| t.world_hitbox());

    let pos = entity.motion.current.pos;
    let stalker = match &mut entity.kind {
        EntityKind::Stalker(stalker) => stalker,
        _ => return,
    };

    // steer toward the target at a bounded angular rate
    let to_target = target_pos - pos;
    if to_target.length_squared() > 1e-6 {
        let desired = to_target.y.atan2(to_target.x);
        let delta = wrap_angle(desired - stalker.heading);
        let max_turn = stalker.turn_rate * TICK_DT;
        stalker.heading = wrap_angle(stalker.heading + delta.clamp(-max_turn, max_turn));
    }

    entity.motion.pending.vel = Vec2::from_angle(stalker.heading) * stalker.speed;
    entity.motion.pending.acc = Vec2::ZERO;

    stalker.speed = stalker.speed * SPEED_GROWTH + SPEED_BOOST;
    stalker.turn_rate = stalker.turn_rate * TURN_GROWTH + TURN_BOOST;

    integrate_direct(&mut entity.motion, TICK_DT);

    // its light is unreliable while danger is still low
    let flicker = world.danger() < FLICKER_BELOW;
    if let Some(light) = entity.lights.first_mut() {
        light.visible = if flicker {
            world.rng_mut().next_int(8) != 0
        } else {
            true
        };
    }

    // touching the target ends the session — the designed game over
    if let (Some(own), Some(theirs)) = (entity.world_hitbox(), target_hitbox) {
        if hit_test(&own, &theirs).is_some() {
            world.end_session();
        }
    }
}

fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(2.0 * PI) - PI
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_angle_stays_in_range() {
        for raw in [-10.0, -PI, -0.5, 0.0, 0.5, PI, 10.0] {
            let wrapped = wrap_angle(raw);
            assert!(
                (-PI..=PI).contains(&wrapped),
                "wrap_angle({}) = {}",
                raw,
                wrapped
            );
        }
    }

    #[test]
    fn wrap_angle_identity_inside_range() {
        assert!((wrap_angle(0.5) - 0.5).abs() < 1e-6);
        assert!((wrap_angle(-0.5) - -0.5).abs() < 1e-6);
    }

    #[test]
    fn wrap_angle_shortest_path() {
        // 350° away clockwise is 10° counter-clockwise
        let delta = wrap_angle(350.0_f32.to_radians());
        assert!((delta - -(10.0_f32.to_radians())).abs() < 1e-4, "delta = {}", delta);
    }
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::world::testutil::{run, world_with_floor};

    fn spawn_stalker_at(world: &mut crate::world::World, pos: Vec2) -> EntityId {
        let id = world.next_entity_id();
        world.spawn(entity(id, pos, crate::assets::AssetId(4)))
    }

    #[test]
    fn closes_in_on_the_player() {
        let (mut world, player) = world_with_floor();
        let player_pos = world.entity(player).unwrap().pos();
        let stalker = spawn_stalker_at(&mut world, player_pos - Vec2::new(0.0, 200.0));

        let start = world
            .entity(stalker)
            .unwrap()
            .pos()
            .distance(player_pos);
        run(&mut world, 90);
        let player_pos = world.entity(player).unwrap().pos();
        let now = world.entity(stalker).unwrap().pos().distance(player_pos);
        assert!(now < start, "distance grew: {} -> {}", start, now);
    }

    #[test]
    fn speed_escalates_without_bound() {
        let (mut world, _player) = world_with_floor();
        let stalker = spawn_stalker_at(&mut world, Vec2::new(160.0, -400.0));

        let speed_at = |world: &crate::world::World| match &world.entity(stalker).unwrap().kind {
            EntityKind::Stalker(s) => (s.speed, s.turn_rate),
            _ => unreachable!(),
        };
        let (speed_before, turn_before) = speed_at(&world);
        run(&mut world, 120);
        let (speed_after, turn_after) = speed_at(&world);
        assert!(speed_after > speed_before);
        assert!(turn_after > turn_before);
    }

    #[test]
    fn touching_the_player_ends_the_session() {
        let (mut world, player) = world_with_floor();
        run(&mut world, 30);
        // straight above, heading already pointing down at the target
        let player_pos = world.entity(player).unwrap().pos();
        spawn_stalker_at(&mut world, player_pos - Vec2::new(0.0, 60.0));

        run(&mut world, 150);
        assert!(world.session_over());
    }

    #[test]
    fn ignores_level_geometry() {
        // a stalker buried inside a wall still moves: it never collides
        let (mut world, _player) = world_with_floor();
        let stalker = spawn_stalker_at(&mut world, Vec2::new(160.0, 220.0));
        let start = world.entity(stalker).unwrap().pos();
        run(&mut world, 10);
        assert!(world.entity(stalker).unwrap().pos() != start);
    }
}
