//! The energy-budgeted continuous-collision loop.
//!
//! Each physics entity gets one unit of "energy" per tick and spends it in
//! substeps of at most `MAX_SUBSTEP_ENERGY`. The ceiling bounds the distance
//! travelled per substep — which bounds the worst-case tunneling distance —
//! without forcing a globally small timestep on everything.

use glam::Vec2;

use crate::geometry::{hit_contact, hit_test, HitSide, Hitbox, EPSILON};
use crate::physics::state::{Contacts, Motion};

/// Per-substep energy ceiling. Fixed by design rather than derived from
/// entity speed or collider thickness; a mover faster than
/// `MAX_SPEED` against colliders thinner than
/// `MAX_SPEED * dt * MAX_SUBSTEP_ENERGY` retains a residual tunneling risk.
pub const MAX_SUBSTEP_ENERGY: f32 = 0.1;

/// Hard ceiling on substeps per tick. Ten full-budget substeps drain the
/// energy; the slack covers zero-distance contact substeps (a wedged corner
/// spends one substep per axis before the velocity is fully deflected).
pub const MAX_SUBSTEPS: u32 = 16;

/// Fastest speed the collision loop is documented to handle without
/// tunneling through the thinnest level geometry (one world unit):
/// `MAX_SPEED * TICK_DT * MAX_SUBSTEP_ENERGY == 1.0`.
pub const MAX_SPEED: f32 = 600.0;

/// Resolve one tick of movement for a physics-enabled entity.
///
/// `hitbox` is the entity's local-space shape, `colliders` the world-space
/// shapes of every nearby SOLID entity. On return the motion buffer is
/// committed: position advanced to the last non-penetrating point, contact
/// flags set for struck faces, and the velocity component into each touched
/// surface zeroed (sliding contact).
pub fn resolve_swept(motion: &mut Motion, hitbox: &Hitbox, colliders: &[Hitbox], dt: f32) {
    motion.snapshot();
    motion.pending.pos = motion.current.pos;
    motion.pending.vel += motion.pending.acc * dt;
    motion.pending.contacts = Contacts::default();
    motion.energy = 1.0;

    let mut steps = 0;
    while motion.energy > 0.0 {
        steps += 1;
        if steps > MAX_SUBSTEPS {
            log::warn!(
                "collision loop hit the {} substep ceiling with {:.3} energy left",
                MAX_SUBSTEPS,
                motion.energy
            );
            break;
        }

        let budget = motion.energy.min(MAX_SUBSTEP_ENERGY);
        let start = motion.pending.pos;
        let from = hitbox.translated(start);
        let full = motion.pending.vel * dt * budget;

        // Scan nearby solids. `scale` is the fraction of this substep's
        // displacement we may travel; each confirmed contact shrinks it and
        // the shrunken candidate filters the remaining colliders.
        let mut scale = 1.0_f32;
        let mut struck: Option<HitSide> = None;
        for solid in colliders {
            let candidate = hitbox.translated(start + full * scale);
            if hit_test(&candidate, solid).is_none() {
                continue;
            }
            let contact = match hit_contact(&from, solid, full) {
                Some(contact) => contact,
                None => continue,
            };
            if contact.t < -EPSILON {
                // inconsistent or penetrating geometry; skip this collider
                // for the substep rather than stalling the loop
                log::warn!(
                    "inconsistent swept contact (t = {:.6}) against {}; skipping for this substep",
                    contact.t,
                    solid.kind_name()
                );
                continue;
            }
            let t = contact.t.max(0.0);
            if t < scale {
                scale = t;
                struck = Some(contact.side);
            }
        }

        motion.pending.pos = start + full * scale;
        motion.energy -= budget * scale;

        if let Some(side) = struck {
            apply_contact(motion, side);
        }
    }

    motion.commit();
}

/// Non-physics entities skip the loop: translate directly and consume the
/// whole budget in one step.
pub fn integrate_direct(motion: &mut Motion, dt: f32) {
    motion.snapshot();
    motion.pending.vel += motion.pending.acc * dt;
    motion.pending.pos = motion.current.pos + motion.pending.vel * dt;
    motion.pending.contacts = Contacts::default();
    motion.energy = 0.0;
    motion.commit();
}

/// Record the struck face and zero the velocity component driving into it,
/// so the remaining substeps slide along the surface.
fn apply_contact(motion: &mut Motion, side: HitSide) {
    let contacts = &mut motion.pending.contacts;
    let vel = &mut motion.pending.vel;
    match side {
        // struck the collider's top face: we are standing on it
        HitSide::Top => {
            contacts.ground = true;
            if vel.y > 0.0 {
                vel.y = 0.0;
            }
        }
        HitSide::Bottom => {
            contacts.ceiling = true;
            if vel.y < 0.0 {
                vel.y = 0.0;
            }
        }
        // struck the collider's left face: the wall is on our right
        HitSide::Left => {
            contacts.wall_right = true;
            if vel.x > 0.0 {
                vel.x = 0.0;
            }
        }
        HitSide::Right => {
            contacts.wall_left = true;
            if vel.x < 0.0 {
                vel.x = 0.0;
            }
        }
    }
}
