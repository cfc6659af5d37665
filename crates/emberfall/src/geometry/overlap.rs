use glam::Vec2;

use super::shape::{Hitbox, EPSILON};

/// Static overlap query. Returns the penetration vector that would move `a`
/// out of `b`, or `None` when the shapes do not strictly overlap (touching
/// exactly is not overlap).
///
/// Implemented for {Rect,Rect}, {Rect,Circle}, {Circle,Rect} and
/// {Circle,Circle}. Any other pair panics: a missing case is a missing
/// implementation, not a runtime condition, and must surface loudly.
pub fn hit_test(a: &Hitbox, b: &Hitbox) -> Option<Vec2> {
    match (*a, *b) {
        (Hitbox::Rect { center: ac, half: ah }, Hitbox::Rect { center: bc, half: bh }) => {
            rect_rect(ac, ah, bc, bh)
        }
        (Hitbox::Rect { center: ac, half: ah }, Hitbox::Circle { center: bc, radius: br }) => {
            rect_circle(ac, ah, bc, br)
        }
        (Hitbox::Circle { .. }, Hitbox::Rect { .. }) => hit_test(b, a).map(|v| -v),
        (Hitbox::Circle { center: ac, radius: ar }, Hitbox::Circle { center: bc, radius: br }) => {
            circle_circle(ac, ar, bc, br)
        }
        _ => panic!(
            "hit_test not implemented for {} vs {}",
            a.kind_name(),
            b.kind_name()
        ),
    }
}

fn rect_rect(ac: Vec2, ah: Vec2, bc: Vec2, bh: Vec2) -> Option<Vec2> {
    let d = bc - ac;
    let overlap = ah + bh - d.abs();
    if overlap.x <= 0.0 || overlap.y <= 0.0 {
        return None;
    }
    // per-axis signed overlap, pointing away from b on both axes
    let sx = if d.x >= 0.0 { -1.0 } else { 1.0 };
    let sy = if d.y >= 0.0 { -1.0 } else { 1.0 };
    Some(Vec2::new(overlap.x * sx, overlap.y * sy))
}

fn rect_circle(ac: Vec2, ah: Vec2, bc: Vec2, br: f32) -> Option<Vec2> {
    let closest = bc.clamp(ac - ah, ac + ah);
    let delta = bc - closest;
    let dist_sq = delta.length_squared();
    if dist_sq >= br * br {
        return None;
    }
    let dist = dist_sq.sqrt();
    if dist > EPSILON {
        // circle center outside the rect: push along the closest-point axis
        return Some(-(delta / dist) * (br - dist));
    }
    // circle center inside the rect: fall back to the per-axis overlap of the
    // circle's bounding square
    rect_rect(ac, ah, bc, Vec2::splat(br))
}

fn circle_circle(ac: Vec2, ar: f32, bc: Vec2, br: f32) -> Option<Vec2> {
    let d = bc - ac;
    let sum = ar + br;
    let dist_sq = d.length_squared();
    if dist_sq >= sum * sum {
        return None;
    }
    let dist = dist_sq.sqrt();
    // concentric circles have no preferred direction; pick one
    let dir = if dist > EPSILON { d / dist } else { Vec2::X };
    Some(-dir * (sum - dist))
}
