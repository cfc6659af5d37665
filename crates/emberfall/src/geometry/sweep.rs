//! Swept (continuous) collision queries.
//!
//! `motion` is always the full substep displacement, not a unit direction.
//! A result `t` means: translating the moving shape by `t * motion` brings
//! it exactly into touch with the static shape. `t = 0` touching now,
//! `t > 0` touching later along the ray, `t < 0` already overlapping.
//!
//! Everything reduces to a point swept against a segment: the 2×2 linear
//! system `motion*s + half*u = target - point` solved for `(s, u)`, where a
//! touch requires `u` in [-1, 1]. Rect and circle movers reduce to a point
//! against the static shape inflated by the mover (Minkowski sum).

use glam::{Mat2, Vec2};

use super::shape::{Hitbox, EPSILON};

/// Which cardinal face of the static shape a sweep struck.
/// Y grows downward, so `Top` is the face with the smaller y.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitSide {
    Top,
    Bottom,
    Left,
    Right,
}

/// A swept contact: fraction of the motion at first touch plus the struck
/// face of the static shape.
#[derive(Debug, Clone, Copy)]
pub struct SweptContact {
    pub t: f32,
    pub side: HitSide,
}

/// Swept distance-to-contact. `None` when the shapes never touch along the
/// motion ray (parallel and degenerate cases included).
pub fn hit_distance(a: &Hitbox, b: &Hitbox, motion: Vec2) -> Option<f32> {
    hit_contact(a, b, motion).map(|c| c.t)
}

/// Swept contact query: `hit_distance` plus the struck face.
///
/// Implemented for a point against segment/rect/circle and for rect/circle
/// movers against rects and circles. Other pairs panic — a missing case is
/// a missing implementation and must surface, not hide.
pub fn hit_contact(a: &Hitbox, b: &Hitbox, motion: Vec2) -> Option<SweptContact> {
    match (*a, *b) {
        (Hitbox::Point { center: p }, Hitbox::Segment { center, half }) => {
            let t = point_vs_segment(p, center, half, motion)?;
            Some(SweptContact {
                t,
                side: side_from_normal(segment_normal_against(half, motion)),
            })
        }
        (Hitbox::Point { center: p }, Hitbox::Rect { center, half }) => {
            point_vs_rect(p, center, half, motion)
        }
        (Hitbox::Point { center: p }, Hitbox::Circle { center, radius }) => {
            point_vs_circle(p, center, radius, motion)
        }
        (Hitbox::Rect { center: ac, half: ah }, Hitbox::Rect { center: bc, half: bh }) => {
            point_vs_rect(ac, bc, bh + ah, motion)
        }
        (Hitbox::Circle { center: ac, radius: ar }, Hitbox::Rect { center: bc, half: bh }) => {
            point_vs_rounded_rect(ac, bc, bh, ar, motion)
        }
        (Hitbox::Rect { center: ac, half: ah }, Hitbox::Circle { center: bc, radius: br }) => {
            point_vs_rounded_rect(ac, bc, ah, br, motion)
        }
        (Hitbox::Circle { center: ac, radius: ar }, Hitbox::Circle { center: bc, radius: br }) => {
            point_vs_circle(ac, bc, ar + br, motion)
        }
        _ => panic!(
            "hit_distance not implemented for {} vs {}",
            a.kind_name(),
            b.kind_name()
        ),
    }
}

/// Core reduction: sweep a point along `motion` against a static segment.
fn point_vs_segment(p: Vec2, center: Vec2, half: Vec2, motion: Vec2) -> Option<f32> {
    let det = Mat2::from_cols(motion, half).determinant();
    if det.abs() < EPSILON {
        // motion parallel to the segment (or degenerate); never touches
        return None;
    }
    let rhs = center - p;
    // Cramer's rule on [motion | half] * (s, u)^T = rhs
    let s = (rhs.x * half.y - rhs.y * half.x) / det;
    let u = (motion.x * rhs.y - motion.y * rhs.x) / det;

    let over = u.abs() - 1.0;
    if over > EPSILON {
        return None;
    }
    if over >= -EPSILON {
        // grazing an endpoint: count it only when the motion actually crosses
        // the segment line; a near-parallel slide would otherwise flip-flop
        // between touch and miss on successive substeps
        let denom = motion.length() * half.length();
        if denom < EPSILON {
            return None;
        }
        let cos = motion.dot(half) / denom;
        if cos.abs() > 1.0 - EPSILON {
            return None;
        }
    }
    Some(s)
}

/// Sweep a point against a rect: minimum valid contact over the four edges.
fn point_vs_rect(p: Vec2, center: Vec2, half: Vec2, motion: Vec2) -> Option<SweptContact> {
    let edges = rect_edges(center, half, 0.0);
    let mut best: Option<SweptContact> = None;
    for (edge_center, edge_half, side) in edges {
        if let Some(t) = point_vs_segment(p, edge_center, edge_half, motion) {
            keep_nearest(&mut best, SweptContact { t, side });
        }
    }
    best
}

/// Sweep a point against a circle: smaller root of the contact quadratic.
fn point_vs_circle(p: Vec2, center: Vec2, radius: f32, motion: Vec2) -> Option<SweptContact> {
    let a = motion.length_squared();
    if a < EPSILON {
        return None;
    }
    let f = p - center;
    let b = 2.0 * f.dot(motion);
    let c = f.length_squared() - radius * radius;
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let t = (-b - disc.sqrt()) / (2.0 * a);
    let normal = f + motion * t;
    Some(SweptContact {
        t,
        side: side_from_normal(normal),
    })
}

/// Sweep a point against a rect inflated by a corner radius (the Minkowski
/// sum of a rect and a circle): four pushed-out edges plus four corner
/// circles, minimum valid contact.
fn point_vs_rounded_rect(
    p: Vec2,
    center: Vec2,
    half: Vec2,
    radius: f32,
    motion: Vec2,
) -> Option<SweptContact> {
    let mut best: Option<SweptContact> = None;
    for (edge_center, edge_half, side) in rect_edges(center, half, radius) {
        if let Some(t) = point_vs_segment(p, edge_center, edge_half, motion) {
            keep_nearest(&mut best, SweptContact { t, side });
        }
    }
    if radius > EPSILON {
        for corner in [
            center + Vec2::new(-half.x, -half.y),
            center + Vec2::new(half.x, -half.y),
            center + Vec2::new(-half.x, half.y),
            center + Vec2::new(half.x, half.y),
        ] {
            if let Some(contact) = point_vs_circle(p, corner, radius, motion) {
                keep_nearest(&mut best, contact);
            }
        }
    }
    best
}

/// The four edges of a rect, each pushed outward by `inflate` along its
/// face normal, as (center, half-extent, face) triples.
fn rect_edges(center: Vec2, half: Vec2, inflate: f32) -> [(Vec2, Vec2, HitSide); 4] {
    [
        (
            center + Vec2::new(0.0, -(half.y + inflate)),
            Vec2::new(half.x, 0.0),
            HitSide::Top,
        ),
        (
            center + Vec2::new(0.0, half.y + inflate),
            Vec2::new(half.x, 0.0),
            HitSide::Bottom,
        ),
        (
            center + Vec2::new(-(half.x + inflate), 0.0),
            Vec2::new(0.0, half.y),
            HitSide::Left,
        ),
        (
            center + Vec2::new(half.x + inflate, 0.0),
            Vec2::new(0.0, half.y),
            HitSide::Right,
        ),
    ]
}

fn keep_nearest(best: &mut Option<SweptContact>, candidate: SweptContact) {
    match best {
        Some(current) if current.t <= candidate.t => {}
        _ => *best = Some(candidate),
    }
}

/// Outward normal of a free segment, oriented against the motion so it
/// names the face that was actually struck.
fn segment_normal_against(half: Vec2, motion: Vec2) -> Vec2 {
    let n = half.perp();
    if n.dot(motion) > 0.0 {
        -n
    } else {
        n
    }
}

/// Classify a contact normal into the dominant cardinal face.
fn side_from_normal(normal: Vec2) -> HitSide {
    if normal.x.abs() > normal.y.abs() {
        if normal.x < 0.0 {
            HitSide::Left
        } else {
            HitSide::Right
        }
    } else if normal.y < 0.0 {
        HitSide::Top
    } else {
        HitSide::Bottom
    }
}
