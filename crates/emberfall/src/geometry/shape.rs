use glam::Vec2;

/// Tolerance for "nearly singular" and "nearly touching" checks across the
/// whole geometry layer.
pub const EPSILON: f32 = 1e-8;

/// Immutable collision shape. All variants are value types translatable by
/// an offset; entities keep one in local space and derive the world-space
/// copy from their position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hitbox {
    Point { center: Vec2 },
    /// Center plus a half-extent vector; the segment runs from
    /// `center - half` to `center + half`.
    Segment { center: Vec2, half: Vec2 },
    /// Axis-aligned rectangle as center plus half-extents.
    Rect { center: Vec2, half: Vec2 },
    Circle { center: Vec2, radius: f32 },
}

impl Hitbox {
    pub fn point(center: Vec2) -> Hitbox {
        assert_finite(center, "point center");
        Hitbox::Point { center }
    }

    pub fn segment(center: Vec2, half: Vec2) -> Hitbox {
        assert_finite(center, "segment center");
        assert_finite(half, "segment half-extent");
        Hitbox::Segment { center, half }
    }

    pub fn rect(center: Vec2, half: Vec2) -> Hitbox {
        assert_finite(center, "rect center");
        assert_finite(half, "rect half-extent");
        Hitbox::Rect { center, half }
    }

    pub fn circle(center: Vec2, radius: f32) -> Hitbox {
        assert_finite(center, "circle center");
        assert!(radius.is_finite(), "non-finite circle radius: {}", radius);
        Hitbox::Circle { center, radius }
    }

    pub fn center(&self) -> Vec2 {
        match *self {
            Hitbox::Point { center }
            | Hitbox::Segment { center, .. }
            | Hitbox::Rect { center, .. }
            | Hitbox::Circle { center, .. } => center,
        }
    }

    /// The same shape moved by `offset`.
    pub fn translated(&self, offset: Vec2) -> Hitbox {
        match *self {
            Hitbox::Point { center } => Hitbox::Point { center: center + offset },
            Hitbox::Segment { center, half } => Hitbox::Segment { center: center + offset, half },
            Hitbox::Rect { center, half } => Hitbox::Rect { center: center + offset, half },
            Hitbox::Circle { center, radius } => Hitbox::Circle { center: center + offset, radius },
        }
    }

    /// Short variant name for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Hitbox::Point { .. } => "Point",
            Hitbox::Segment { .. } => "Segment",
            Hitbox::Rect { .. } => "Rect",
            Hitbox::Circle { .. } => "Circle",
        }
    }
}

/// Non-finite components mean corrupted physics state; reject them where
/// they first appear instead of letting NaN propagate through the solver.
fn assert_finite(v: Vec2, what: &str) {
    assert!(
        v.x.is_finite() && v.y.is_finite(),
        "non-finite {}: ({}, {})",
        what,
        v.x,
        v.y
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translated_moves_center_only() {
        let rect = Hitbox::rect(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0));
        let moved = rect.translated(Vec2::new(10.0, -10.0));
        assert_eq!(moved, Hitbox::rect(Vec2::new(11.0, -8.0), Vec2::new(3.0, 4.0)));
    }

    #[test]
    fn center_of_each_variant() {
        let c = Vec2::new(5.0, 6.0);
        assert_eq!(Hitbox::point(c).center(), c);
        assert_eq!(Hitbox::segment(c, Vec2::X).center(), c);
        assert_eq!(Hitbox::rect(c, Vec2::ONE).center(), c);
        assert_eq!(Hitbox::circle(c, 2.0).center(), c);
    }

    #[test]
    #[should_panic(expected = "non-finite")]
    fn nan_center_rejected_at_construction() {
        let _ = Hitbox::rect(Vec2::new(f32::NAN, 0.0), Vec2::ONE);
    }

    #[test]
    #[should_panic(expected = "non-finite circle radius")]
    fn infinite_radius_rejected() {
        let _ = Hitbox::circle(Vec2::ZERO, f32::INFINITY);
    }
}
