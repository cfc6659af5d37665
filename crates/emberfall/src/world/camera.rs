use glam::Vec2;

/// Fraction of the remaining distance to the target the camera closes each
/// tick.
const FOLLOW_RATE: f32 = 0.12;

/// The descending shaft camera. Only the y target is ever derived; x stays
/// where construction put it (the shaft center).
#[derive(Debug, Clone)]
pub struct Camera {
    pub pos: Vec2,
    target_y: f32,
    /// Visible extent in world units.
    pub viewport: Vec2,
}

impl Camera {
    pub fn new(viewport: Vec2, start: Vec2) -> Self {
        Self {
            pos: start,
            target_y: start.y,
            viewport,
        }
    }

    pub fn target_y(&self) -> f32 {
        self.target_y
    }

    /// World-space y of the bottom edge of the view.
    pub fn view_bottom(&self) -> f32 {
        self.pos.y + self.viewport.y / 2.0
    }

    /// Derive the target from the player's progress through its chunk.
    ///
    /// The ease curve has zero slope at mid-chunk (the camera locks to the
    /// chunk while the player is inside it) and moves fastest at the
    /// boundaries. The target itself only ever moves down the shaft: jumping
    /// around near a boundary must not drag the view back up mid-transition.
    pub(crate) fn retarget(&mut self, player_y: f32, chunk_height: f32) {
        let chunk_top = (player_y / chunk_height).floor() * chunk_height;
        let progress = ((player_y - chunk_top) / chunk_height).clamp(0.0, 1.0);
        let target = chunk_top + chunk_ease(progress) * chunk_height;
        if target > self.target_y {
            self.target_y = target;
        }
    }

    /// Ease the position toward the target at a fixed per-tick rate.
    pub(crate) fn step(&mut self) {
        self.pos.y += (self.target_y - self.pos.y) * FOLLOW_RATE;
    }
}

/// Cubic ease over chunk progress: f(0) = 0, f(1) = 1, f'(0.5) = 0.
fn chunk_ease(progress: f32) -> f32 {
    let centered = progress - 0.5;
    0.5 + 4.0 * centered * centered * centered
}
