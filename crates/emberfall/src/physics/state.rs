use glam::Vec2;

/// Which surfaces an entity is currently touching, refreshed every tick by
/// the collision loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contacts {
    /// Standing on something (collider below).
    pub ground: bool,
    /// Head against something (collider above).
    pub ceiling: bool,
    /// Wall flush on the entity's left.
    pub wall_left: bool,
    /// Wall flush on the entity's right.
    pub wall_right: bool,
}

impl Contacts {
    pub fn any(&self) -> bool {
        self.ground || self.ceiling || self.wall_left || self.wall_right
    }
}

/// One snapshot of an entity's kinematic state.
#[derive(Debug, Clone, Copy, Default)]
pub struct MotionState {
    pub pos: Vec2,
    pub vel: Vec2,
    pub acc: Vec2,
    pub contacts: Contacts,
}

/// The per-entity physics buffer: current state, the previous tick's state,
/// and the in-flight pending state.
///
/// Behaviors write `pending.vel`/`pending.acc`; the resolver fills in
/// `pending.pos` and `pending.contacts` and then commits. `pending` is only
/// meaningful during the tick that wrote it — two explicit structs and an
/// explicit commit, instead of trusting field-naming discipline.
#[derive(Debug, Clone, Default)]
pub struct Motion {
    pub current: MotionState,
    pub old: MotionState,
    pub pending: MotionState,
    /// Per-tick collision budget in [0, 1]; reset to 1 at the start of
    /// resolution and consumed to 0 by the substep loop.
    pub energy: f32,
}

impl Motion {
    /// Place an entity at `pos`, at rest. All three buffers agree.
    pub fn at(pos: Vec2) -> Self {
        let state = MotionState {
            pos,
            ..MotionState::default()
        };
        Motion {
            current: state,
            old: state,
            pending: state,
            energy: 0.0,
        }
    }

    /// Preserve the pre-tick state for behaviors that need impact velocity
    /// or last tick's contacts (e.g. bounce responses).
    pub fn snapshot(&mut self) {
        self.old = self.current;
    }

    /// The explicit commit step: pending becomes current.
    pub fn commit(&mut self) {
        self.current = self.pending;
    }
}
