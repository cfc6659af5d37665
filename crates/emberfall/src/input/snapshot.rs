/// Normalized input consumed by the simulation.
/// Device binding lives in the embedding host; the core only sees, per
/// action, the tick at which the action became active — or nothing.

/// The fixed set of player actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Jump,
    Left,
    Right,
    Down,
    Use,
    Debug,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Jump,
        Action::Left,
        Action::Right,
        Action::Down,
        Action::Use,
        Action::Debug,
    ];

    fn index(self) -> usize {
        match self {
            Action::Jump => 0,
            Action::Left => 1,
            Action::Right => 2,
            Action::Down => 3,
            Action::Use => 4,
            Action::Debug => 5,
        }
    }
}

/// Per-action activation stamps. `None` = inactive; `Some(t)` = active since
/// tick `t`. Behaviors derive both edges ("pressed this tick") and hold
/// durations (throw charge) from the stamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    stamps: [Option<u64>; 6],
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an action active as of `tick`. Repeated presses while already
    /// active keep the original stamp.
    pub fn press(&mut self, action: Action, tick: u64) {
        let slot = &mut self.stamps[action.index()];
        if slot.is_none() {
            *slot = Some(tick);
        }
    }

    pub fn release(&mut self, action: Action) {
        self.stamps[action.index()] = None;
    }

    pub fn active(&self, action: Action) -> bool {
        self.stamps[action.index()].is_some()
    }

    /// The tick at which the action became active.
    pub fn pressed_at(&self, action: Action) -> Option<u64> {
        self.stamps[action.index()]
    }

    /// How many ticks the action has been held as of `now`.
    pub fn held_for(&self, action: Action, now: u64) -> Option<u64> {
        self.stamps[action.index()].map(|since| now.saturating_sub(since))
    }

    pub fn clear(&mut self) {
        self.stamps = [None; 6];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_records_activation_tick() {
        let mut input = InputSnapshot::new();
        input.press(Action::Jump, 42);
        assert!(input.active(Action::Jump));
        assert_eq!(input.pressed_at(Action::Jump), Some(42));
        assert!(!input.active(Action::Left));
    }

    #[test]
    fn repeat_press_keeps_original_stamp() {
        let mut input = InputSnapshot::new();
        input.press(Action::Use, 10);
        input.press(Action::Use, 20);
        assert_eq!(input.pressed_at(Action::Use), Some(10));
    }

    #[test]
    fn release_clears_the_stamp() {
        let mut input = InputSnapshot::new();
        input.press(Action::Right, 5);
        input.release(Action::Right);
        assert!(!input.active(Action::Right));
        assert_eq!(input.pressed_at(Action::Right), None);
    }

    #[test]
    fn held_for_measures_hold_duration() {
        let mut input = InputSnapshot::new();
        input.press(Action::Use, 100);
        assert_eq!(input.held_for(Action::Use, 130), Some(30));
        assert_eq!(input.held_for(Action::Jump, 130), None);
    }

    #[test]
    fn clear_resets_everything() {
        let mut input = InputSnapshot::new();
        for action in Action::ALL {
            input.press(action, 1);
        }
        input.clear();
        for action in Action::ALL {
            assert!(!input.active(action));
        }
    }
}
