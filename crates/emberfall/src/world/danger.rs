/// Danger rises while the player is in the dark and falls while any visible
/// light covers them. Deliberately asymmetric: darkness accrues four times
/// faster than light dissipates it.
pub const DANGER_GROW_RATE: f32 = 0.004;
pub const DANGER_SOOTHE_RATE: f32 = 0.001;

/// Edge transitions the meter reports to the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DangerEdge {
    /// Crossed 1.0 upward: spawn the hazard.
    SpawnHazard,
    /// Crossed 0.0 downward while the hazard was live: despawn it.
    DespawnHazard,
}

/// The [0, 1] danger scalar plus the hazard-active latch.
#[derive(Debug, Clone)]
pub struct DangerMeter {
    value: f32,
    hazard_active: bool,
}

impl DangerMeter {
    pub fn new() -> Self {
        Self {
            value: 0.0,
            hazard_active: false,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn hazard_active(&self) -> bool {
        self.hazard_active
    }

    /// Advance one tick. `lit` is whether the player currently overlaps any
    /// visible light source. Spawn fires once on saturation and cannot
    /// re-fire until the hazard has despawned.
    pub fn step(&mut self, lit: bool) -> Option<DangerEdge> {
        let before = self.value;
        let rate = if lit {
            -DANGER_SOOTHE_RATE
        } else {
            DANGER_GROW_RATE
        };
        self.value = (self.value + rate).clamp(0.0, 1.0);

        if !self.hazard_active && self.value >= 1.0 && before < 1.0 {
            self.hazard_active = true;
            return Some(DangerEdge::SpawnHazard);
        }
        if self.hazard_active && self.value <= 0.0 && before > 0.0 {
            self.hazard_active = false;
            return Some(DangerEdge::DespawnHazard);
        }
        None
    }
}

impl Default for DangerMeter {
    fn default() -> Self {
        Self::new()
    }
}
