//! Requested traction level.

/// Per-tick change while accelerate/decelerate is held.
pub const LEVEL_STEP: f64 = 0.01;

/// Driver's requested fraction of available traction, kept in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TractionLevel {
    level: f64,
}

impl TractionLevel {
    pub fn value(&self) -> f64 {
        self.level
    }

    /// Set directly; clamped into `[0, 1]`. NaN is ignored.
    pub fn set(&mut self, level: f64) {
        if !level.is_nan() {
            self.level = level.clamp(0.0, 1.0);
        }
    }

    /// Apply one tick of held controls.
    pub fn update(&mut self, accelerate: bool, decelerate: bool) {
        let mut level = self.level;
        if accelerate {
            level += LEVEL_STEP;
        }
        if decelerate {
            level -= LEVEL_STEP;
        }
        self.level = level.clamp(0.0, 1.0);
    }
}
