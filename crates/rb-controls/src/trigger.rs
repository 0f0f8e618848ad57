//! Latched toggle switch.

use serde::{Deserialize, Serialize};

/// A physical tumbler: stays where it was put until set or reset again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    state: bool,
}

impl Trigger {
    pub fn new(state: bool) -> Self {
        Self { state }
    }

    /// Switch on. Returns true if the state changed.
    pub fn set(&mut self) -> bool {
        !std::mem::replace(&mut self.state, true)
    }

    /// Switch off. Returns true if the state changed.
    pub fn reset(&mut self) -> bool {
        std::mem::replace(&mut self.state, false)
    }

    pub fn state(&self) -> bool {
        self.state
    }

    /// State as a multiplier for a supply voltage or flow.
    pub fn factor(&self) -> f64 {
        if self.state { 1.0 } else { 0.0 }
    }
}
