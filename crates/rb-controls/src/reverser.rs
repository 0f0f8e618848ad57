//! Reverser: selects the direction of traction force.

use crate::error::ControlError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reverser {
    Backward,
    #[default]
    Neutral,
    Forward,
}

impl Reverser {
    /// Sign applied to traction force.
    pub fn sign(self) -> f64 {
        match self {
            Reverser::Backward => -1.0,
            Reverser::Neutral => 0.0,
            Reverser::Forward => 1.0,
        }
    }
}

impl TryFrom<i64> for Reverser {
    type Error = ControlError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Reverser::Backward),
            0 => Ok(Reverser::Neutral),
            1 => Ok(Reverser::Forward),
            value => Err(ControlError::InvalidReverser { value }),
        }
    }
}

impl From<Reverser> for i64 {
    fn from(r: Reverser) -> Self {
        match r {
            Reverser::Backward => -1,
            Reverser::Neutral => 0,
            Reverser::Forward => 1,
        }
    }
}

/// Reverser handle that can only be moved while the vehicle stands still.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReverserLatch {
    position: Reverser,
}

impl ReverserLatch {
    pub fn position(&self) -> Reverser {
        self.position
    }

    /// Try to move the handle. Accepted only when `velocity == 0.0`.
    ///
    /// Returns whether the position now equals `to`.
    pub fn request(&mut self, to: Reverser, velocity: f64) -> bool {
        if velocity != 0.0 {
            return self.position == to;
        }
        self.position = to;
        true
    }
}
