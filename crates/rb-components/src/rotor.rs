//! First-order rotor model shared by the auxiliary electric machines.

use crate::common::check_positive;
use crate::error::ComponentResult;
use serde::{Deserialize, Serialize};

/// Rotor parameters.
///
/// The shaft speed relaxes toward the speed set by the supply voltage:
///
/// ```text
/// T * dω/dt = ω_nom * U / U_nom - ω
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotorParams {
    /// Nominal supply voltage (V)
    pub u_nom: f64,
    /// Nominal shaft speed (rad/s)
    pub omega_nom: f64,
    /// Run-up time constant (s)
    pub time_constant: f64,
}

impl Default for RotorParams {
    fn default() -> Self {
        Self {
            u_nom: 380.0,
            omega_nom: 150.0,
            time_constant: 1.5,
        }
    }
}

impl RotorParams {
    pub fn validate(&self, what: &'static str) -> ComponentResult<()> {
        check_positive(self.u_nom, what)?;
        check_positive(self.omega_nom, what)?;
        check_positive(self.time_constant, what)?;
        Ok(())
    }

    /// Steady speed for a supply voltage. Negative voltage is treated as none.
    pub fn steady_speed(&self, u: f64) -> f64 {
        self.omega_nom * u.max(0.0) / self.u_nom
    }

    /// dω/dt for the given voltage and speed.
    pub fn acceleration(&self, u: f64, omega: f64) -> f64 {
        (self.steady_speed(u) - omega) / self.time_constant
    }

    pub fn relative_speed(&self, omega: f64) -> f64 {
        omega / self.omega_nom
    }
}

/// Tracks the last relative speed reported to the sound sink.
///
/// A new pitch is reported only once the speed moved by more than `threshold`.
#[derive(Debug, Clone, Copy)]
pub struct PitchTracker {
    last: f64,
    threshold: f64,
}

impl Default for PitchTracker {
    fn default() -> Self {
        Self {
            last: 0.0,
            threshold: 0.01,
        }
    }
}

impl PitchTracker {
    pub fn update(&mut self, relative_speed: f64) -> Option<f64> {
        if (relative_speed - self.last).abs() > self.threshold {
            self.last = relative_speed;
            Some(relative_speed)
        } else {
            None
        }
    }
}
