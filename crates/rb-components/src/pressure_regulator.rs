//! Main-reservoir pressure governor.

use crate::common::check_positive;
use crate::error::{ComponentError, ComponentResult};
use crate::traits::{Device, Publish};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PressureRegulatorParams {
    /// Compressor is switched on at or below this pressure (MPa)
    pub p_on: f64,
    /// Compressor is switched off at or above this pressure (MPa)
    pub p_off: f64,
}

impl Default for PressureRegulatorParams {
    fn default() -> Self {
        Self {
            p_on: 0.75,
            p_off: 0.9,
        }
    }
}

/// Hysteresis switch: off at `p >= p_off`, on at `p <= p_on`, otherwise
/// unchanged.
pub fn next_state(on: bool, p: f64, params: &PressureRegulatorParams) -> bool {
    if p >= params.p_off {
        false
    } else if p <= params.p_on {
        true
    } else {
        on
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PressureRegulatorOutputs {
    /// 1.0 while the compressor contacts are closed, 0.0 otherwise.
    pub state: f64,
}

#[derive(Debug, Clone)]
pub struct PressureRegulator {
    params: PressureRegulatorParams,
    pressure: f64,
    on: bool,
}

impl PressureRegulator {
    const NAME: &'static str = "pressure-regulator";

    pub fn new(params: PressureRegulatorParams) -> ComponentResult<Self> {
        check_positive(params.p_on, "regulator p_on")?;
        if params.p_off <= params.p_on {
            return Err(ComponentError::InvalidArg {
                what: "regulator p_off must exceed p_on",
            });
        }
        Ok(Self {
            params,
            pressure: 0.0,
            on: false,
        })
    }

    pub fn set_pressure(&mut self, p: f64) {
        self.pressure = p;
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Contact state as a multiplier for the compressor supply.
    pub fn state(&self) -> f64 {
        if self.on { 1.0 } else { 0.0 }
    }
}

impl Device for PressureRegulator {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn step(&mut self, _t: f64, _dt: f64) {
        self.on = next_state(self.on, self.pressure, &self.params);
    }
}

impl Publish for PressureRegulator {
    type Outputs = PressureRegulatorOutputs;

    fn outputs(&self) -> PressureRegulatorOutputs {
        PressureRegulatorOutputs {
            state: self.state(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn starts_off_and_switches_on_when_empty() {
        let mut reg = PressureRegulator::new(PressureRegulatorParams::default()).unwrap();
        assert!(!reg.is_on());
        reg.step(0.0, 0.1);
        assert!(reg.is_on());
        assert_eq!(reg.state(), 1.0);
    }

    #[test]
    fn cycle_through_band() {
        let mut reg = PressureRegulator::new(PressureRegulatorParams::default()).unwrap();
        for (p, expect) in [(0.5, true), (0.8, true), (0.95, false), (0.8, false), (0.7, true)] {
            reg.set_pressure(p);
            reg.step(0.0, 0.1);
            assert_eq!(reg.is_on(), expect, "p = {p}");
        }
    }

    #[test]
    fn inverted_thresholds_rejected() {
        let params = PressureRegulatorParams { p_on: 0.9, p_off: 0.8 };
        assert!(PressureRegulator::new(params).is_err());
    }

    proptest! {
        #[test]
        fn hysteresis_holds(on in any::<bool>(), p in 0.0f64..1.5) {
            let params = PressureRegulatorParams::default();
            let next = next_state(on, p, &params);
            if p >= params.p_off {
                prop_assert!(!next);
            } else if p <= params.p_on {
                prop_assert!(next);
            } else {
                prop_assert_eq!(next, on);
            }
        }
    }
}
