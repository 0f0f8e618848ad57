//! Motor compressor charging the main reservoir.

use crate::common::{check_non_negative, check_positive};
use crate::error::ComponentResult;
use crate::rotor::{PitchTracker, RotorParams};
use crate::sound::{SoundEvent, SoundQueue, SoundSink};
use crate::traits::{Device, Publish};
use rb_core::ode::{IntegratorKind, OdeSystem};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotorCompressorParams {
    /// Delivery at nominal speed against zero back pressure (MPa·m³/s)
    pub q_nom: f64,
    /// Back pressure at which delivery stops (MPa)
    pub p_max: f64,
    /// Fractional speed loss at `p_max` from the pumping load
    pub k_load: f64,
    pub rotor: RotorParams,
}

impl Default for MotorCompressorParams {
    fn default() -> Self {
        Self {
            q_nom: 0.005,
            p_max: 1.0,
            k_load: 0.1,
            rotor: RotorParams {
                u_nom: 380.0,
                omega_nom: 150.0,
                time_constant: 0.8,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotorCompressorOutputs {
    pub air_flow: f64,
    pub relative_speed: f64,
}

#[derive(Debug, Clone)]
pub struct MotorCompressor {
    params: MotorCompressorParams,
    u_power: f64,
    p_ext: f64,
    pitch: PitchTracker,
    sounds: SoundQueue,
    integrator: IntegratorKind,
    /// [ω]
    y: Vec<f64>,
}

impl MotorCompressor {
    const NAME: &'static str = "motor-compressor";
    pub const SOUND: &'static str = "Motor_Compressor";

    pub fn new(params: MotorCompressorParams) -> ComponentResult<Self> {
        check_positive(params.q_nom, "compressor q_nom")?;
        check_positive(params.p_max, "compressor p_max")?;
        check_non_negative(params.k_load, "compressor k_load")?;
        params.rotor.validate("compressor rotor")?;
        Ok(Self {
            params,
            u_power: 0.0,
            p_ext: 0.0,
            pitch: PitchTracker::default(),
            sounds: SoundQueue::default(),
            integrator: IntegratorKind::default(),
            y: vec![0.0],
        })
    }

    pub fn with_integrator(mut self, integrator: IntegratorKind) -> Self {
        self.integrator = integrator;
        self
    }

    pub fn params(&self) -> &MotorCompressorParams {
        &self.params
    }

    /// Supply voltage after the tumbler and regulator contacts.
    pub fn set_u_power(&mut self, u: f64) {
        self.u_power = u;
    }

    /// Pressure in the reservoir being charged.
    pub fn set_external_pressure(&mut self, p: f64) {
        self.p_ext = p;
    }

    pub fn relative_speed(&self) -> f64 {
        self.params.rotor.relative_speed(self.y[0])
    }

    fn back_pressure_ratio(&self) -> f64 {
        (self.p_ext / self.params.p_max).clamp(0.0, 1.0)
    }

    pub fn air_flow(&self) -> f64 {
        let rel = self.relative_speed().max(0.0);
        self.params.q_nom * rel * (1.0 - self.back_pressure_ratio())
    }
}

impl OdeSystem for MotorCompressor {
    fn rhs(&self, _t: f64, y: &[f64], dydt: &mut [f64]) {
        let rotor = &self.params.rotor;
        let load = 1.0 - self.params.k_load * self.back_pressure_ratio();
        dydt[0] = (rotor.steady_speed(self.u_power) * load - y[0]) / rotor.time_constant;
    }
}

impl Device for MotorCompressor {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn step(&mut self, t: f64, dt: f64) {
        let mut y = std::mem::take(&mut self.y);
        self.integrator.step(self, t, &mut y, dt);
        self.y = y;
        if let Some(pitch) = self.pitch.update(self.relative_speed()) {
            self.sounds.push(SoundEvent::pitch(Self::SOUND, pitch));
        }
    }

    fn drain_sounds(&mut self, sink: &mut dyn SoundSink) {
        self.sounds.drain_into(sink);
    }
}

impl Publish for MotorCompressor {
    type Outputs = MotorCompressorOutputs;

    fn outputs(&self) -> MotorCompressorOutputs {
        MotorCompressorOutputs {
            air_flow: self.air_flow(),
            relative_speed: self.relative_speed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spun_up(p_ext: f64) -> MotorCompressor {
        let mut mk = MotorCompressor::new(MotorCompressorParams::default()).unwrap();
        mk.set_u_power(380.0);
        mk.set_external_pressure(p_ext);
        for i in 0..1000 {
            mk.step(i as f64 * 0.01, 0.01);
        }
        mk
    }

    #[test]
    fn no_power_no_flow() {
        let mut mk = MotorCompressor::new(MotorCompressorParams::default()).unwrap();
        mk.set_external_pressure(0.5);
        mk.step(0.0, 0.1);
        assert_eq!(mk.air_flow(), 0.0);
    }

    #[test]
    fn flow_drops_with_back_pressure() {
        let low = spun_up(0.1).air_flow();
        let mid = spun_up(0.5).air_flow();
        let high = spun_up(0.9).air_flow();
        assert!(low > mid && mid > high && high > 0.0);
        assert_eq!(spun_up(1.2).air_flow(), 0.0);
    }

    #[test]
    fn invalid_params_rejected() {
        let params = MotorCompressorParams {
            q_nom: 0.0,
            ..MotorCompressorParams::default()
        };
        assert!(MotorCompressor::new(params).is_err());
    }
}
