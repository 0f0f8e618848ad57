//! Phase splitter: rotary converter feeding the three-phase auxiliaries.

use crate::error::ComponentResult;
use crate::rotor::{PitchTracker, RotorParams};
use crate::sound::{SoundEvent, SoundQueue, SoundSink};
use crate::traits::{Device, Publish};
use rb_core::ode::{IntegratorKind, OdeSystem};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhaseSplitterOutputs {
    pub u_out: f64,
    pub relative_speed: f64,
}

#[derive(Debug, Clone)]
pub struct PhaseSplitter {
    rotor: RotorParams,
    u_in: f64,
    pitch: PitchTracker,
    sounds: SoundQueue,
    integrator: IntegratorKind,
    /// [ω]
    y: Vec<f64>,
}

impl PhaseSplitter {
    const NAME: &'static str = "phase-splitter";
    pub const SOUND: &'static str = "Phase_Splitter";

    pub fn new(rotor: RotorParams) -> ComponentResult<Self> {
        rotor.validate("phase splitter rotor")?;
        Ok(Self {
            rotor,
            u_in: 0.0,
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

    pub fn set_u_in(&mut self, u: f64) {
        self.u_in = u;
    }

    pub fn relative_speed(&self) -> f64 {
        self.rotor.relative_speed(self.y[0])
    }

    /// Output voltage: the input voltage scaled by how far the rotor has run up.
    pub fn u_out(&self) -> f64 {
        self.u_in.max(0.0) * self.relative_speed().clamp(0.0, 1.0)
    }
}

impl OdeSystem for PhaseSplitter {
    fn rhs(&self, _t: f64, y: &[f64], dydt: &mut [f64]) {
        dydt[0] = self.rotor.acceleration(self.u_in, y[0]);
    }
}

impl Device for PhaseSplitter {
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

impl Publish for PhaseSplitter {
    type Outputs = PhaseSplitterOutputs;

    fn outputs(&self) -> PhaseSplitterOutputs {
        PhaseSplitterOutputs {
            u_out: self.u_out(),
            relative_speed: self.relative_speed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sound::RecordingSink;

    #[test]
    fn unpowered_splitter_gives_no_voltage() {
        let mut ps = PhaseSplitter::new(RotorParams::default()).unwrap();
        ps.step(0.0, 0.1);
        assert_eq!(ps.u_out(), 0.0);
    }

    #[test]
    fn runs_up_to_input_voltage() {
        let mut ps = PhaseSplitter::new(RotorParams::default()).unwrap();
        ps.set_u_in(380.0);
        for i in 0..2000 {
            ps.step(i as f64 * 0.01, 0.01);
        }
        assert!((ps.u_out() - 380.0).abs() < 1.0);

        let mut sink = RecordingSink::new();
        ps.drain_sounds(&mut sink);
        assert!(!sink.events.is_empty());
        assert!(sink.names().iter().all(|n| *n == PhaseSplitter::SOUND));
    }
}
