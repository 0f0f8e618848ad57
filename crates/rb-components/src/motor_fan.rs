//! Traction-motor ventilation fan.

use crate::error::ComponentResult;
use crate::rotor::{PitchTracker, RotorParams};
use crate::sound::{SoundEvent, SoundQueue, SoundSink};
use crate::traits::{Device, Publish};
use rb_core::ode::{IntegratorKind, OdeSystem};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotorFanOutputs {
    pub relative_speed: f64,
}

#[derive(Debug, Clone)]
pub struct MotorFan {
    name: String,
    sound: String,
    rotor: RotorParams,
    u_in: f64,
    pitch: PitchTracker,
    sounds: SoundQueue,
    integrator: IntegratorKind,
    /// [ω]
    y: Vec<f64>,
}

impl MotorFan {
    /// Fan `index` (1-based) plays the sound `Motor_Fan{index}`.
    pub fn new(index: usize, rotor: RotorParams) -> ComponentResult<Self> {
        rotor.validate("motor fan rotor")?;
        Ok(Self {
            name: format!("motor-fan-{index}"),
            sound: format!("Motor_Fan{index}"),
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

    pub fn sound_name(&self) -> &str {
        &self.sound
    }
}

impl OdeSystem for MotorFan {
    fn rhs(&self, _t: f64, y: &[f64], dydt: &mut [f64]) {
        dydt[0] = self.rotor.acceleration(self.u_in, y[0]);
    }
}

impl Device for MotorFan {
    fn name(&self) -> &str {
        &self.name
    }

    fn step(&mut self, t: f64, dt: f64) {
        let mut y = std::mem::take(&mut self.y);
        self.integrator.step(self, t, &mut y, dt);
        self.y = y;
        if let Some(pitch) = self.pitch.update(self.relative_speed()) {
            self.sounds.push(SoundEvent::pitch(self.sound.clone(), pitch));
        }
    }

    fn drain_sounds(&mut self, sink: &mut dyn SoundSink) {
        self.sounds.drain_into(sink);
    }
}

impl Publish for MotorFan {
    type Outputs = MotorFanOutputs;

    fn outputs(&self) -> MotorFanOutputs {
        MotorFanOutputs {
            relative_speed: self.relative_speed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sound::RecordingSink;

    #[test]
    fn fan_names_follow_index() {
        let fan = MotorFan::new(2, RotorParams::default()).unwrap();
        assert_eq!(fan.name(), "motor-fan-2");
        assert_eq!(fan.sound_name(), "Motor_Fan2");
    }

    #[test]
    fn fan_spins_up_and_reports_pitch() {
        let mut fan = MotorFan::new(1, RotorParams::default()).unwrap();
        fan.set_u_in(380.0);
        fan.step(0.0, 0.1);
        assert!(fan.relative_speed() > 0.0);

        let mut sink = RecordingSink::new();
        fan.drain_sounds(&mut sink);
        assert_eq!(sink.names(), vec!["Motor_Fan1"]);
    }
}
