//! Train horn.

use crate::sound::{SoundEvent, SoundQueue, SoundSink};
use crate::traits::Device;

#[derive(Debug, Clone, Default)]
pub struct TrainHorn {
    pressed: bool,
    sounding: bool,
    sounds: SoundQueue,
}

impl TrainHorn {
    pub const SOUND: &'static str = "Svistok";

    pub fn new() -> Self {
        Self::default()
    }

    /// Whistle control as sampled this tick.
    pub fn set_control(&mut self, whistle: bool) {
        self.pressed = whistle;
    }

    pub fn is_sounding(&self) -> bool {
        self.sounding
    }
}

impl Device for TrainHorn {
    fn name(&self) -> &str {
        "train-horn"
    }

    fn step(&mut self, _t: f64, _dt: f64) {
        if self.pressed != self.sounding {
            self.sounding = self.pressed;
            let volume = if self.sounding { 100 } else { 0 };
            self.sounds.push(SoundEvent::volume(Self::SOUND, volume));
        }
    }

    fn drain_sounds(&mut self, sink: &mut dyn SoundSink) {
        self.sounds.drain_into(sink);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sound::RecordingSink;

    #[test]
    fn whistle_sounds_on_edges_only() {
        let mut horn = TrainHorn::new();
        let mut sink = RecordingSink::new();
        for pressed in [false, true, true, true, false, false] {
            horn.set_control(pressed);
            horn.step(0.0, 0.01);
            horn.drain_sounds(&mut sink);
        }
        assert_eq!(
            sink.events,
            vec![
                SoundEvent::volume("Svistok", 100),
                SoundEvent::volume("Svistok", 0),
            ]
        );
    }
}
