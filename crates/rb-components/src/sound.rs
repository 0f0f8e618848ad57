//! Sound events and the host audio sink.

use std::sync::mpsc::Sender;

/// A named sound event with its numeric parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SoundEvent {
    /// Start playing a one-shot sound.
    Play { name: String },
    /// Set the volume of a looped sound (0..=100).
    SetVolume { name: String, volume: i32 },
    /// Set the pitch of a looped sound, relative to nominal.
    SetPitch { name: String, pitch: f64 },
}

impl SoundEvent {
    pub fn play(name: impl Into<String>) -> Self {
        Self::Play { name: name.into() }
    }

    pub fn volume(name: impl Into<String>, volume: i32) -> Self {
        Self::SetVolume {
            name: name.into(),
            volume,
        }
    }

    pub fn pitch(name: impl Into<String>, pitch: f64) -> Self {
        Self::SetPitch {
            name: name.into(),
            pitch,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Play { name } | Self::SetVolume { name, .. } | Self::SetPitch { name, .. } => {
                name
            }
        }
    }
}

/// Host audio sink. Delivery is fire-and-forget: a sink never reports failure
/// back into the simulation.
pub trait SoundSink {
    fn emit(&mut self, event: SoundEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl SoundSink for NullSink {
    fn emit(&mut self, _event: SoundEvent) {}
}

/// Keeps every event in arrival order.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub events: Vec<SoundEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of recorded events, oldest first.
    pub fn names(&self) -> Vec<&str> {
        self.events.iter().map(SoundEvent::name).collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl SoundSink for RecordingSink {
    fn emit(&mut self, event: SoundEvent) {
        self.events.push(event);
    }
}

impl SoundSink for Sender<SoundEvent> {
    fn emit(&mut self, event: SoundEvent) {
        // A dropped receiver just means nobody is listening.
        let _ = self.send(event);
    }
}

/// Per-device buffer of events produced during one step.
#[derive(Debug, Default, Clone)]
pub struct SoundQueue {
    pending: Vec<SoundEvent>,
}

impl SoundQueue {
    pub fn push(&mut self, event: SoundEvent) {
        self.pending.push(event);
    }

    pub fn drain_into(&mut self, sink: &mut dyn SoundSink) {
        for event in self.pending.drain(..) {
            sink.emit(event);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
