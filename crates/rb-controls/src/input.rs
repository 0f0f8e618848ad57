//! Control-input snapshot and edge detection.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Everything the driver can hold down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    Accelerate,
    Decelerate,
    ReverserForward,
    ReverserNeutral,
    ReverserBackward,
    Whistle,
    /// With shift: switch on. Without: switch off.
    CompressorSwitch,
    /// With shift: switch on. Without: switch off.
    PhaseSplitterSwitch,
    /// With shift: switch on. Without: switch off. Acts on both fans.
    MotorFanSwitch,
    /// Train crane handle one position towards release (I).
    TrainCraneRelease,
    /// Train crane handle one position towards emergency (VI).
    TrainCraneApply,
    LocoCraneRelease,
    LocoCraneApply,
    BrakeLockToggle,
    CombineCraneTrain,
    CombineCraneDoubleTraction,
    CombineCraneEmergency,
}

/// Controls held during one tick.
///
/// Sampled once at the start of the tick and read unchanged by every device
/// stepped in it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlSnapshot {
    #[serde(default)]
    pub held: BTreeSet<Control>,
    #[serde(default)]
    pub shift: bool,
}

impl ControlSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, control: Control) -> Self {
        self.held.insert(control);
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn is_held(&self, control: Control) -> bool {
        self.held.contains(&control)
    }
}

/// Remembers the previous snapshot so a held control acts once per press.
#[derive(Debug, Clone, Default)]
pub struct EdgeDetector {
    previous: BTreeSet<Control>,
}

impl EdgeDetector {
    /// Controls held now that were not held in the previous snapshot.
    pub fn pressed(&mut self, snapshot: &ControlSnapshot) -> Vec<Control> {
        let pressed = snapshot.held.difference(&self.previous).copied().collect();
        self.previous.clone_from(&snapshot.held);
        pressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_control_fires_once() {
        let mut edges = EdgeDetector::default();
        let held = ControlSnapshot::new().with(Control::TrainCraneApply);
        assert_eq!(edges.pressed(&held), vec![Control::TrainCraneApply]);
        assert!(edges.pressed(&held).is_empty());
        assert!(edges.pressed(&ControlSnapshot::new()).is_empty());
        assert_eq!(edges.pressed(&held), vec![Control::TrainCraneApply]);
    }

    #[test]
    fn snapshot_deserializes_from_names() {
        let snapshot: ControlSnapshot =
            serde_json::from_str(r#"{"held": ["whistle", "compressor_switch"], "shift": true}"#)
                .unwrap();
        assert!(snapshot.is_held(Control::Whistle));
        assert!(snapshot.is_held(Control::CompressorSwitch));
        assert!(snapshot.shift);
    }
}
