//! Brake-lock device (No. 367 type).
//!
//! Sits between the driver's cranes and the locomotive pipes. Connected, it
//! passes the feed line to the cranes and lets the locomotive brake pipe follow
//! the train crane; locked, it cuts the cranes off and holds the brake pipe.

use crate::common::check_positive;
use crate::error::{ComponentError, ComponentResult};
use crate::sound::{SoundEvent, SoundQueue, SoundSink};
use crate::traits::{Device, Publish};
use rb_core::ode::{IntegratorKind, OdeSystem};
use serde::{Deserialize, Serialize};

/// Position of the combined crane built into the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CombineCranePos {
    /// Brake pipe driven by the train crane.
    #[default]
    Train,
    /// Train crane disconnected from the brake pipe (trailing unit).
    DoubleTraction,
    /// Brake pipe vented to atmosphere.
    Emergency,
}

impl TryFrom<i64> for CombineCranePos {
    type Error = ComponentError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Self::Train),
            0 => Ok(Self::DoubleTraction),
            1 => Ok(Self::Emergency),
            state => Err(ComponentError::UnknownState {
                device: "ubt367m combine crane",
                state,
            }),
        }
    }
}

impl From<CombineCranePos> for i64 {
    fn from(pos: CombineCranePos) -> Self {
        match pos {
            CombineCranePos::Train => -1,
            CombineCranePos::DoubleTraction => 0,
            CombineCranePos::Emergency => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrakeLockParams {
    /// Rate at which the locomotive brake pipe follows the crane (1/s)
    pub k_tm: f64,
    /// Venting rate of the brake pipe in emergency (1/s)
    pub k_emergency: f64,
    /// Latch state at construction: 0 locked, 1 connected
    pub initial_state: i64,
}

impl Default for BrakeLockParams {
    fn default() -> Self {
        Self {
            k_tm: 5.0,
            k_emergency: 1.0,
            initial_state: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BrakeLockOutputs {
    pub crane_fl_pressure: f64,
    pub loco_tm_pressure: f64,
    pub connected: bool,
}

#[derive(Debug, Clone)]
pub struct BrakeLock {
    params: BrakeLockParams,
    connected: bool,
    combine_crane_pos: CombineCranePos,
    loco_fl_pressure: f64,
    crane_tm_pressure: f64,
    sounds: SoundQueue,
    integrator: IntegratorKind,
    /// [p_loco_tm]
    y: Vec<f64>,
}

impl BrakeLock {
    const NAME: &'static str = "ubt367m";

    pub fn new(params: BrakeLockParams) -> ComponentResult<Self> {
        check_positive(params.k_tm, "brake lock k_tm")?;
        check_positive(params.k_emergency, "brake lock k_emergency")?;
        let connected = Self::decode_state(params.initial_state)?;
        Ok(Self {
            params,
            connected,
            combine_crane_pos: CombineCranePos::default(),
            loco_fl_pressure: 0.0,
            crane_tm_pressure: 0.0,
            sounds: SoundQueue::default(),
            integrator: IntegratorKind::default(),
            y: vec![0.0],
        })
    }

    pub fn with_integrator(mut self, integrator: IntegratorKind) -> Self {
        self.integrator = integrator;
        self
    }

    fn decode_state(state: i64) -> ComponentResult<bool> {
        match state {
            0 => Ok(false),
            1 => Ok(true),
            state => Err(ComponentError::UnknownState {
                device: Self::NAME,
                state,
            }),
        }
    }

    /// Set the latch from its numeric state (0 locked, 1 connected).
    pub fn set_state(&mut self, state: i64) -> ComponentResult<()> {
        self.connected = Self::decode_state(state)?;
        Ok(())
    }

    pub fn state(&self) -> i64 {
        i64::from(self.connected)
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Driver turns the key. Emits the latch sound.
    pub fn toggle(&mut self) {
        self.connected = !self.connected;
        let name = if self.connected { "UBT_On" } else { "UBT_Off" };
        self.sounds.push(SoundEvent::play(name));
    }

    pub fn set_combine_crane_pos(&mut self, pos: i64) -> ComponentResult<()> {
        self.combine_crane_pos = CombineCranePos::try_from(pos)?;
        Ok(())
    }

    pub fn combine_crane_pos(&self) -> CombineCranePos {
        self.combine_crane_pos
    }

    pub fn set_loco_fl_pressure(&mut self, p: f64) {
        self.loco_fl_pressure = p;
    }

    pub fn set_crane_tm_pressure(&mut self, p: f64) {
        self.crane_tm_pressure = p;
    }

    pub fn set_y(&mut self, i: usize, value: f64) {
        if let Some(y) = self.y.get_mut(i) {
            *y = value;
        }
    }

    pub fn crane_fl_pressure(&self) -> f64 {
        if self.connected {
            self.loco_fl_pressure
        } else {
            0.0
        }
    }

    pub fn loco_tm_pressure(&self) -> f64 {
        self.y[0]
    }
}

impl OdeSystem for BrakeLock {
    fn rhs(&self, _t: f64, y: &[f64], dydt: &mut [f64]) {
        dydt[0] = match (self.combine_crane_pos, self.connected) {
            (CombineCranePos::Emergency, _) => -self.params.k_emergency * y[0],
            (CombineCranePos::Train, true) => self.params.k_tm * (self.crane_tm_pressure - y[0]),
            _ => 0.0,
        };
    }
}

impl Device for BrakeLock {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn step(&mut self, t: f64, dt: f64) {
        let mut y = std::mem::take(&mut self.y);
        self.integrator.step(self, t, &mut y, dt);
        self.y = y;
    }

    fn drain_sounds(&mut self, sink: &mut dyn SoundSink) {
        self.sounds.drain_into(sink);
    }
}

impl Publish for BrakeLock {
    type Outputs = BrakeLockOutputs;

    fn outputs(&self) -> BrakeLockOutputs {
        BrakeLockOutputs {
            crane_fl_pressure: self.crane_fl_pressure(),
            loco_tm_pressure: self.loco_tm_pressure(),
            connected: self.connected,
        }
    }
}
