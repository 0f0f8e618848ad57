//! Driver's train brake crane (No. 395 type).
//!
//! Table-driven: each handle position maps to a regulation mode for the
//! equalizing reservoir. The brake pipe at the head of the train follows the
//! equalizing pressure, which is the crane's published brake-pipe init pressure.

use crate::common::check_positive;
use crate::error::{ComponentError, ComponentResult};
use crate::sound::{SoundEvent, SoundQueue, SoundSink};
use crate::traits::{Device, Publish};
use rb_core::ode::{IntegratorKind, OdeSystem};
use serde::{Deserialize, Serialize};

/// Regulation mode of one handle position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CraneMode {
    /// Equalizing reservoir charged from the feed line (overcharge).
    Release,
    /// Equalizing reservoir held at charge pressure.
    Train,
    /// Equalizing reservoir follows brake-pipe leaks down.
    LapNoFeed,
    /// Equalizing reservoir held.
    LapFeed,
    ServiceSlow,
    Service,
    Emergency,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CranePosition {
    pub name: String,
    pub mode: CraneMode,
}

impl CranePosition {
    fn new(name: &str, mode: CraneMode) -> Self {
        Self {
            name: name.to_string(),
            mode,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrakeCraneParams {
    /// Proportional regulation rate of the equalizing reservoir (1/s)
    pub k_er: f64,
    /// Maximum charging rate in train position (MPa/s)
    pub charge_rate: f64,
    /// Maximum charging rate in release position (MPa/s)
    pub release_rate: f64,
    /// Slow service reduction rate, also used to remove overcharge (MPa/s)
    pub slow_service_rate: f64,
    /// Service reduction rate (MPa/s)
    pub service_rate: f64,
    /// Emergency reduction rate (MPa/s)
    pub emergency_rate: f64,
    pub positions: Vec<CranePosition>,
    /// Handle position at construction
    pub initial_position: usize,
}

impl Default for BrakeCraneParams {
    fn default() -> Self {
        Self {
            k_er: 2.0,
            charge_rate: 0.05,
            release_rate: 0.15,
            slow_service_rate: 0.01,
            service_rate: 0.025,
            emergency_rate: 0.08,
            positions: vec![
                CranePosition::new("I", CraneMode::Release),
                CranePosition::new("II", CraneMode::Train),
                CranePosition::new("III", CraneMode::LapNoFeed),
                CranePosition::new("IV", CraneMode::LapFeed),
                CranePosition::new("VA", CraneMode::ServiceSlow),
                CranePosition::new("V", CraneMode::Service),
                CranePosition::new("VI", CraneMode::Emergency),
            ],
            initial_position: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BrakeCraneOutputs {
    pub brake_pipe_init_pressure: f64,
    pub position: usize,
}

#[derive(Debug, Clone)]
pub struct BrakeCrane {
    params: BrakeCraneParams,
    position: usize,
    feed_line_pressure: f64,
    charge_pressure: f64,
    brake_pipe_pressure: f64,
    sounds: SoundQueue,
    integrator: IntegratorKind,
    /// [p_er]
    y: Vec<f64>,
}

impl BrakeCrane {
    const NAME: &'static str = "krm395";

    pub fn new(params: BrakeCraneParams) -> ComponentResult<Self> {
        check_positive(params.k_er, "crane k_er")?;
        check_positive(params.charge_rate, "crane charge_rate")?;
        check_positive(params.release_rate, "crane release_rate")?;
        check_positive(params.slow_service_rate, "crane slow_service_rate")?;
        check_positive(params.service_rate, "crane service_rate")?;
        check_positive(params.emergency_rate, "crane emergency_rate")?;
        if params.positions.is_empty() {
            return Err(ComponentError::InvalidArg {
                what: "crane position table is empty",
            });
        }
        if params.initial_position >= params.positions.len() {
            return Err(ComponentError::UnknownPosition {
                device: Self::NAME,
                position: params.initial_position as i64,
                count: params.positions.len(),
            });
        }
        Ok(Self {
            position: params.initial_position,
            params,
            feed_line_pressure: 0.0,
            charge_pressure: 0.0,
            brake_pipe_pressure: 0.0,
            sounds: SoundQueue::default(),
            integrator: IntegratorKind::default(),
            y: vec![0.0],
        })
    }

    pub fn with_integrator(mut self, integrator: IntegratorKind) -> Self {
        self.integrator = integrator;
        self
    }

    /// Charge the equalizing reservoir and put the handle in train position.
    pub fn init(&mut self, charge_pressure: f64, feed_line_pressure: f64) {
        self.charge_pressure = charge_pressure;
        self.feed_line_pressure = feed_line_pressure;
        self.y[0] = charge_pressure;
        if let Some(train) = self
            .params
            .positions
            .iter()
            .position(|p| p.mode == CraneMode::Train)
        {
            self.position = train;
        }
    }

    pub fn set_feed_line_pressure(&mut self, p: f64) {
        self.feed_line_pressure = p;
    }

    pub fn set_charge_pressure(&mut self, p: f64) {
        self.charge_pressure = p;
    }

    pub fn set_brake_pipe_pressure(&mut self, p: f64) {
        self.brake_pipe_pressure = p;
    }

    /// Set the handle position without a handle sound.
    pub fn set_position(&mut self, position: i64) -> ComponentResult<()> {
        let count = self.params.positions.len();
        match usize::try_from(position) {
            Ok(p) if p < count => {
                self.position = p;
                Ok(())
            }
            _ => Err(ComponentError::UnknownPosition {
                device: Self::NAME,
                position,
                count,
            }),
        }
    }

    /// Driver moves the handle. Emits the handle sound when it actually moves.
    pub fn move_handle(&mut self, position: i64) -> ComponentResult<()> {
        let before = self.position;
        self.set_position(position)?;
        if self.position != before {
            self.sounds.push(SoundEvent::play("Kran_395"));
        }
        Ok(())
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn position_count(&self) -> usize {
        self.params.positions.len()
    }

    pub fn position_name(&self) -> &str {
        &self.params.positions[self.position].name
    }

    pub fn mode(&self) -> CraneMode {
        self.params.positions[self.position].mode
    }

    pub fn equalizing_pressure(&self) -> f64 {
        self.y[0]
    }

    /// Pressure the crane feeds into the brake pipe: the equalizing pressure,
    /// never above what the feed line supplies.
    pub fn brake_pipe_init_pressure(&self) -> f64 {
        self.y[0].min(self.feed_line_pressure.max(0.0))
    }

    /// Move towards `target`, charging only as far as the feed line allows.
    fn approach(&self, p_er: f64, target: f64, up: f64, down: f64) -> f64 {
        let target = if target > p_er {
            target.min(self.feed_line_pressure).max(p_er)
        } else {
            target
        };
        (self.params.k_er * (target - p_er)).clamp(-down, up)
    }

    fn reduce(p_er: f64, rate: f64) -> f64 {
        if p_er > 0.0 { -rate } else { 0.0 }
    }

    fn er_rate(&self, p_er: f64) -> f64 {
        let p = &self.params;
        match self.mode() {
            CraneMode::Release => self.approach(
                p_er,
                self.feed_line_pressure,
                p.release_rate,
                p.slow_service_rate,
            ),
            CraneMode::Train => {
                self.approach(p_er, self.charge_pressure, p.charge_rate, p.slow_service_rate)
            }
            CraneMode::LapNoFeed => {
                if self.brake_pipe_pressure < p_er {
                    (p.k_er * (self.brake_pipe_pressure - p_er)).max(-p.slow_service_rate)
                } else {
                    0.0
                }
            }
            CraneMode::LapFeed => 0.0,
            CraneMode::ServiceSlow => Self::reduce(p_er, p.slow_service_rate),
            CraneMode::Service => Self::reduce(p_er, p.service_rate),
            CraneMode::Emergency => Self::reduce(p_er, p.emergency_rate),
        }
    }
}

impl OdeSystem for BrakeCrane {
    fn rhs(&self, _t: f64, y: &[f64], dydt: &mut [f64]) {
        dydt[0] = self.er_rate(y[0]);
    }
}

impl Device for BrakeCrane {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn step(&mut self, t: f64, dt: f64) {
        let mut y = std::mem::take(&mut self.y);
        self.integrator.step(self, t, &mut y, dt);
        y[0] = y[0].max(0.0);
        self.y = y;
    }

    fn drain_sounds(&mut self, sink: &mut dyn SoundSink) {
        self.sounds.drain_into(sink);
    }
}

impl Publish for BrakeCrane {
    type Outputs = BrakeCraneOutputs;

    fn outputs(&self) -> BrakeCraneOutputs {
        BrakeCraneOutputs {
            brake_pipe_init_pressure: self.brake_pipe_init_pressure(),
            position: self.position,
        }
    }
}
