//! Auxiliary (locomotive) brake crane (No. 254 type).

use crate::common::{check_positive, valve_opening};
use crate::error::{ComponentError, ComponentResult};
use crate::traits::{Device, Publish};
use rb_core::ode::{IntegratorKind, OdeSystem};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocoCraneParams {
    /// Cylinder pressure at the last handle position (MPa)
    pub p_max: f64,
    /// Number of handle positions; position 0 is full release
    pub position_count: usize,
    /// Proportional regulation rate of the set pressure (1/s)
    pub k_set: f64,
    /// Maximum set-pressure rise (MPa/s)
    pub apply_rate: f64,
    /// Maximum set-pressure fall (MPa/s)
    pub release_rate: f64,
    /// Cylinder valve coefficient (m³/s)
    pub k_flow: f64,
    /// Pressure error at which the valve opens fully (MPa)
    pub band: f64,
}

impl Default for LocoCraneParams {
    fn default() -> Self {
        Self {
            p_max: 0.38,
            position_count: 5,
            k_set: 5.0,
            apply_rate: 0.1,
            release_rate: 0.15,
            k_flow: 0.01,
            band: 0.05,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LocoCraneOutputs {
    pub brake_cyl_flow: f64,
    pub set_pressure: f64,
    pub handle_position: usize,
}

#[derive(Debug, Clone)]
pub struct LocoCrane {
    params: LocoCraneParams,
    handle_position: usize,
    feed_line_pressure: f64,
    brake_cyl_pressure: f64,
    air_dist_flow: f64,
    brake_cyl_flow: f64,
    integrator: IntegratorKind,
    /// [p_set]
    y: Vec<f64>,
}

impl LocoCrane {
    const NAME: &'static str = "kvt254";

    pub fn new(params: LocoCraneParams) -> ComponentResult<Self> {
        check_positive(params.p_max, "loco crane p_max")?;
        check_positive(params.k_set, "loco crane k_set")?;
        check_positive(params.apply_rate, "loco crane apply_rate")?;
        check_positive(params.release_rate, "loco crane release_rate")?;
        check_positive(params.k_flow, "loco crane k_flow")?;
        check_positive(params.band, "loco crane band")?;
        if params.position_count < 2 {
            return Err(ComponentError::InvalidArg {
                what: "loco crane needs at least two handle positions",
            });
        }
        Ok(Self {
            params,
            handle_position: 0,
            feed_line_pressure: 0.0,
            brake_cyl_pressure: 0.0,
            air_dist_flow: 0.0,
            brake_cyl_flow: 0.0,
            integrator: IntegratorKind::default(),
            y: vec![0.0],
        })
    }

    pub fn with_integrator(mut self, integrator: IntegratorKind) -> Self {
        self.integrator = integrator;
        self
    }

    pub fn set_feedline_pressure(&mut self, p: f64) {
        self.feed_line_pressure = p;
    }

    pub fn set_brake_cylinder_pressure(&mut self, p: f64) {
        self.brake_cyl_pressure = p;
    }

    /// Flow arriving from an air distributor piped through the crane.
    pub fn set_air_distributor_flow(&mut self, q: f64) {
        self.air_dist_flow = q;
    }

    pub fn set_handle_position(&mut self, position: i64) -> ComponentResult<()> {
        let count = self.params.position_count;
        match usize::try_from(position) {
            Ok(p) if p < count => {
                self.handle_position = p;
                Ok(())
            }
            _ => Err(ComponentError::UnknownPosition {
                device: Self::NAME,
                position,
                count,
            }),
        }
    }

    /// One notch towards application; stops at the last position.
    pub fn apply_notch(&mut self) {
        self.handle_position = (self.handle_position + 1).min(self.params.position_count - 1);
    }

    /// One notch towards release; stops at position 0.
    pub fn release_notch(&mut self) {
        self.handle_position = self.handle_position.saturating_sub(1);
    }

    pub fn handle_position(&self) -> usize {
        self.handle_position
    }

    pub fn target_pressure(&self) -> f64 {
        self.params.p_max * self.handle_position as f64 / (self.params.position_count - 1) as f64
    }

    pub fn set_pressure(&self) -> f64 {
        self.y[0]
    }

    pub fn brake_cylinder_flow(&self) -> f64 {
        self.brake_cyl_flow
    }

    fn cylinder_flow(&self, p_set: f64) -> f64 {
        let p_bc = self.brake_cyl_pressure;
        let opening = valve_opening(p_set - p_bc, self.params.band);
        let q = if opening > 0.0 {
            self.params.k_flow * (self.feed_line_pressure - p_bc).max(0.0) * opening
        } else {
            self.params.k_flow * p_bc.max(0.0) * opening
        };
        q + self.air_dist_flow
    }
}

impl OdeSystem for LocoCrane {
    fn rhs(&self, _t: f64, y: &[f64], dydt: &mut [f64]) {
        let p = &self.params;
        dydt[0] = (p.k_set * (self.target_pressure() - y[0])).clamp(-p.release_rate, p.apply_rate);
    }
}

impl Device for LocoCrane {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn step(&mut self, t: f64, dt: f64) {
        let mut y = std::mem::take(&mut self.y);
        self.integrator.step(self, t, &mut y, dt);
        self.y = y;
        self.brake_cyl_flow = self.cylinder_flow(self.y[0]);
    }
}

impl Publish for LocoCrane {
    type Outputs = LocoCraneOutputs;

    fn outputs(&self) -> LocoCraneOutputs {
        LocoCraneOutputs {
            brake_cyl_flow: self.brake_cyl_flow,
            set_pressure: self.set_pressure(),
            handle_position: self.handle_position,
        }
    }
}
