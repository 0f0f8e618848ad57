//! Pressure repeater relay (No. 304 type).
//!
//! The relay's work chamber is filled by a control line; its output valve feeds
//! the brake cylinder from the pipeline (main reservoir) until cylinder pressure
//! matches work-chamber pressure, and vents to atmosphere when it is above.

use crate::common::{check_positive, valve_opening};
use crate::error::ComponentResult;
use crate::traits::{Device, Publish};
use rb_core::ode::{IntegratorKind, OdeSystem};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PneumoRelayParams {
    /// Work chamber volume (m³)
    pub work_volume: f64,
    /// Filling valve coefficient (m³/s)
    pub k_fill: f64,
    /// Venting valve coefficient (m³/s)
    pub k_vent: f64,
    /// Pressure error at which the valves open fully (MPa)
    pub band: f64,
}

impl Default for PneumoRelayParams {
    fn default() -> Self {
        Self {
            work_volume: 0.001,
            k_fill: 0.01,
            k_vent: 0.01,
            band: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PneumoRelayOutputs {
    pub work_pressure: f64,
    pub brake_cyl_flow: f64,
}

#[derive(Debug, Clone)]
pub struct PneumoRelay {
    params: PneumoRelayParams,
    pipeline_pressure: f64,
    work_air_flow: f64,
    brake_cyl_pressure: f64,
    brake_cyl_flow: f64,
    integrator: IntegratorKind,
    /// [p_work]
    y: Vec<f64>,
}

impl PneumoRelay {
    pub fn new(params: PneumoRelayParams) -> ComponentResult<Self> {
        check_positive(params.work_volume, "relay work volume")?;
        check_positive(params.k_fill, "relay k_fill")?;
        check_positive(params.k_vent, "relay k_vent")?;
        check_positive(params.band, "relay band")?;
        Ok(Self {
            params,
            pipeline_pressure: 0.0,
            work_air_flow: 0.0,
            brake_cyl_pressure: 0.0,
            brake_cyl_flow: 0.0,
            integrator: IntegratorKind::default(),
            y: vec![0.0],
        })
    }

    pub fn with_integrator(mut self, integrator: IntegratorKind) -> Self {
        self.integrator = integrator;
        self
    }

    pub fn set_pipeline_pressure(&mut self, p: f64) {
        self.pipeline_pressure = p;
    }

    pub fn set_work_air_flow(&mut self, q: f64) {
        self.work_air_flow = q;
    }

    pub fn set_brake_cyl_pressure(&mut self, p: f64) {
        self.brake_cyl_pressure = p;
    }

    pub fn work_pressure(&self) -> f64 {
        self.y[0]
    }

    pub fn brake_cyl_air_flow(&self) -> f64 {
        self.brake_cyl_flow
    }

    /// Flow into the cylinder for the current work and cylinder pressures.
    fn cylinder_flow(&self, p_work: f64) -> f64 {
        let p_bc = self.brake_cyl_pressure;
        let opening = valve_opening(p_work - p_bc, self.params.band);
        if opening > 0.0 {
            self.params.k_fill * (self.pipeline_pressure - p_bc).max(0.0) * opening
        } else {
            self.params.k_vent * p_bc.max(0.0) * opening
        }
    }
}

impl OdeSystem for PneumoRelay {
    fn rhs(&self, _t: f64, _y: &[f64], dydt: &mut [f64]) {
        dydt[0] = self.work_air_flow / self.params.work_volume;
    }
}

impl Device for PneumoRelay {
    fn name(&self) -> &str {
        "rd304"
    }

    fn step(&mut self, t: f64, dt: f64) {
        let mut y = std::mem::take(&mut self.y);
        self.integrator.step(self, t, &mut y, dt);
        self.y = y;
        self.brake_cyl_flow = self.cylinder_flow(self.y[0]);
    }
}

impl Publish for PneumoRelay {
    type Outputs = PneumoRelayOutputs;

    fn outputs(&self) -> PneumoRelayOutputs {
        PneumoRelayOutputs {
            work_pressure: self.work_pressure(),
            brake_cyl_flow: self.brake_cyl_flow,
        }
    }
}
