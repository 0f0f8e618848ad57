//! Two-way switching valve: passes the higher of two candidate pressures.

use crate::common::{check_positive, orifice_flow};
use crate::error::ComponentResult;
use crate::traits::{Device, Publish};
use rb_core::ode::{IntegratorKind, OdeSystem};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitchingValveParams {
    /// Volume of inlet chamber 1 (m³)
    pub volume1: f64,
    /// Volume of inlet chamber 2 (m³)
    pub volume2: f64,
    /// Flow coefficient of the common outlet (m³/s)
    pub k_out: f64,
}

impl Default for SwitchingValveParams {
    fn default() -> Self {
        Self {
            volume1: 0.005,
            volume2: 0.005,
            k_out: 0.02,
        }
    }
}

/// Which inlet currently feeds the outlet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValveSide {
    #[default]
    First,
    Second,
}

/// Select the higher pressure. Ties go to the first inlet.
pub fn select_max(p1: f64, p2: f64) -> (ValveSide, f64) {
    if p2 > p1 {
        (ValveSide::Second, p2)
    } else {
        (ValveSide::First, p1)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SwitchingValveOutputs {
    pub pressure1: f64,
    pub pressure2: f64,
    /// `max(pressure1, pressure2)`
    pub pressure: f64,
    /// Flow leaving through the common outlet
    pub output_flow: f64,
}

#[derive(Debug, Clone)]
pub struct SwitchingValve {
    params: SwitchingValveParams,
    input_flow1: f64,
    input_flow2: f64,
    output_pressure: f64,
    output_flow: f64,
    integrator: IntegratorKind,
    /// [p1, p2]
    y: Vec<f64>,
}

impl SwitchingValve {
    pub fn new(params: SwitchingValveParams) -> ComponentResult<Self> {
        check_positive(params.volume1, "switching valve volume1")?;
        check_positive(params.volume2, "switching valve volume2")?;
        check_positive(params.k_out, "switching valve k_out")?;
        Ok(Self {
            params,
            input_flow1: 0.0,
            input_flow2: 0.0,
            output_pressure: 0.0,
            output_flow: 0.0,
            integrator: IntegratorKind::default(),
            y: vec![0.0, 0.0],
        })
    }

    pub fn with_integrator(mut self, integrator: IntegratorKind) -> Self {
        self.integrator = integrator;
        self
    }

    pub fn set_input_flow1(&mut self, q: f64) {
        self.input_flow1 = q;
    }

    pub fn set_input_flow2(&mut self, q: f64) {
        self.input_flow2 = q;
    }

    /// Pressure downstream of the common outlet.
    pub fn set_output_pressure(&mut self, p: f64) {
        self.output_pressure = p;
    }

    pub fn set_y(&mut self, i: usize, value: f64) {
        if let Some(y) = self.y.get_mut(i) {
            *y = value;
        }
    }

    pub fn pressure1(&self) -> f64 {
        self.y[0]
    }

    pub fn pressure2(&self) -> f64 {
        self.y[1]
    }

    pub fn pressure(&self) -> f64 {
        select_max(self.y[0], self.y[1]).1
    }

    pub fn output_flow(&self) -> f64 {
        self.output_flow
    }

    fn outlet_flow(&self, y: &[f64]) -> (ValveSide, f64) {
        let (side, p) = select_max(y[0], y[1]);
        (side, orifice_flow(self.params.k_out, p, self.output_pressure))
    }
}

impl OdeSystem for SwitchingValve {
    fn rhs(&self, _t: f64, y: &[f64], dydt: &mut [f64]) {
        let (side, q_out) = self.outlet_flow(y);
        let (q1, q2) = match side {
            ValveSide::First => (q_out, 0.0),
            ValveSide::Second => (0.0, q_out),
        };
        dydt[0] = (self.input_flow1 - q1) / self.params.volume1;
        dydt[1] = (self.input_flow2 - q2) / self.params.volume2;
    }
}

impl Device for SwitchingValve {
    fn name(&self) -> &str {
        "zpk"
    }

    fn step(&mut self, t: f64, dt: f64) {
        let mut y = std::mem::take(&mut self.y);
        self.integrator.step(self, t, &mut y, dt);
        self.y = y;
        self.output_flow = self.outlet_flow(&self.y).1;
    }
}

impl Publish for SwitchingValve {
    type Outputs = SwitchingValveOutputs;

    fn outputs(&self) -> SwitchingValveOutputs {
        SwitchingValveOutputs {
            pressure1: self.pressure1(),
            pressure2: self.pressure2(),
            pressure: self.pressure(),
            output_flow: self.output_flow,
        }
    }
}
