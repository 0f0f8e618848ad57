//! Pipe tee: one inlet partitioned between two outlets.

use crate::common::{check_positive, orifice_flow};
use crate::error::ComponentResult;
use crate::traits::{Device, Publish};
use rb_core::ode::{IntegratorKind, OdeSystem};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitterParams {
    /// Internal volume of the tee (m³)
    pub volume: f64,
    /// Flow coefficient towards outlet 1 (m³/s)
    pub k1: f64,
    /// Flow coefficient towards outlet 2 (m³/s)
    pub k2: f64,
}

impl Default for SplitterParams {
    fn default() -> Self {
        Self {
            volume: 0.002,
            k1: 0.02,
            k2: 0.02,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SplitterOutputs {
    pub p_in: f64,
    pub q_out1: f64,
    pub q_out2: f64,
}

#[derive(Debug, Clone)]
pub struct PneumoSplitter {
    params: SplitterParams,
    q_in: f64,
    p_out1: f64,
    p_out2: f64,
    integrator: IntegratorKind,
    /// [p_in]
    y: Vec<f64>,
}

impl PneumoSplitter {
    pub fn new(params: SplitterParams) -> ComponentResult<Self> {
        check_positive(params.volume, "splitter volume")?;
        check_positive(params.k1, "splitter k1")?;
        check_positive(params.k2, "splitter k2")?;
        Ok(Self {
            params,
            q_in: 0.0,
            p_out1: 0.0,
            p_out2: 0.0,
            integrator: IntegratorKind::default(),
            y: vec![0.0],
        })
    }

    pub fn with_integrator(mut self, integrator: IntegratorKind) -> Self {
        self.integrator = integrator;
        self
    }

    pub fn set_q_in(&mut self, q: f64) {
        self.q_in = q;
    }

    pub fn set_p_out1(&mut self, p: f64) {
        self.p_out1 = p;
    }

    pub fn set_p_out2(&mut self, p: f64) {
        self.p_out2 = p;
    }

    pub fn p_in(&self) -> f64 {
        self.y[0]
    }

    pub fn q_out1(&self) -> f64 {
        orifice_flow(self.params.k1, self.y[0], self.p_out1)
    }

    pub fn q_out2(&self) -> f64 {
        orifice_flow(self.params.k2, self.y[0], self.p_out2)
    }
}

impl OdeSystem for PneumoSplitter {
    fn rhs(&self, _t: f64, y: &[f64], dydt: &mut [f64]) {
        let q1 = orifice_flow(self.params.k1, y[0], self.p_out1);
        let q2 = orifice_flow(self.params.k2, y[0], self.p_out2);
        dydt[0] = (self.q_in - q1 - q2) / self.params.volume;
    }
}

impl Device for PneumoSplitter {
    fn name(&self) -> &str {
        "pneumo-splitter"
    }

    fn step(&mut self, t: f64, dt: f64) {
        let mut y = std::mem::take(&mut self.y);
        self.integrator.step(self, t, &mut y, dt);
        self.y = y;
    }
}

impl Publish for PneumoSplitter {
    type Outputs = SplitterOutputs;

    fn outputs(&self) -> SplitterOutputs {
        SplitterOutputs {
            p_in: self.p_in(),
            q_out1: self.q_out1(),
            q_out2: self.q_out2(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_outlets_share_flow_evenly() {
        let mut tee = PneumoSplitter::new(SplitterParams::default()).unwrap();
        tee.set_q_in(0.001);
        for i in 0..50 {
            tee.step(i as f64 * 0.01, 0.01);
        }
        assert!(tee.p_in() > 0.0);
        assert!((tee.q_out1() - tee.q_out2()).abs() < 1e-12);
    }

    #[test]
    fn settles_where_inflow_equals_outflow() {
        let mut tee = PneumoSplitter::new(SplitterParams::default()).unwrap();
        tee.set_q_in(0.004);
        tee.set_p_out1(0.1);
        tee.set_p_out2(0.1);
        for i in 0..2_000 {
            tee.step(i as f64 * 0.01, 0.01);
        }
        let out = tee.outputs();
        assert!((out.q_out1 + out.q_out2 - 0.004).abs() < 1e-9);
        // 0.004 = 0.04 * (p_in - 0.1)
        assert!((out.p_in - 0.2).abs() < 1e-6);
    }
}
