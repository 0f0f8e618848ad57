//! Pressure vessel integrating net air flow into pressure.

use crate::common::{check_non_negative, check_positive};
use crate::error::ComponentResult;
use crate::traits::{Device, Publish};
use rb_core::ode::{IntegratorKind, OdeSystem};

/// Outputs published by a reservoir after each step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReservoirOutputs {
    /// Gauge pressure, MPa
    pub pressure: f64,
}

/// Lumped pressure vessel.
///
/// Dynamics: `dp/dt = (Q - k_leak * p) / V`, with `Q` the external air flow
/// (MPa·m³/s). Pressure never goes below zero.
#[derive(Debug, Clone)]
pub struct Reservoir {
    name: String,
    /// Volume (m³)
    volume: f64,
    /// Leak coefficient (m³/s)
    flow_coeff: f64,
    /// External air flow into the vessel
    air_flow: f64,
    integrator: IntegratorKind,
    y: Vec<f64>,
}

impl Reservoir {
    pub fn new(name: impl Into<String>, volume: f64) -> ComponentResult<Self> {
        check_positive(volume, "reservoir volume must be positive")?;
        Ok(Self {
            name: name.into(),
            volume,
            flow_coeff: 0.0,
            air_flow: 0.0,
            integrator: IntegratorKind::default(),
            y: vec![0.0],
        })
    }

    pub fn with_integrator(mut self, integrator: IntegratorKind) -> Self {
        self.integrator = integrator;
        self
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn set_air_flow(&mut self, q: f64) {
        self.air_flow = q;
    }

    pub fn air_flow(&self) -> f64 {
        self.air_flow
    }

    pub fn set_flow_coeff(&mut self, k: f64) -> ComponentResult<()> {
        check_non_negative(k, "reservoir flow coefficient")?;
        self.flow_coeff = k;
        Ok(())
    }

    pub fn flow_coeff(&self) -> f64 {
        self.flow_coeff
    }

    /// Overwrite state variable `i`. Index 0 is the pressure.
    pub fn set_y(&mut self, i: usize, value: f64) {
        if let Some(y) = self.y.get_mut(i) {
            *y = value.max(0.0);
        }
    }

    pub fn pressure(&self) -> f64 {
        self.y[0]
    }

    /// Net flow the vessel would integrate at pressure `p`.
    pub fn net_flow(&self, p: f64) -> f64 {
        self.air_flow - self.flow_coeff * p
    }
}

impl OdeSystem for Reservoir {
    fn rhs(&self, _t: f64, y: &[f64], dydt: &mut [f64]) {
        dydt[0] = self.net_flow(y[0]) / self.volume;
    }
}

impl Device for Reservoir {
    fn name(&self) -> &str {
        &self.name
    }

    fn step(&mut self, t: f64, dt: f64) {
        let mut y = std::mem::take(&mut self.y);
        self.integrator.step(self, t, &mut y, dt);
        y[0] = y[0].max(0.0);
        self.y = y;
    }
}

impl Publish for Reservoir {
    type Outputs = ReservoirOutputs;

    fn outputs(&self) -> ReservoirOutputs {
        ReservoirOutputs {
            pressure: self.pressure(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rejects_non_positive_volume() {
        assert!(Reservoir::new("gr", 0.0).is_err());
        assert!(Reservoir::new("gr", -1.0).is_err());
    }

    #[test]
    fn constant_inflow_raises_pressure_linearly() {
        let mut r = Reservoir::new("gr", 1.2).unwrap();
        r.set_air_flow(0.012);
        for i in 0..100 {
            r.step(i as f64 * 0.01, 0.01);
        }
        // dp/dt = 0.01 MPa/s for 1 s
        assert!((r.pressure() - 0.01).abs() < 1e-9);
    }

    #[test]
    fn outflow_never_drives_pressure_negative() {
        let mut r = Reservoir::new("zr", 0.078).unwrap();
        r.set_y(0, 0.001);
        r.set_air_flow(-1.0);
        r.step(0.0, 0.1);
        assert_eq!(r.pressure(), 0.0);
    }

    #[test]
    fn leak_settles_at_flow_balance() {
        let mut r = Reservoir::new("gr", 0.1).unwrap();
        r.set_flow_coeff(0.01).unwrap();
        r.set_air_flow(0.005);
        for i in 0..20_000 {
            r.step(i as f64 * 0.01, 0.01);
        }
        assert!((r.pressure() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn set_y_ignores_unknown_index() {
        let mut r = Reservoir::new("gr", 1.0).unwrap();
        r.set_y(3, 1.0);
        assert_eq!(r.pressure(), 0.0);
    }

    proptest! {
        #[test]
        fn pressure_moves_with_net_flow(
            p0 in 0.0f64..1.0,
            steps in proptest::collection::vec(
                (-0.05f64..0.05, 0.0f64..0.1, 0.001f64..0.1),
                1..50,
            ),
        ) {
            let mut r = Reservoir::new("gr", 1.0).unwrap();
            r.set_y(0, p0);
            let mut t = 0.0;
            for (q, k, dt) in steps {
                r.set_air_flow(q);
                r.set_flow_coeff(k).unwrap();
                let before = r.pressure();
                let flow = r.net_flow(before);
                r.step(t, dt);
                t += dt;
                let after = r.pressure();
                prop_assert!(after >= 0.0);
                if flow > 0.0 {
                    prop_assert!(after >= before, "net inflow {} lowered {} to {}", flow, before, after);
                } else if flow < 0.0 {
                    prop_assert!(after <= before, "net outflow {} raised {} to {}", flow, before, after);
                } else {
                    prop_assert!((after - before).abs() < 1e-12);
                }
            }
        }
    }
}
