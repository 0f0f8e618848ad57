//! Air distributor (No. 242 type): triple-valve logic between brake pipe,
//! supply reservoir and brake cylinder.
//!
//! The working chamber remembers the charged brake-pipe level. While the brake
//! pipe sits below it by more than the sensitivity threshold the distributor
//! is in *brake* mode and drives the cylinder towards
//! `ratio * (p_wc - p_tm)`; a rise of the brake pipe lowers that target and
//! vents the cylinder; back at the working-chamber level it is in *release*
//! mode, the cylinder vents completely and the supply reservoir recharges from
//! the brake pipe. Slow reductions below the threshold are followed by the
//! working chamber and do not brake.

use crate::common::{check_positive, valve_opening};
use crate::error::ComponentResult;
use crate::traits::{Device, Publish};
use rb_core::ode::{IntegratorKind, OdeSystem};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirDistributorParams {
    /// Working chamber volume (m³)
    pub wc_volume: f64,
    /// Working chamber charging rate (1/s)
    pub k_wc: f64,
    /// Cylinder pressure per unit of brake-pipe reduction
    pub ratio: f64,
    /// Maximum cylinder pressure (MPa)
    pub p_bc_max: f64,
    /// Cylinder filling/venting coefficient (m³/s)
    pub k_bc: f64,
    /// Cylinder pressure error at which the valve opens fully (MPa)
    pub band: f64,
    /// Supply reservoir recharge coefficient (m³/s)
    pub k_supply: f64,
    /// Brake-pipe reduction that switches to brake mode (MPa)
    pub sensitivity: f64,
}

impl Default for AirDistributorParams {
    fn default() -> Self {
        Self {
            wc_volume: 0.006,
            k_wc: 0.5,
            ratio: 2.5,
            p_bc_max: 0.4,
            k_bc: 0.01,
            band: 0.05,
            k_supply: 0.002,
            sensitivity: 0.01,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistributorMode {
    #[default]
    Release,
    Brake,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AirDistributorOutputs {
    pub brake_cyl_flow: f64,
    pub supply_flow: f64,
    pub aux_rate: f64,
    pub mode: DistributorMode,
}

#[derive(Debug, Clone)]
pub struct AirDistributor {
    params: AirDistributorParams,
    brake_pipe_pressure: f64,
    supply_pressure: f64,
    brake_cyl_pressure: f64,
    mode: DistributorMode,
    brake_cyl_flow: f64,
    supply_flow: f64,
    aux_rate: f64,
    integrator: IntegratorKind,
    /// [p_wc]
    y: Vec<f64>,
}

impl AirDistributor {
    pub fn new(params: AirDistributorParams) -> ComponentResult<Self> {
        check_positive(params.wc_volume, "distributor working chamber volume")?;
        check_positive(params.k_wc, "distributor k_wc")?;
        check_positive(params.ratio, "distributor ratio")?;
        check_positive(params.p_bc_max, "distributor p_bc_max")?;
        check_positive(params.k_bc, "distributor k_bc")?;
        check_positive(params.band, "distributor band")?;
        check_positive(params.k_supply, "distributor k_supply")?;
        check_positive(params.sensitivity, "distributor sensitivity")?;
        Ok(Self {
            params,
            brake_pipe_pressure: 0.0,
            supply_pressure: 0.0,
            brake_cyl_pressure: 0.0,
            mode: DistributorMode::Release,
            brake_cyl_flow: 0.0,
            supply_flow: 0.0,
            aux_rate: 0.0,
            integrator: IntegratorKind::default(),
            y: vec![0.0],
        })
    }

    pub fn with_integrator(mut self, integrator: IntegratorKind) -> Self {
        self.integrator = integrator;
        self
    }

    pub fn set_brake_pipe_pressure(&mut self, p: f64) {
        self.brake_pipe_pressure = p;
    }

    pub fn set_air_supply_pressure(&mut self, p: f64) {
        self.supply_pressure = p;
    }

    pub fn set_brake_cylinder_pressure(&mut self, p: f64) {
        self.brake_cyl_pressure = p;
    }

    /// Charge the working chamber to `p` (distributor fully released).
    pub fn init(&mut self, p: f64) {
        self.y[0] = p;
        self.mode = DistributorMode::Release;
    }

    pub fn working_chamber_pressure(&self) -> f64 {
        self.y[0]
    }

    pub fn mode(&self) -> DistributorMode {
        self.mode
    }

    pub fn brake_cylinder_air_flow(&self) -> f64 {
        self.brake_cyl_flow
    }

    pub fn air_supply_flow(&self) -> f64 {
        self.supply_flow
    }

    /// Air drawn from the brake pipe by the distributor (MPa·m³/s).
    pub fn aux_rate(&self) -> f64 {
        self.aux_rate
    }

    fn classify(&self, p_wc: f64) -> DistributorMode {
        if self.brake_pipe_pressure < p_wc - self.params.sensitivity {
            DistributorMode::Brake
        } else {
            DistributorMode::Release
        }
    }

    /// Cylinder pressure the distributor is driving towards.
    pub fn target_cylinder_pressure(&self) -> f64 {
        match self.classify(self.y[0]) {
            DistributorMode::Brake => (self.params.ratio
                * (self.y[0] - self.brake_pipe_pressure))
                .clamp(0.0, self.params.p_bc_max),
            DistributorMode::Release => 0.0,
        }
    }

    fn charge_flow(&self, p_wc: f64) -> f64 {
        match self.classify(p_wc) {
            DistributorMode::Release => {
                self.params.k_wc * self.params.wc_volume * (self.brake_pipe_pressure - p_wc)
            }
            DistributorMode::Brake => 0.0,
        }
    }
}

impl OdeSystem for AirDistributor {
    fn rhs(&self, _t: f64, y: &[f64], dydt: &mut [f64]) {
        dydt[0] = self.charge_flow(y[0]) / self.params.wc_volume;
    }
}

impl Device for AirDistributor {
    fn name(&self) -> &str {
        "vr242"
    }

    fn step(&mut self, t: f64, dt: f64) {
        self.mode = self.classify(self.y[0]);

        let p = &self.params;
        let p_bc = self.brake_cyl_pressure;
        let opening = valve_opening(self.target_cylinder_pressure() - p_bc, p.band);
        let (bc_flow, supply_flow) = if opening > 0.0 {
            let q = p.k_bc * (self.supply_pressure - p_bc).max(0.0) * opening;
            (q, -q)
        } else {
            let q = p.k_bc * p_bc.max(0.0) * opening;
            let recharge = match self.mode {
                DistributorMode::Release => {
                    p.k_supply * (self.brake_pipe_pressure - self.supply_pressure).max(0.0)
                }
                DistributorMode::Brake => 0.0,
            };
            (q, recharge)
        };
        self.aux_rate = supply_flow.max(0.0) + self.charge_flow(self.y[0]).max(0.0);
        self.brake_cyl_flow = bc_flow;
        self.supply_flow = supply_flow;

        let mut y = std::mem::take(&mut self.y);
        self.integrator.step(self, t, &mut y, dt);
        self.y = y;
    }
}

impl Publish for AirDistributor {
    type Outputs = AirDistributorOutputs;

    fn outputs(&self) -> AirDistributorOutputs {
        AirDistributorOutputs {
            brake_cyl_flow: self.brake_cyl_flow,
            supply_flow: self.supply_flow,
            aux_rate: self.aux_rate,
            mode: self.mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn charged(p: f64) -> AirDistributor {
        let mut vr = AirDistributor::new(AirDistributorParams::default()).unwrap();
        vr.init(p);
        vr.set_brake_pipe_pressure(p);
        vr.set_air_supply_pressure(p);
        vr
    }

    #[test]
    fn steady_pipe_holds_released() {
        let mut vr = charged(0.5);
        vr.step(0.0, 0.01);
        assert_eq!(vr.mode(), DistributorMode::Release);
        assert_eq!(vr.brake_cylinder_air_flow(), 0.0);
    }

    #[test]
    fn pipe_drop_fills_cylinder_from_supply() {
        let mut vr = charged(0.5);
        vr.set_brake_pipe_pressure(0.45);
        vr.step(0.0, 0.01);
        assert_eq!(vr.mode(), DistributorMode::Brake);
        assert!(vr.brake_cylinder_air_flow() > 0.0);
        assert!(vr.air_supply_flow() < 0.0);
        assert!((vr.target_cylinder_pressure() - 0.125).abs() < 1e-12);
    }

    #[test]
    fn cylinder_at_target_holds() {
        let mut vr = charged(0.5);
        vr.set_brake_pipe_pressure(0.45);
        vr.set_brake_cylinder_pressure(0.125);
        vr.step(0.0, 0.01);
        assert!(vr.brake_cylinder_air_flow().abs() < 1e-12);
    }

    #[test]
    fn pipe_rise_vents_cylinder() {
        let mut vr = charged(0.5);
        vr.set_brake_pipe_pressure(0.45);
        vr.set_brake_cylinder_pressure(0.125);
        vr.step(0.0, 0.01);

        vr.set_brake_pipe_pressure(0.5);
        vr.step(0.01, 0.01);
        assert_eq!(vr.mode(), DistributorMode::Release);
        assert!(vr.brake_cylinder_air_flow() < 0.0);
    }

    #[test]
    fn slow_reduction_is_followed_without_braking() {
        let mut vr = charged(0.5);
        let mut p = 0.5;
        for i in 0..100 {
            p -= 0.000_05;
            vr.set_brake_pipe_pressure(p);
            vr.step(i as f64 * 0.01, 0.01);
            assert_eq!(vr.mode(), DistributorMode::Release);
        }
        assert!(vr.working_chamber_pressure() < 0.5);
    }

    #[test]
    fn release_recharges_supply_reservoir() {
        let mut vr = charged(0.5);
        vr.set_air_supply_pressure(0.3);
        vr.step(0.0, 0.01);
        assert!(vr.air_supply_flow() > 0.0);
        assert!(vr.aux_rate() > 0.0);
    }
}
