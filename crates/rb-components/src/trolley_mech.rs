//! Truck brake rigging: cylinder pressure and speed to shoe force and torque.

use crate::common::{check_non_negative, check_positive};
use crate::error::ComponentResult;
use crate::traits::{Device, Publish};
use rb_core::ode::{IntegratorKind, OdeSystem};
use rb_core::units::{mpa_to_pa, mps_to_kmh};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrolleyBrakeMechParams {
    /// Total volume of the truck's brake cylinders (m³)
    pub cyl_volume: f64,
    /// Number of brake cylinders on the truck
    pub cyl_count: u32,
    /// Piston area of one cylinder (m²)
    pub cyl_area: f64,
    /// Cylinder pressure needed to take up slack and overcome the release spring (MPa)
    pub slack_pressure: f64,
    /// Rigging lever ratio
    pub lever_ratio: f64,
    /// Rigging efficiency
    pub efficiency: f64,
    /// Number of brake shoes on the truck
    pub shoe_count: u32,
    /// Number of wheel pairs on the truck
    pub axle_count: u32,
    /// Wheel diameter (m)
    pub wheel_diameter: f64,
}

impl Default for TrolleyBrakeMechParams {
    fn default() -> Self {
        Self {
            cyl_volume: 0.008,
            cyl_count: 4,
            cyl_area: 0.0507,
            slack_pressure: 0.03,
            lever_ratio: 3.0,
            efficiency: 0.95,
            shoe_count: 8,
            axle_count: 2,
            wheel_diameter: 1.05,
        }
    }
}

/// Cast-iron shoe friction coefficient.
///
/// `shoe_force_kn` is the pressing force of one shoe, `v_kmh` the speed
/// magnitude. Falls with speed and with pressing force.
pub fn shoe_friction_coeff(shoe_force_kn: f64, v_kmh: f64) -> f64 {
    let k = shoe_force_kn.max(0.0);
    let v = v_kmh.abs();
    0.6 * (16.0 * k + 100.0) / (80.0 * k + 100.0) * (v + 100.0) / (5.0 * v + 100.0)
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrolleyBrakeMechOutputs {
    pub brake_cyl_pressure: f64,
    /// Total shoe force on the truck (N)
    pub shoe_force: f64,
    /// Brake torque on each wheel pair (N·m)
    pub brake_torque: f64,
}

#[derive(Debug, Clone)]
pub struct TrolleyBrakeMech {
    name: String,
    params: TrolleyBrakeMechParams,
    air_flow: f64,
    velocity: f64,
    shoe_force: f64,
    brake_torque: f64,
    integrator: IntegratorKind,
    /// [p_bc]
    y: Vec<f64>,
}

impl TrolleyBrakeMech {
    pub fn new(name: impl Into<String>, params: TrolleyBrakeMechParams) -> ComponentResult<Self> {
        check_positive(params.cyl_volume, "trolley cylinder volume")?;
        check_positive(params.cyl_area, "trolley cylinder area")?;
        check_non_negative(params.slack_pressure, "trolley slack pressure")?;
        check_positive(params.lever_ratio, "trolley lever ratio")?;
        check_positive(params.efficiency, "trolley efficiency")?;
        check_positive(params.wheel_diameter, "trolley wheel diameter")?;
        if params.shoe_count == 0 || params.axle_count == 0 || params.cyl_count == 0 {
            return Err(crate::ComponentError::InvalidArg {
                what: "trolley cylinder, shoe and axle counts must be non-zero",
            });
        }
        Ok(Self {
            name: name.into(),
            params,
            air_flow: 0.0,
            velocity: 0.0,
            shoe_force: 0.0,
            brake_torque: 0.0,
            integrator: IntegratorKind::default(),
            y: vec![0.0],
        })
    }

    pub fn with_integrator(mut self, integrator: IntegratorKind) -> Self {
        self.integrator = integrator;
        self
    }

    pub fn params(&self) -> &TrolleyBrakeMechParams {
        &self.params
    }

    pub fn set_air_flow(&mut self, q: f64) {
        self.air_flow = q;
    }

    /// Vehicle speed, m/s.
    pub fn set_velocity(&mut self, v: f64) {
        self.velocity = v;
    }

    pub fn set_y(&mut self, i: usize, value: f64) {
        if let Some(y) = self.y.get_mut(i) {
            *y = value;
        }
    }

    pub fn brake_cylinder_pressure(&self) -> f64 {
        self.y[0]
    }

    pub fn shoe_force(&self) -> f64 {
        self.shoe_force
    }

    pub fn brake_torque(&self) -> f64 {
        self.brake_torque
    }

    /// Total shoe force for a cylinder pressure: zero up to the slack pressure,
    /// linear above it.
    pub fn shoe_force_at(&self, p_bc: f64) -> f64 {
        let p = &self.params;
        let p_eff = (p_bc - p.slack_pressure).max(0.0);
        mpa_to_pa(p_eff) * p.cyl_area * f64::from(p.cyl_count) * p.lever_ratio * p.efficiency
    }

    fn update_forces(&mut self) {
        let p = &self.params;
        let shoe_force = self.shoe_force_at(self.y[0]);
        let per_shoe_kn = shoe_force / f64::from(p.shoe_count) / 1000.0;
        let phi = shoe_friction_coeff(per_shoe_kn, mps_to_kmh(self.velocity));
        self.shoe_force = shoe_force;
        self.brake_torque = phi * shoe_force * p.wheel_diameter / 2.0 / f64::from(p.axle_count);
    }
}

impl OdeSystem for TrolleyBrakeMech {
    fn rhs(&self, _t: f64, _y: &[f64], dydt: &mut [f64]) {
        dydt[0] = self.air_flow / self.params.cyl_volume;
    }
}

impl Device for TrolleyBrakeMech {
    fn name(&self) -> &str {
        &self.name
    }

    fn step(&mut self, t: f64, dt: f64) {
        let mut y = std::mem::take(&mut self.y);
        self.integrator.step(self, t, &mut y, dt);
        self.y = y;
        self.update_forces();
    }
}

impl Publish for TrolleyBrakeMech {
    type Outputs = TrolleyBrakeMechOutputs;

    fn outputs(&self) -> TrolleyBrakeMechOutputs {
        TrolleyBrakeMechOutputs {
            brake_cyl_pressure: self.brake_cylinder_pressure(),
            shoe_force: self.shoe_force,
            brake_torque: self.brake_torque,
        }
    }
}
