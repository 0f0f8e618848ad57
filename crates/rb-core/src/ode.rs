//! Fixed-step integrators for device state vectors.
//!
//! Every dynamic device keeps its state in a `Vec<f64>` and exposes the
//! right-hand side `dy/dt = f(t, y)` through [`OdeSystem`]. The vehicle never
//! solves implicitly: one call to [`Stepper::step`] advances one device by one
//! tick, explicitly.

use serde::{Deserialize, Serialize};

/// Right-hand side of a first-order ODE system.
pub trait OdeSystem {
    /// Compute `dydt = f(t, y)`. `dydt` has the same length as `y` and is zeroed
    /// before the call.
    fn rhs(&self, t: f64, y: &[f64], dydt: &mut [f64]);
}

/// Trait for fixed-step integrators.
pub trait Stepper {
    /// Advance `y` in place from `t` to `t + dt`.
    fn step<S: OdeSystem + ?Sized>(&self, system: &S, t: f64, y: &mut [f64], dt: f64);
}

/// Integrator selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[derive(Serialize, Deserialize)]
pub enum IntegratorKind {
    /// 4th-order Runge-Kutta (default, 4 rhs calls per step).
    #[default]
    Rk4,
    /// Forward Euler (1st-order, 1 rhs call per step).
    ForwardEuler,
}

impl IntegratorKind {
    pub fn step<S: OdeSystem + ?Sized>(self, system: &S, t: f64, y: &mut [f64], dt: f64) {
        match self {
            IntegratorKind::Rk4 => Rk4.step(system, t, y, dt),
            IntegratorKind::ForwardEuler => ForwardEuler.step(system, t, y, dt),
        }
    }
}

/// Classical RK4 (Runge-Kutta 4th order) integrator.
#[derive(Clone, Debug)]
pub struct Rk4;

impl Stepper for Rk4 {
    fn step<S: OdeSystem + ?Sized>(&self, system: &S, t: f64, y: &mut [f64], dt: f64) {
        let n = y.len();
        let mut k1 = vec![0.0; n];
        let mut k2 = vec![0.0; n];
        let mut k3 = vec![0.0; n];
        let mut k4 = vec![0.0; n];
        let mut tmp = vec![0.0; n];

        system.rhs(t, y, &mut k1);

        for i in 0..n {
            tmp[i] = y[i] + 0.5 * dt * k1[i];
        }
        system.rhs(t + 0.5 * dt, &tmp, &mut k2);

        for i in 0..n {
            tmp[i] = y[i] + 0.5 * dt * k2[i];
        }
        system.rhs(t + 0.5 * dt, &tmp, &mut k3);

        for i in 0..n {
            tmp[i] = y[i] + dt * k3[i];
        }
        system.rhs(t + dt, &tmp, &mut k4);

        // Combine: y_new = y + (dt/6) * (k1 + 2*k2 + 2*k3 + k4)
        for i in 0..n {
            y[i] += dt / 6.0 * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
        }
    }
}

/// Forward Euler (explicit, 1st order, fast for testing).
#[derive(Clone, Debug)]
pub struct ForwardEuler;

impl Stepper for ForwardEuler {
    fn step<S: OdeSystem + ?Sized>(&self, system: &S, t: f64, y: &mut [f64], dt: f64) {
        let mut dydt = vec![0.0; y.len()];
        system.rhs(t, y, &mut dydt);
        for (yi, di) in y.iter_mut().zip(&dydt) {
            *yi += dt * di;
        }
    }
}
