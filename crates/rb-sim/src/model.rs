//! Host-facing vehicle capability.

use rb_controls::ControlSnapshot;
use rb_project::ProjectResult;
use std::path::Path;

/// What a host needs from a vehicle model.
///
/// A host holds only this handle: it feeds controls, initializes the brakes
/// once and then calls [`VehicleModel::step`] every tick.
pub trait VehicleModel {
    /// Advance the vehicle from `t` to `t + dt`. `dt` must be positive and
    /// small against the fastest device time constant.
    fn step(&mut self, t: f64, dt: f64);

    /// Sample the driver's controls for the coming tick.
    fn process_control_input(&mut self, controls: &ControlSnapshot);

    /// Read traction parameters from a vehicle document.
    ///
    /// On failure the current values are kept, a warning is logged and the
    /// error is returned for the host to inspect.
    fn load_configuration(&mut self, path: &Path) -> ProjectResult<()>;

    /// Set the initial brake-pipe, train-line and feed-line pressures, then
    /// apply the configured brake state.
    fn initialize_braking(&mut self, p0: f64, p_tm: f64, p_fl: f64);
}
