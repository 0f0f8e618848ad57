//! Core traits for device models.

use crate::sound::SoundSink;

/// A physical device owned by the vehicle and advanced once per tick.
///
/// Inputs are pushed through typed setters before `step`; outputs are read
/// through [`Publish::outputs`] after it. `step` never fails: a device that was
/// built successfully can always be advanced.
pub trait Device {
    /// Device name for diagnostics.
    fn name(&self) -> &str;

    /// Advance internal state from `t` to `t + dt`.
    fn step(&mut self, t: f64, dt: f64);

    /// Forward sound events produced during the last `step`, in emission order.
    ///
    /// Devices without sounds keep the default no-op.
    fn drain_sounds(&mut self, _sink: &mut dyn SoundSink) {}
}

/// Separates a device's published outputs from its in-progress state.
///
/// The returned record is a snapshot: holding it does not borrow the device,
/// so the vehicle can hold last tick's outputs while the device is stepped.
pub trait Publish {
    type Outputs: Copy + Default + std::fmt::Debug;

    fn outputs(&self) -> Self::Outputs;
}
