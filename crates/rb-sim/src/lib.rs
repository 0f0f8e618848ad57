//! rb-sim: the ER2T motor-car vehicle model.
//!
//! [`Er2tVehicle`] owns every device of the brake and auxiliary network,
//! steps them in a fixed order each tick and exposes the host-facing
//! [`VehicleModel`] capability. Device outputs are exchanged through a
//! [`SignalBus`]; sounds go to an injected [`rb_components::SoundSink`].

pub mod bus;
pub mod devices;
pub mod diagnostics;
pub mod error;
pub mod model;
pub mod traction;
pub mod vehicle;

pub use bus::{CouplingMode, NetworkSignals, SignalBus};
pub use devices::{DeviceSet, DeviceSlot};
pub use diagnostics::Status;
pub use error::{SimError, SimResult};
pub use model::VehicleModel;
pub use traction::TractionCharacteristic;
pub use vehicle::Er2tVehicle;
