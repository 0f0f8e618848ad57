//! rb-components: device library for the ER2T brake and auxiliary network.
//!
//! Provides models for:
//! - Pressure vessels (main and supply reservoirs)
//! - Flow-network nodes: switching valve, splitter, pneumatic relay
//! - Driver's cranes (No. 395 train crane, No. 254 loco crane) and the
//!   No. 367 brake-lock device
//! - The No. 242 air distributor and the trolley brake mechanism
//! - Auxiliary machines: phase splitter, motor fans, motor compressor,
//!   pressure regulator, horn
//!
//! Every device implements [`Device`]; devices with outputs read by other
//! devices also implement [`Publish`]. Inputs are plain setters, so the
//! wiring between devices lives entirely in the vehicle.
//!
//! # Example
//!
//! ```
//! use rb_components::{Device, Reservoir};
//!
//! let mut main_res = Reservoir::new("main-reservoir", 1.0).unwrap();
//! main_res.set_air_flow(0.01);
//! main_res.step(0.0, 1.0);
//! assert!((main_res.pressure() - 0.01).abs() < 1e-9);
//! ```

pub mod air_distributor;
pub mod brake_crane;
pub mod brake_lock;
pub mod common;
pub mod error;
pub mod horn;
pub mod loco_crane;
pub mod motor_compressor;
pub mod motor_fan;
pub mod phase_splitter;
pub mod pressure_regulator;
pub mod relay;
pub mod reservoir;
pub mod rotor;
pub mod sound;
pub mod splitter;
pub mod switching_valve;
pub mod traits;
pub mod trolley_mech;

// Re-exports
pub use air_distributor::{AirDistributor, AirDistributorOutputs, AirDistributorParams, DistributorMode};
pub use brake_crane::{BrakeCrane, BrakeCraneOutputs, BrakeCraneParams, CraneMode, CranePosition};
pub use brake_lock::{BrakeLock, BrakeLockOutputs, BrakeLockParams, CombineCranePos};
pub use error::{ComponentError, ComponentResult};
pub use horn::TrainHorn;
pub use loco_crane::{LocoCrane, LocoCraneOutputs, LocoCraneParams};
pub use motor_compressor::{MotorCompressor, MotorCompressorOutputs, MotorCompressorParams};
pub use motor_fan::{MotorFan, MotorFanOutputs};
pub use phase_splitter::{PhaseSplitter, PhaseSplitterOutputs};
pub use pressure_regulator::{PressureRegulator, PressureRegulatorOutputs, PressureRegulatorParams};
pub use relay::{PneumoRelay, PneumoRelayOutputs, PneumoRelayParams};
pub use reservoir::{Reservoir, ReservoirOutputs};
pub use rotor::RotorParams;
pub use sound::{NullSink, RecordingSink, SoundEvent, SoundSink};
pub use splitter::{PneumoSplitter, SplitterOutputs, SplitterParams};
pub use switching_valve::{SwitchingValve, SwitchingValveOutputs, SwitchingValveParams};
pub use traits::{Device, Publish};
pub use trolley_mech::{TrolleyBrakeMech, TrolleyBrakeMechOutputs, TrolleyBrakeMechParams};
