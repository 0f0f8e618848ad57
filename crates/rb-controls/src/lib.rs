//! Driver controls for railbrake.
//!
//! This crate holds the discrete side of the vehicle: what the driver can
//! press and what stays latched between ticks.
//!
//! - [`ControlSnapshot`]: controls held during one tick, sampled once
//! - [`EdgeDetector`]: turns held controls into one-shot presses
//! - [`Trigger`]: a latched toggle switch (tumbler)
//! - [`ReverserLatch`]: three-position reverser, movable only at standstill
//! - [`TractionLevel`]: requested traction in `[0, 1]`

pub mod error;
pub mod input;
pub mod reverser;
pub mod traction;
pub mod trigger;

pub use error::ControlError;
pub use input::{Control, ControlSnapshot, EdgeDetector};
pub use reverser::{Reverser, ReverserLatch};
pub use traction::TractionLevel;
pub use trigger::Trigger;
