//! rb-core: stable foundation for railbrake.
//!
//! Contains:
//! - units (uom SI types + constructors, km/h conversions)
//! - numeric (tolerant comparison, parameter checks)
//! - ode (fixed-step integrators for device state vectors)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod ode;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{RbError, RbResult};
pub use numeric::*;
pub use ode::{ForwardEuler, IntegratorKind, OdeSystem, Rk4, Stepper};
pub use units::*;
