//! Error types for vehicle construction.

use crate::devices::DeviceSlot;
use thiserror::Error;

/// Errors raised while building a vehicle. Stepping never fails.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Cannot build {slot:?}: {source}")]
    Device {
        slot: DeviceSlot,
        #[source]
        source: rb_components::ComponentError,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] rb_project::ProjectError),
}

pub type SimResult<T> = Result<T, SimError>;

impl From<rb_project::ValidationError> for SimError {
    fn from(e: rb_project::ValidationError) -> Self {
        SimError::Config(e.into())
    }
}
