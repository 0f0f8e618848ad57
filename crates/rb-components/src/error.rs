//! Error types for component construction and commands.

use rb_core::error::RbError;
use thiserror::Error;

/// Errors raised while building a device or applying a discrete command to it.
///
/// Stepping never fails; these only surface at construction and when a host or
/// configuration asks for a handle position or latch state that does not exist.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("{device}: position {position} outside 0..{count}")]
    UnknownPosition {
        device: &'static str,
        position: i64,
        count: usize,
    },

    #[error("{device}: unsupported state {state}")]
    UnknownState { device: &'static str, state: i64 },
}

pub type ComponentResult<T> = Result<T, ComponentError>;

impl From<RbError> for ComponentError {
    fn from(e: RbError) -> Self {
        match e {
            RbError::NonFinite { what, .. } => ComponentError::NonPhysical { what },
            RbError::InvalidArg { what } => ComponentError::InvalidArg { what },
        }
    }
}
