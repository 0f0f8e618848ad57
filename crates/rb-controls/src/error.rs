//! Error types for driver controls.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Reverser position outside {-1, 0, 1}.
    #[error("Invalid reverser position: {value}")]
    InvalidReverser { value: i64 },
}
