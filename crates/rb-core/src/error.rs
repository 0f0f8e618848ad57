use thiserror::Error;

pub type RbResult<T> = Result<T, RbError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RbError {
    #[error("Non-finite value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}
