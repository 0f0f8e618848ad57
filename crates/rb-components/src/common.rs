//! Common utilities for component calculations.

use crate::error::{ComponentError, ComponentResult};
use rb_core::numeric::{ensure_finite, ensure_positive};

/// Ensure a value is finite, returning ComponentError if not.
pub fn check_finite(value: f64, what: &'static str) -> ComponentResult<()> {
    ensure_finite(value, what).map_err(|_| ComponentError::NonPhysical { what })?;
    Ok(())
}

/// Ensure a parameter is strictly positive.
pub fn check_positive(value: f64, what: &'static str) -> ComponentResult<()> {
    ensure_positive(value, what)?;
    Ok(())
}

/// Ensure a coefficient is finite and not negative.
pub fn check_non_negative(value: f64, what: &'static str) -> ComponentResult<()> {
    check_finite(value, what)?;
    if value < 0.0 {
        return Err(ComponentError::NonPhysical { what });
    }
    Ok(())
}

/// Flow through a restriction driven by a pressure difference.
///
/// Positive when `p_from > p_to`.
pub fn orifice_flow(k: f64, p_from: f64, p_to: f64) -> f64 {
    k * (p_from - p_to)
}

/// Proportional valve opening for a control error, saturating at full opening
/// once `|error| >= band`.
pub fn valve_opening(error: f64, band: f64) -> f64 {
    (error / band).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orifice_flow_direction() {
        assert!(orifice_flow(0.01, 0.5, 0.3) > 0.0);
        assert!(orifice_flow(0.01, 0.3, 0.5) < 0.0);
        assert_eq!(orifice_flow(0.01, 0.4, 0.4), 0.0);
    }

    #[test]
    fn test_valve_opening_saturates() {
        assert_eq!(valve_opening(1.0, 0.05), 1.0);
        assert_eq!(valve_opening(-1.0, 0.05), -1.0);
        assert!((valve_opening(0.025, 0.05) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_check_finite() {
        assert!(check_finite(1.0, "test").is_ok());
        assert!(check_finite(f64::INFINITY, "test").is_err());
        assert!(check_finite(f64::NAN, "test").is_err());
    }

    #[test]
    fn test_check_non_negative() {
        assert!(check_non_negative(0.0, "k").is_ok());
        assert!(check_non_negative(-0.1, "k").is_err());
    }
}
