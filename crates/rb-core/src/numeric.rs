use crate::RbError;

/// Absolute tolerance used where pressures (MPa) or relative speeds are compared.
pub const ABS_TOL: f64 = 1e-9;

/// `true` when `a` and `b` agree within `tol`, absolutely or relative to the
/// larger magnitude.
pub fn nearly_equal(a: f64, b: f64, tol: f64) -> bool {
    let diff = (a - b).abs();
    diff <= tol || diff <= tol * a.abs().max(b.abs())
}

pub fn ensure_finite(v: f64, what: &'static str) -> Result<f64, RbError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(RbError::NonFinite { what, value: v })
    }
}

/// Require a strictly positive, finite parameter.
pub fn ensure_positive(v: f64, what: &'static str) -> Result<f64, RbError> {
    if ensure_finite(v, what)? > 0.0 {
        Ok(v)
    } else {
        Err(RbError::InvalidArg { what })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_uses_abs_then_rel() {
        assert!(nearly_equal(0.5, 0.5 + 1e-12, ABS_TOL));
        assert!(nearly_equal(450_000.0, 450_000.0001, ABS_TOL));
        assert!(!nearly_equal(0.5, 0.5001, ABS_TOL));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(f64::NAN, "pressure").unwrap_err();
        assert!(format!("{err}").contains("pressure"));
    }

    #[test]
    fn ensure_positive_rejects_zero() {
        assert!(ensure_positive(0.0, "volume").is_err());
        assert!(ensure_positive(-1.0, "volume").is_err());
        assert!(ensure_positive(f64::INFINITY, "volume").is_err());
        assert_eq!(ensure_positive(0.078, "volume").unwrap(), 0.078);
    }

    proptest::proptest! {
        #[test]
        fn nearly_equal_is_symmetric(a in -1e6f64..1e6, b in -1e6f64..1e6) {
            proptest::prop_assert_eq!(nearly_equal(a, b, ABS_TOL), nearly_equal(b, a, ABS_TOL));
        }
    }
}
