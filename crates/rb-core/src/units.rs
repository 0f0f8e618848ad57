// rb-core/src/units.rs

use uom::si::f64::{
    Force as UomForce, Length as UomLength, Pressure as UomPressure, Time as UomTime,
    Velocity as UomVelocity, Volume as UomVolume,
};

// Public canonical unit types (SI, f64)
pub type Force = UomForce;
pub type Length = UomLength;
pub type Pressure = UomPressure;
pub type Time = UomTime;
pub type Velocity = UomVelocity;
pub type Volume = UomVolume;

#[inline]
pub fn mps(v: f64) -> Velocity {
    use uom::si::velocity::meter_per_second;
    Velocity::new::<meter_per_second>(v)
}

#[inline]
pub fn kmh(v: f64) -> Velocity {
    use uom::si::velocity::kilometer_per_hour;
    Velocity::new::<kilometer_per_hour>(v)
}

#[inline]
pub fn kn(v: f64) -> Force {
    use uom::si::force::kilonewton;
    Force::new::<kilonewton>(v)
}

#[inline]
pub fn mpa(v: f64) -> Pressure {
    use uom::si::pressure::megapascal;
    Pressure::new::<megapascal>(v)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

/// Host velocity (m/s) expressed in km/h.
#[inline]
pub fn mps_to_kmh(v: f64) -> f64 {
    use uom::si::velocity::kilometer_per_hour;
    mps(v).get::<kilometer_per_hour>()
}

/// Speed given in km/h expressed in m/s.
#[inline]
pub fn kmh_to_mps(v: f64) -> f64 {
    use uom::si::velocity::meter_per_second;
    kmh(v).get::<meter_per_second>()
}

/// Force in kN expressed in newtons.
#[inline]
pub fn kn_to_n(f: f64) -> f64 {
    use uom::si::force::newton;
    kn(f).get::<newton>()
}

/// Pressure in MPa expressed in pascals.
#[inline]
pub fn mpa_to_pa(p: f64) -> f64 {
    use uom::si::pressure::pascal;
    mpa(p).get::<pascal>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _v = mps(22.2);
        let _w = kmh(80.0);
        let _f = kn(450.0);
        let _p = mpa(0.5);
        let _l = m(1.25);
        let _dt = s(0.01);
    }

    #[test]
    fn speed_conversions_invert() {
        let v = kmh_to_mps(80.0);
        assert!((v - 80.0 / 3.6).abs() < 1e-9);
        assert!((mps_to_kmh(v) - 80.0).abs() < 1e-9);
    }

    #[test]
    fn force_and_pressure_scale() {
        assert!((kn_to_n(1.5) - 1500.0).abs() < 1e-9);
        assert!((mpa_to_pa(0.5) - 500_000.0).abs() < 1e-6);
    }
}
