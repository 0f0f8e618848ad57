//! Traction characteristic F(v).

use rb_core::units::{kmh_to_mps, kn_to_n};
use rb_project::VehicleSection;

/// Tractive effort curve of the motor car.
///
/// ```text
/// |v| <  Vn:  F = F_max + (F_min - F_max) * |v| / Vn
/// |v| >= Vn:  F = F_min * Vn / |v|
/// ```
///
/// The linear part runs from the starting force down to the rated force, the
/// hyperbola continues at constant power.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TractionCharacteristic {
    /// Starting force (N)
    f_max: f64,
    /// Force at rated speed (N)
    f_min: f64,
    /// Rated speed (m/s)
    v_nom: f64,
}

impl TractionCharacteristic {
    /// `f_max`, `f_min` in kN, `v_nom` in km/h.
    pub fn new(f_max_kn: f64, f_min_kn: f64, v_nom_kmh: f64) -> Self {
        Self {
            f_max: kn_to_n(f_max_kn),
            f_min: kn_to_n(f_min_kn),
            v_nom: kmh_to_mps(v_nom_kmh),
        }
    }

    pub fn from_section(section: &VehicleSection) -> Self {
        Self::new(section.f_max, section.f_min, section.v_nom)
    }

    /// Available force (N) at speed `v` (m/s), either direction.
    pub fn force(&self, v: f64) -> f64 {
        let v = v.abs();
        if v < self.v_nom {
            self.f_max + (self.f_min - self.f_max) * v / self.v_nom
        } else {
            self.f_min * self.v_nom / v
        }
    }

    pub fn v_nom(&self) -> f64 {
        self.v_nom
    }
}
