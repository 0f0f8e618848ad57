//! One-line status of the vehicle for the host's debug display.

use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Status {
    /// MPa
    pub main_reservoir: f64,
    pub traction_level: f64,
    /// km/h
    pub velocity: f64,
    /// kN
    pub traction_force: f64,
    /// MPa
    pub supply_reservoir: f64,
    /// MPa
    pub brake_cyl_front: f64,
    /// MPa
    pub brake_cyl_rear: f64,
    /// kN, front truck
    pub shoe_force: f64,
    /// MPa
    pub brake_pipe: f64,
    /// m
    pub railway_coord: f64,
    /// kN
    pub f_max: f64,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MR:{:4.2} Ref:{:4.2} V:{:6.2} Ftr:{:6.1} Sup:{:4.2} BC1:{:4.2} BC2:{:4.2} \
             Shoe:{:5.1} pTM:{:5.2} X:{:5.1} || {}",
            self.main_reservoir,
            self.traction_level,
            self.velocity,
            self.traction_force,
            self.supply_reservoir,
            self.brake_cyl_front,
            self.brake_cyl_rear,
            self.shoe_force,
            self.brake_pipe,
            self.railway_coord,
            self.f_max,
        )
    }
}
