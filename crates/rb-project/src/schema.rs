//! Configuration schema for the ER2T vehicle.

use rb_components::{
    AirDistributorParams, BrakeCraneParams, BrakeLockParams, LocoCraneParams,
    MotorCompressorParams, PneumoRelayParams, PressureRegulatorParams, RotorParams,
    SplitterParams, SwitchingValveParams, TrolleyBrakeMechParams,
};
use rb_core::ode::IntegratorKind;
use serde::{Deserialize, Serialize};

/// How devices within one tick see each other's outputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouplingMode {
    /// Outputs are visible to devices stepped later in the same tick.
    #[default]
    Sequential,
    /// Every read sees the previous tick; outputs are published after the pass.
    Lagged,
}

/// `Vehicle` section: traction characteristic and geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleSection {
    /// Starting traction force (kN)
    #[serde(rename = "F_max")]
    pub f_max: f64,
    /// Traction force at rated speed (kN)
    #[serde(rename = "F_min")]
    pub f_min: f64,
    /// Rated speed (km/h)
    #[serde(rename = "V_nom")]
    pub v_nom: f64,
    /// Wheel diameter (m)
    #[serde(rename = "WheelDiameter")]
    pub wheel_diameter: f64,
    #[serde(rename = "NumAxles")]
    pub num_axles: usize,
    /// Main reservoir volume (m³)
    #[serde(rename = "MainReservoirVolume")]
    pub main_reservoir_volume: f64,
    /// Supply reservoir volume (m³)
    #[serde(rename = "SupplyReservoirVolume")]
    pub supply_reservoir_volume: f64,
}

impl Default for VehicleSection {
    fn default() -> Self {
        Self {
            f_max: 450.0,
            f_min: 350.0,
            v_nom: 80.0,
            wheel_diameter: 1.05,
            num_axles: 4,
            main_reservoir_volume: 1.2,
            supply_reservoir_volume: 0.078,
        }
    }
}

/// `Simulation` section: numerics and the host supply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSection {
    pub integrator: IntegratorKind,
    pub coupling: CouplingMode,
    /// Supply voltage offered to the phase splitter (V)
    pub supply_voltage: f64,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            integrator: IntegratorKind::default(),
            coupling: CouplingMode::default(),
            supply_voltage: 380.0,
        }
    }
}

/// `BrakesState` section: initial state of the brake equipment.
///
/// Every field is optional; an absent field leaves that part of the vehicle
/// as it is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrakesState {
    #[serde(rename = "MainReservoirPressure", default, skip_serializing_if = "Option::is_none")]
    pub main_reservoir_pressure: Option<f64>,
    #[serde(rename = "MainReservoirFlow", default, skip_serializing_if = "Option::is_none")]
    pub main_reservoir_flow: Option<f64>,
    #[serde(rename = "ChargingPressure", default, skip_serializing_if = "Option::is_none")]
    pub charging_pressure: Option<f64>,
    #[serde(rename = "TrainCranePos", default, skip_serializing_if = "Option::is_none")]
    pub train_crane_pos: Option<i64>,
    #[serde(rename = "LocoCranePos", default, skip_serializing_if = "Option::is_none")]
    pub loco_crane_pos: Option<i64>,
    #[serde(rename = "CombineCranePos", default, skip_serializing_if = "Option::is_none")]
    pub combine_crane_pos: Option<i64>,
    #[serde(rename = "BrakeLockDevice", default, skip_serializing_if = "Option::is_none")]
    pub brake_lock_device: Option<i64>,
}

/// Complete parameter set of one vehicle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    pub vehicle: VehicleSection,
    pub simulation: SimulationSection,
    pub phase_splitter: RotorParams,
    pub motor_fan: RotorParams,
    pub compressor: MotorCompressorParams,
    pub regulator: PressureRegulatorParams,
    pub brake_crane: BrakeCraneParams,
    pub loco_crane: LocoCraneParams,
    pub brake_lock: BrakeLockParams,
    pub air_distributor: AirDistributorParams,
    pub switching_valve: SwitchingValveParams,
    pub splitter: SplitterParams,
    pub relay: PneumoRelayParams,
    pub trolley: TrolleyBrakeMechParams,
    /// Applied by `initialize_braking`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brakes_init: Option<BrakesState>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brakes_state_uses_section_key_names() {
        let state = BrakesState {
            charging_pressure: Some(0.5),
            train_crane_pos: Some(1),
            ..BrakesState::default()
        };
        let yaml = serde_yaml::to_string(&state).unwrap();
        assert!(yaml.contains("ChargingPressure: 0.5"));
        assert!(yaml.contains("TrainCranePos: 1"));
        assert!(!yaml.contains("LocoCranePos"));
    }

    #[test]
    fn partial_vehicle_section_keeps_defaults() {
        let section: VehicleSection = serde_yaml::from_str("F_max: 500.0").unwrap();
        assert_eq!(section.f_max, 500.0);
        assert_eq!(section.f_min, 350.0);
        assert_eq!(section.v_nom, 80.0);
    }

    #[test]
    fn coupling_mode_names() {
        let mode: CouplingMode = serde_yaml::from_str("lagged").unwrap();
        assert_eq!(mode, CouplingMode::Lagged);
        assert_eq!(CouplingMode::default(), CouplingMode::Sequential);
    }
}
