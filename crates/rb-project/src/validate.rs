//! Configuration validation.

use crate::schema::{BrakesState, SimulationSection, VehicleConfig, VehicleSection};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Position out of range: {field} = {value} (allowed {min}..={max})")]
    OutOfRange {
        field: String,
        value: i64,
        min: i64,
        max: i64,
    },
}

fn positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be positive and finite".to_string(),
        })
    }
}

fn non_negative(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be non-negative and finite".to_string(),
        })
    }
}

fn in_range(field: &str, value: i64, min: i64, max: i64) -> Result<(), ValidationError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value,
            min,
            max,
        })
    }
}

pub fn validate_vehicle_section(section: &VehicleSection) -> Result<(), ValidationError> {
    positive("Vehicle.F_max", section.f_max)?;
    positive("Vehicle.F_min", section.f_min)?;
    positive("Vehicle.V_nom", section.v_nom)?;
    if section.f_min > section.f_max {
        return Err(ValidationError::InvalidValue {
            field: "Vehicle.F_min".to_string(),
            value: section.f_min.to_string(),
            reason: "must not exceed F_max".to_string(),
        });
    }
    positive("Vehicle.WheelDiameter", section.wheel_diameter)?;
    if section.num_axles == 0 || section.num_axles % 2 != 0 {
        return Err(ValidationError::InvalidValue {
            field: "Vehicle.NumAxles".to_string(),
            value: section.num_axles.to_string(),
            reason: "must be a non-zero even count (two trucks)".to_string(),
        });
    }
    positive("Vehicle.MainReservoirVolume", section.main_reservoir_volume)?;
    positive("Vehicle.SupplyReservoirVolume", section.supply_reservoir_volume)?;
    Ok(())
}

fn validate_simulation(section: &SimulationSection) -> Result<(), ValidationError> {
    non_negative("Simulation.supply_voltage", section.supply_voltage)
}

/// Check a brake-state snapshot against the position tables of `config`.
pub fn validate_brakes_state(
    state: &BrakesState,
    config: &VehicleConfig,
) -> Result<(), ValidationError> {
    if let Some(p) = state.main_reservoir_pressure {
        non_negative("BrakesState.MainReservoirPressure", p)?;
    }
    if let Some(k) = state.main_reservoir_flow {
        non_negative("BrakesState.MainReservoirFlow", k)?;
    }
    if let Some(p) = state.charging_pressure {
        non_negative("BrakesState.ChargingPressure", p)?;
    }
    if let Some(pos) = state.train_crane_pos {
        let last = config.brake_crane.positions.len() as i64 - 1;
        in_range("BrakesState.TrainCranePos", pos, 0, last)?;
    }
    if let Some(pos) = state.loco_crane_pos {
        let last = config.loco_crane.position_count as i64 - 1;
        in_range("BrakesState.LocoCranePos", pos, 0, last)?;
    }
    if let Some(pos) = state.combine_crane_pos {
        in_range("BrakesState.CombineCranePos", pos, -1, 1)?;
    }
    if let Some(lock) = state.brake_lock_device {
        in_range("BrakesState.BrakeLockDevice", lock, 0, 1)?;
    }
    Ok(())
}

/// Checks what a vehicle cannot be built without. The optional `brakes_init`
/// snapshot is not part of it: bad fields there are skipped when applied.
pub fn validate_config(config: &VehicleConfig) -> Result<(), ValidationError> {
    validate_vehicle_section(&config.vehicle)?;
    validate_simulation(&config.simulation)?;
    Ok(())
}
