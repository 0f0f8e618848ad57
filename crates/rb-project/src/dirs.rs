//! Vehicle configuration spread over a config directory and a shared modules
//! directory, one document per device.

use crate::document::ConfigDocument;
use crate::schema::{BrakesState, SimulationSection, VehicleConfig, VehicleSection};
use crate::validate::validate_brakes_state;
use crate::{ProjectError, ProjectResult};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;

pub const VEHICLE_FILE: &str = "vehicle.yaml";
pub const COMPRESSOR_FILE: &str = "motor-compressor.yaml";
pub const BRAKE_MECH_FILE: &str = "motor-brakes-mech.yaml";
pub const BRAKES_INIT_FILE: &str = "brakes-init.yaml";

pub const VEHICLE_SECTION: &str = "Vehicle";
pub const SIMULATION_SECTION: &str = "Simulation";
pub const DEVICE_SECTION: &str = "Device";
pub const BRAKES_STATE_SECTION: &str = "BrakesState";
pub const PHASE_SPLITTER_SECTION: &str = "PhaseSplitter";
pub const MOTOR_FAN_SECTION: &str = "MotorFan";
pub const REGULATOR_SECTION: &str = "PressureRegulator";

/// Read one section, falling back to `None` with a log line on any failure.
fn read_section<T: DeserializeOwned>(path: &Path, section: &str) -> Option<T> {
    let doc = match ConfigDocument::load(path) {
        Ok(doc) => doc,
        Err(ProjectError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "config file not found, keeping defaults");
            return None;
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot read config file, keeping defaults");
            return None;
        }
    };
    match doc.section_as::<T>(section) {
        Ok(Some(value)) => {
            tracing::debug!(path = %path.display(), section, "config section loaded");
            Some(value)
        }
        Ok(None) => {
            tracing::debug!(path = %path.display(), section, "config section absent");
            None
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), section, error = %e, "malformed config section, keeping defaults");
            None
        }
    }
}

fn write_section<T: Serialize>(path: &Path, section: &str, value: &T) -> ProjectResult<()> {
    let mut doc = ConfigDocument::new();
    doc.set_section(section, value)?;
    doc.save(path)
}

fn device_file(modules_dir: &Path, device: &str) -> std::path::PathBuf {
    modules_dir.join(format!("{device}.yaml"))
}

impl VehicleConfig {
    /// Assemble a configuration from the per-device documents.
    ///
    /// Never fails: missing files and sections keep defaults, malformed ones
    /// are logged and keep defaults too.
    pub fn from_dirs(config_dir: &Path, modules_dir: &Path) -> Self {
        let mut config = Self::default();
        let vehicle_file = config_dir.join(VEHICLE_FILE);
        if let Some(v) = read_section::<VehicleSection>(&vehicle_file, VEHICLE_SECTION) {
            config.vehicle = v;
        }
        if let Some(s) = read_section::<SimulationSection>(&vehicle_file, SIMULATION_SECTION) {
            config.simulation = s;
        }
        if let Some(p) = read_section(&vehicle_file, PHASE_SPLITTER_SECTION) {
            config.phase_splitter = p;
        }
        if let Some(p) = read_section(&vehicle_file, MOTOR_FAN_SECTION) {
            config.motor_fan = p;
        }
        if let Some(p) = read_section(&vehicle_file, REGULATOR_SECTION) {
            config.regulator = p;
        }
        if let Some(p) = read_section(&config_dir.join(COMPRESSOR_FILE), DEVICE_SECTION) {
            config.compressor = p;
        }
        if let Some(p) = read_section(&config_dir.join(BRAKE_MECH_FILE), DEVICE_SECTION) {
            config.trolley = p;
        }

        if let Some(p) = read_section(&device_file(modules_dir, "krm395"), DEVICE_SECTION) {
            config.brake_crane = p;
        }
        if let Some(p) = read_section(&device_file(modules_dir, "kvt254"), DEVICE_SECTION) {
            config.loco_crane = p;
        }
        if let Some(p) = read_section(&device_file(modules_dir, "ubt367m"), DEVICE_SECTION) {
            config.brake_lock = p;
        }
        if let Some(p) = read_section(&device_file(modules_dir, "vr242"), DEVICE_SECTION) {
            config.air_distributor = p;
        }
        if let Some(p) = read_section(&device_file(modules_dir, "zpk"), DEVICE_SECTION) {
            config.switching_valve = p;
        }
        if let Some(p) = read_section(&device_file(modules_dir, "rd304"), DEVICE_SECTION) {
            config.relay = p;
        }
        if let Some(p) = read_section(&device_file(modules_dir, "pneumo-splitter"), DEVICE_SECTION) {
            config.splitter = p;
        }

        // Positions are checked against the crane tables loaded above.
        let brakes_file = config_dir.join(BRAKES_INIT_FILE);
        config.brakes_init = read_section::<BrakesState>(&brakes_file, BRAKES_STATE_SECTION)
            .filter(|state| match validate_brakes_state(state, &config) {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(path = %brakes_file.display(), error = %e, "initial brake state ignored");
                    false
                }
            });
        config
    }

    /// Write every per-device document. Inverse of [`VehicleConfig::from_dirs`].
    pub fn write_dirs(&self, config_dir: &Path, modules_dir: &Path) -> ProjectResult<()> {
        crate::validate::validate_config(self)?;
        std::fs::create_dir_all(config_dir)?;
        std::fs::create_dir_all(modules_dir)?;

        let mut vehicle = ConfigDocument::new();
        vehicle.set_section(VEHICLE_SECTION, &self.vehicle)?;
        vehicle.set_section(SIMULATION_SECTION, &self.simulation)?;
        vehicle.set_section(PHASE_SPLITTER_SECTION, &self.phase_splitter)?;
        vehicle.set_section(MOTOR_FAN_SECTION, &self.motor_fan)?;
        vehicle.set_section(REGULATOR_SECTION, &self.regulator)?;
        vehicle.save(&config_dir.join(VEHICLE_FILE))?;

        write_section(&config_dir.join(COMPRESSOR_FILE), DEVICE_SECTION, &self.compressor)?;
        write_section(&config_dir.join(BRAKE_MECH_FILE), DEVICE_SECTION, &self.trolley)?;
        if let Some(state) = &self.brakes_init {
            crate::save_brakes_state(&config_dir.join(BRAKES_INIT_FILE), state)?;
        }

        write_section(&device_file(modules_dir, "krm395"), DEVICE_SECTION, &self.brake_crane)?;
        write_section(&device_file(modules_dir, "kvt254"), DEVICE_SECTION, &self.loco_crane)?;
        write_section(&device_file(modules_dir, "ubt367m"), DEVICE_SECTION, &self.brake_lock)?;
        write_section(&device_file(modules_dir, "vr242"), DEVICE_SECTION, &self.air_distributor)?;
        write_section(&device_file(modules_dir, "zpk"), DEVICE_SECTION, &self.switching_valve)?;
        write_section(&device_file(modules_dir, "rd304"), DEVICE_SECTION, &self.relay)?;
        write_section(
            &device_file(modules_dir, "pneumo-splitter"),
            DEVICE_SECTION,
            &self.splitter,
        )?;
        Ok(())
    }
}
