//! rb-project: vehicle configuration documents and validation.

pub mod dirs;
pub mod document;
pub mod schema;
pub mod validate;

pub use document::ConfigDocument;
pub use schema::*;
pub use validate::{ValidationError, validate_brakes_state, validate_config};

use std::path::Path;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Document error: {what}")]
    Document { what: String },

    #[error("Missing section: {section}")]
    MissingSection { section: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &Path) -> ProjectResult<VehicleConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: VehicleConfig = serde_yaml::from_str(&content)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn save_yaml(path: &Path, config: &VehicleConfig) -> ProjectResult<()> {
    validate_config(config)?;
    let content = serde_yaml::to_string(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<VehicleConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: VehicleConfig = serde_json::from_str(&content)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn save_json(path: &Path, config: &VehicleConfig) -> ProjectResult<()> {
    validate_config(config)?;
    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Write a brake-state snapshot as a `BrakesState` section.
pub fn save_brakes_state(path: &Path, state: &BrakesState) -> ProjectResult<()> {
    let mut doc = ConfigDocument::new();
    doc.set_section(dirs::BRAKES_STATE_SECTION, state)?;
    doc.save(path)
}

pub fn load_brakes_state(path: &Path) -> ProjectResult<BrakesState> {
    ConfigDocument::load(path)?
        .section_as(dirs::BRAKES_STATE_SECTION)?
        .ok_or_else(|| ProjectError::MissingSection {
            section: dirs::BRAKES_STATE_SECTION.to_string(),
        })
}

/// Read the `Vehicle` section of a vehicle document.
pub fn load_vehicle_section(path: &Path) -> ProjectResult<VehicleSection> {
    let section = ConfigDocument::load(path)?
        .section_as(dirs::VEHICLE_SECTION)?
        .ok_or_else(|| ProjectError::MissingSection {
            section: dirs::VEHICLE_SECTION.to_string(),
        })?;
    validate::validate_vehicle_section(&section)?;
    Ok(section)
}
