//! Configuration documents: named sections of typed scalars.
//!
//! ```yaml
//! BrakesState:
//!   MainReservoirPressure: 0.9
//!   TrainCranePos: 1
//! ```

use crate::{ProjectError, ProjectResult};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigDocument {
    root: Mapping,
}

impl ConfigDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_yaml_str(content: &str) -> ProjectResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        match serde_yaml::from_str::<Value>(content)? {
            Value::Mapping(root) => Ok(Self { root }),
            Value::Null => Ok(Self::default()),
            _ => Err(ProjectError::Document {
                what: "top level must be a mapping of sections".to_string(),
            }),
        }
    }

    pub fn load(path: &Path) -> ProjectResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn to_yaml_string(&self) -> ProjectResult<String> {
        Ok(serde_yaml::to_string(&self.root)?)
    }

    pub fn save(&self, path: &Path) -> ProjectResult<()> {
        std::fs::write(path, self.to_yaml_string()?)?;
        Ok(())
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.root.contains_key(section)
    }

    fn value(&self, section: &str, key: &str) -> Option<&Value> {
        self.root.get(section)?.as_mapping()?.get(key)
    }

    /// Read a floating-point field. Integers are accepted.
    pub fn get_f64(&self, section: &str, key: &str) -> Option<f64> {
        self.value(section, key)?.as_f64()
    }

    pub fn get_i64(&self, section: &str, key: &str) -> Option<i64> {
        self.value(section, key)?.as_i64()
    }

    /// Deserialize a whole section. `Ok(None)` when the section is absent.
    pub fn section_as<T: DeserializeOwned>(&self, section: &str) -> ProjectResult<Option<T>> {
        match self.root.get(section) {
            None => Ok(None),
            // An empty section still yields the defaults.
            Some(Value::Null) => Ok(Some(serde_yaml::from_value(Value::Mapping(Mapping::new()))?)),
            Some(value) => Ok(Some(serde_yaml::from_value(value.clone())?)),
        }
    }

    pub fn set_section<T: Serialize>(&mut self, section: &str, value: &T) -> ProjectResult<()> {
        let value = serde_yaml::to_value(value)?;
        self.root.insert(Value::from(section), value);
        Ok(())
    }
}
