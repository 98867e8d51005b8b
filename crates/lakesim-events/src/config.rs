//! Simulation folder configuration

use lakesim_core::{Error, Result};
use lakesim_io::GridVariables;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

/// Name of the simulation properties file
pub const PROPERTIES_FILE: &str = "properties.json";

/// Delft3D-Flow images whose output layout the reader understands
pub const SUPPORTED_IMAGES: &[&str] = &[
    "eawag/delft3d-flow:6.03.00.62434",
    "eawag/delft3d-flow:6.02.10.142612",
];

/// Image assumed when none is given
pub const DEFAULT_IMAGE: &str = "eawag/delft3d-flow:6.02.10.142612";

/// The parts of `properties.json` this stage reads
///
/// Other keys describe the simulation setup and are ignored here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Properties {
    /// Raw detector definitions, validated by the registry
    #[serde(default)]
    pub events: Option<Vec<Value>>,

    /// Variable name overrides
    #[serde(default)]
    pub grid: GridVariables,
}

impl Properties {
    /// Load `properties.json` from a simulation folder
    pub fn load(folder: &Path) -> Result<Self> {
        let path = folder.join(PROPERTIES_FILE);
        let content = std::fs::read_to_string(&path).map_err(|e| {
            Error::resource(format!("unable to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Parse the contents of `properties.json`
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| Error::config(format!("invalid {}: {}", PROPERTIES_FILE, e)))
    }
}

/// Reject images with an unknown output layout
pub fn check_image(image: &str) -> Result<()> {
    if SUPPORTED_IMAGES.contains(&image) {
        Ok(())
    } else {
        Err(Error::config(format!(
            "event detection not defined for docker image {}",
            image
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_events_key() {
        let props = Properties::from_json(r#"{"start": "20240601", "end": "20240608"}"#).unwrap();
        assert!(props.events.is_none());
        assert_eq!(props.grid, GridVariables::default());
    }

    #[test]
    fn test_events_and_grid() {
        let props = Properties::from_json(
            r#"{"events": [{"type": "upwelling"}], "grid": {"temperature": "R1"}}"#,
        )
        .unwrap();
        assert_eq!(props.events.unwrap().len(), 1);
        assert_eq!(props.grid.temperature, "R1");
    }

    #[test]
    fn test_events_must_be_a_list() {
        let result = Properties::from_json(r#"{"events": {"type": "upwelling"}}"#);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_image_check() {
        assert!(check_image(DEFAULT_IMAGE).is_ok());
        assert!(check_image("eawag/delft3d-flow:6.03.00.62434").is_ok());
        assert!(check_image("eawag/delft3d-flow:5.01.00.2163").is_err());
    }
}
