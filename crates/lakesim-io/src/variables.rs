//! Variable names used to read simulation output

use lakesim_core::Field;
use serde::{Deserialize, Serialize};

/// Names of the NetCDF variables holding each quantity
///
/// Defaults match the post-processed Delft3D-Flow output. Any subset can be
/// overridden through the `grid` object of `properties.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridVariables {
    pub time: String,
    pub depth: String,
    pub temperature: String,
    pub u: String,
    pub v: String,
}

impl Default for GridVariables {
    fn default() -> Self {
        Self {
            time: "time".to_string(),
            depth: "depth".to_string(),
            temperature: "t".to_string(),
            u: "u".to_string(),
            v: "v".to_string(),
        }
    }
}

impl GridVariables {
    /// Variable name for a field
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Temperature => &self.temperature,
            Field::VelocityU => &self.u,
            Field::VelocityV => &self.v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override() {
        let vars: GridVariables = serde_json::from_str(r#"{"temperature": "R1"}"#).unwrap();
        assert_eq!(vars.field(Field::Temperature), "R1");
        assert_eq!(vars.field(Field::VelocityU), "u");
        assert_eq!(vars.time, "time");
    }
}
