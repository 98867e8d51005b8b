//! Detector definitions as read from `properties.json`
//!
//! Each entry of the `events` list is a flat object:
//!
//! ```json
//! { "type": "upwelling", "description": "Upwelling at 5m",
//!   "depth": 5, "centroid_difference": 2.0, "merge": 6 }
//! ```
//!
//! `type` selects the detector, `description` is free text and every other key
//! is a parameter. Parameters are validated per detector type and echoed into
//! the `parameters` field of each event the detector produces.

use chrono::Duration;
use lakesim_core::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Supported detector types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorKind {
    /// Bimodal temperature split (k-means)
    Upwelling,
    /// Coherent regions of high current speed
    LocalisedCurrents,
    /// Any valid cell beyond a fixed value
    ThresholdDetection,
}

impl DetectorKind {
    /// Type tag as used in configuration and output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upwelling => "upwelling",
            Self::LocalisedCurrents => "localised_currents",
            Self::ThresholdDetection => "threshold_detection",
        }
    }

    /// Parse a type tag
    pub fn from_tag(tag: &str) -> Result<Self> {
        match tag {
            "upwelling" => Ok(Self::Upwelling),
            "localised_currents" => Ok(Self::LocalisedCurrents),
            "threshold_detection" => Ok(Self::ThresholdDetection),
            other => Err(Error::unsupported(other)),
        }
    }
}

impl fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of the upwelling detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpwellingParams {
    /// Depth below the surface (m)
    pub depth: f64,

    /// Minimum separation of the two k-means centroids (degC)
    pub centroid_difference: f64,

    /// Merge window (hours)
    #[serde(default)]
    pub merge: f64,
}

/// Parameters of the localised currents detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentsParams {
    /// Depth below the surface (m)
    pub depth: f64,

    /// Minimum current speed (m/s)
    pub threshold: f64,

    /// Smallest region, as a share of `total_area`
    pub min_area: f64,

    /// Largest region, as a share of `total_area`
    pub max_area: f64,

    /// Reference area the bounds are relative to
    #[serde(default = "default_total_area")]
    pub total_area: f64,

    /// Merge window (hours)
    #[serde(default)]
    pub merge: f64,
}

impl CurrentsParams {
    /// Region size bounds as fractions of the wetted area
    pub fn area_fractions(&self) -> (f64, f64) {
        (self.min_area / self.total_area, self.max_area / self.total_area)
    }
}

/// Field a threshold detector watches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdField {
    Temperature,
    /// Current speed magnitude
    Velocity,
}

/// Parameters of the threshold detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdParams {
    /// Depth below the surface (m)
    pub depth: f64,

    /// Field to compare
    pub parameter: ThresholdField,

    /// Threshold value
    pub value: f64,

    /// Qualify above the value when true, below it when false
    #[serde(default = "default_true")]
    pub greaterthan: bool,

    /// Merge window (hours)
    #[serde(default)]
    pub merge: f64,
}

/// Validated, typed parameters
#[derive(Debug, Clone, PartialEq)]
pub enum DetectorParams {
    Upwelling(UpwellingParams),
    LocalisedCurrents(CurrentsParams),
    ThresholdDetection(ThresholdParams),
}

/// One configured detector
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorDefinition {
    /// Free-text description copied into every event
    pub description: String,

    /// Typed parameters
    pub params: DetectorParams,

    /// Raw parameter bag, echoed into events for provenance
    pub parameters: Map<String, Value>,
}

impl DetectorDefinition {
    /// Parse and validate one entry of the `events` list
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| Error::config("event definition must be a JSON object"))?;

        let tag = object
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::config("event definition is missing a string 'type'"))?;
        let kind = DetectorKind::from_tag(tag)?;

        let description = match object.get("description") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(text)) => text.clone(),
            Some(other) => {
                return Err(Error::config(format!(
                    "{} detector: description must be a string, got {}",
                    kind, other
                )));
            }
        };

        let parameters: Map<String, Value> = object
            .iter()
            .filter(|(key, _)| key.as_str() != "type" && key.as_str() != "description")
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let params = match kind {
            DetectorKind::Upwelling => DetectorParams::Upwelling(parse_params(kind, &parameters)?),
            DetectorKind::LocalisedCurrents => {
                DetectorParams::LocalisedCurrents(parse_params(kind, &parameters)?)
            }
            DetectorKind::ThresholdDetection => {
                DetectorParams::ThresholdDetection(parse_params(kind, &parameters)?)
            }
        };

        let definition = Self {
            description,
            params,
            parameters,
        };
        definition.validate()?;
        Ok(definition)
    }

    /// Parse every entry, failing on the first invalid one
    pub fn parse_all(values: &[Value]) -> Result<Vec<Self>> {
        values.iter().map(Self::from_value).collect()
    }

    /// Detector type
    pub fn kind(&self) -> DetectorKind {
        match self.params {
            DetectorParams::Upwelling(_) => DetectorKind::Upwelling,
            DetectorParams::LocalisedCurrents(_) => DetectorKind::LocalisedCurrents,
            DetectorParams::ThresholdDetection(_) => DetectorKind::ThresholdDetection,
        }
    }

    /// Requested depth below the surface (m)
    pub fn depth(&self) -> f64 {
        match &self.params {
            DetectorParams::Upwelling(p) => p.depth,
            DetectorParams::LocalisedCurrents(p) => p.depth,
            DetectorParams::ThresholdDetection(p) => p.depth,
        }
    }

    /// Merge window in hours
    pub fn merge_hours(&self) -> f64 {
        match &self.params {
            DetectorParams::Upwelling(p) => p.merge,
            DetectorParams::LocalisedCurrents(p) => p.merge,
            DetectorParams::ThresholdDetection(p) => p.merge,
        }
    }

    /// Merge window as a duration, rounded to the millisecond
    ///
    /// Windows too long to represent are clamped to [`Duration::MAX`].
    pub fn merge_window(&self) -> Duration {
        let millis = (self.merge_hours() * 3_600_000.0).round() as i64;
        Duration::try_milliseconds(millis).unwrap_or(Duration::MAX)
    }

    fn validate(&self) -> Result<()> {
        let kind = self.kind();
        let check = |ok: bool, what: &str| -> Result<()> {
            if ok {
                Ok(())
            } else {
                Err(Error::config(format!("{} detector: {}", kind, what)))
            }
        };

        let depth = self.depth();
        check(depth.is_finite() && depth >= 0.0, "depth must be a non-negative number")?;
        let merge = self.merge_hours();
        check(merge.is_finite() && merge >= 0.0, "merge must be a non-negative number of hours")?;

        match &self.params {
            DetectorParams::Upwelling(p) => check(
                p.centroid_difference.is_finite() && p.centroid_difference >= 0.0,
                "centroid_difference must be non-negative",
            ),
            DetectorParams::LocalisedCurrents(p) => {
                check(p.threshold.is_finite() && p.threshold >= 0.0, "threshold must be non-negative")?;
                check(p.total_area.is_finite() && p.total_area > 0.0, "total_area must be positive")?;
                check(
                    p.min_area.is_finite() && p.max_area.is_finite() && p.min_area >= 0.0,
                    "min_area and max_area must be non-negative",
                )?;
                check(p.min_area <= p.max_area, "min_area must not exceed max_area")
            }
            DetectorParams::ThresholdDetection(p) => {
                check(p.value.is_finite(), "value must be a finite number")
            }
        }
    }
}

fn parse_params<T: DeserializeOwned>(kind: DetectorKind, parameters: &Map<String, Value>) -> Result<T> {
    serde_json::from_value(Value::Object(parameters.clone()))
        .map_err(|e| Error::config(format!("{} detector: {}", kind, e)))
}

fn default_total_area() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}
