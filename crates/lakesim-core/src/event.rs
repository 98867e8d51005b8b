//! Event records produced by detectors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A time-bounded physical event detected in simulation output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Detector type tag (e.g. `upwelling`)
    #[serde(rename = "type")]
    pub event_type: String,

    /// Free-text description copied from the detector definition
    pub description: String,

    /// Timestamp of the first qualifying frame
    pub start: DateTime<Utc>,

    /// Timestamp of the last qualifying frame
    pub end: DateTime<Utc>,

    /// Detector-specific summary statistics
    pub properties: Map<String, Value>,

    /// Parameters that produced this event
    pub parameters: Map<String, Value>,
}

impl EventRecord {
    /// Duration between the first and last qualifying frame
    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }
}
