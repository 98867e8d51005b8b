//! Frame classifier trait and common types

use crate::config::DetectorKind;
use chrono::{DateTime, SecondsFormat, Utc};
use lakesim_core::reader::FrameRequest;
use lakesim_core::{Frame, Result};
use serde_json::{Map, Value};

/// Trait for all frame classifiers
///
/// A classifier looks at one frame at a time and decides whether the frame
/// shows event-worthy conditions. Problems in the data itself (every cell
/// filled, no spread in values) yield a non-qualifying verdict; errors are
/// reserved for misuse such as feeding a scalar frame to a vector classifier.
pub trait FrameClassifier: Send {
    /// Detector type this classifier implements
    fn kind(&self) -> DetectorKind;

    /// Fields needed from each time step
    fn request(&self) -> FrameRequest;

    /// Requested depth below the surface (m)
    fn depth(&self) -> f64;

    /// Classify a single frame
    fn classify(&mut self, frame: &Frame) -> Result<Verdict>;

    /// Event properties describing the strongest frame of an event
    fn peak_properties(&self, peak: &Peak) -> Map<String, Value> {
        let _ = peak;
        Map::new()
    }

    /// Drop state carried between frames so the classifier can be rerun
    fn reset(&mut self) {}
}

/// Per-frame output of a classifier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    /// Whether the frame shows event-worthy conditions
    pub qualifies: bool,

    /// Strength of the signal, larger is stronger
    pub metric: Option<f64>,
}

impl Verdict {
    /// A non-qualifying verdict
    pub fn rejected() -> Self {
        Self {
            qualifies: false,
            metric: None,
        }
    }

    /// A qualifying verdict with an optional strength metric
    pub fn qualified(metric: Option<f64>) -> Self {
        Self {
            qualifies: true,
            metric,
        }
    }
}

/// Strongest observation within an event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// Format a timestamp the way event records serialize it
pub(crate) fn timestamp_value(timestamp: &DateTime<Utc>) -> Value {
    Value::String(timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_verdict_constructors() {
        assert!(!Verdict::rejected().qualifies);
        assert_eq!(Verdict::qualified(Some(2.5)).metric, Some(2.5));
    }

    #[test]
    fn test_timestamp_value_matches_serde() {
        let t = Utc.with_ymd_and_hms(2024, 6, 1, 3, 0, 0).unwrap();
        assert_eq!(timestamp_value(&t), serde_json::to_value(t).unwrap());
    }
}
