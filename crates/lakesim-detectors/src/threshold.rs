//! Threshold exceedance classifier
//!
//! A frame qualifies when any valid cell of the watched field lies strictly
//! beyond the configured value. Velocity is compared as speed magnitude.

use crate::classifier::{timestamp_value, FrameClassifier, Peak, Verdict};
use crate::config::{DetectorKind, ThresholdField, ThresholdParams};
use lakesim_core::reader::FrameRequest;
use lakesim_core::{Error, Field, Frame, FrameData, Grid, Result};
use serde_json::{Map, Value};
use std::borrow::Cow;

/// Classifier for fixed-value threshold exceedance
pub struct ThresholdClassifier {
    params: ThresholdParams,
}

impl ThresholdClassifier {
    /// Create a new threshold classifier
    pub fn new(params: ThresholdParams) -> Self {
        Self { params }
    }

    /// Most extreme exceeding value, oriented so that larger is stronger
    fn strongest_exceedance(&self, grid: &Grid) -> Option<f64> {
        let value = self.params.value;
        if self.params.greaterthan {
            grid.valid_values()
                .into_iter()
                .filter(|&v| v > value)
                .reduce(f64::max)
        } else {
            grid.valid_values()
                .into_iter()
                .filter(|&v| v < value)
                .reduce(f64::min)
                .map(|v| -v)
        }
    }
}

impl FrameClassifier for ThresholdClassifier {
    fn kind(&self) -> DetectorKind {
        DetectorKind::ThresholdDetection
    }

    fn request(&self) -> FrameRequest {
        match self.params.parameter {
            ThresholdField::Temperature => FrameRequest::Scalar(Field::Temperature),
            ThresholdField::Velocity => FrameRequest::Velocity,
        }
    }

    fn depth(&self) -> f64 {
        self.params.depth
    }

    fn classify(&mut self, frame: &Frame) -> Result<Verdict> {
        let grid = match (&frame.data, self.params.parameter) {
            (FrameData::Scalar(grid), ThresholdField::Temperature) => Cow::Borrowed(grid),
            (FrameData::Vector { u, v }, ThresholdField::Velocity) => {
                Cow::Owned(Grid::magnitude(u, v)?)
            }
            _ => {
                return Err(Error::config(
                    "threshold classifier received a frame of the wrong kind",
                ));
            }
        };

        Ok(match self.strongest_exceedance(&grid) {
            Some(metric) => Verdict::qualified(Some(metric)),
            None => Verdict::rejected(),
        })
    }

    fn peak_properties(&self, peak: &Peak) -> Map<String, Value> {
        let value = if self.params.greaterthan {
            peak.value
        } else {
            -peak.value
        };

        let mut properties = Map::new();
        properties.insert("peak".to_string(), timestamp_value(&peak.timestamp));
        properties.insert("peak_value".to_string(), Value::from(value));
        properties
    }
}
