//! Upwelling classifier
//!
//! Upwelling fronts show up as a sharp split between cold upwelled water and
//! the warmer surrounding surface layer. Each frame's valid temperatures are
//! clustered with k = 2; the frame qualifies when the two centres are further
//! apart than `centroid_difference`.

use crate::classifier::{timestamp_value, FrameClassifier, Peak, Verdict};
use crate::config::{DetectorKind, UpwellingParams};
use crate::kmeans::two_means;
use lakesim_core::reader::FrameRequest;
use lakesim_core::{Error, Field, Frame, Result};
use serde_json::{Map, Value};
use tracing::trace;

/// Bimodal clustering classifier for upwelling
pub struct UpwellingClassifier {
    params: UpwellingParams,
}

impl UpwellingClassifier {
    /// Create a new upwelling classifier
    pub fn new(params: UpwellingParams) -> Self {
        Self { params }
    }
}

impl FrameClassifier for UpwellingClassifier {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Upwelling
    }

    fn request(&self) -> FrameRequest {
        FrameRequest::Scalar(Field::Temperature)
    }

    fn depth(&self) -> f64 {
        self.params.depth
    }

    fn classify(&mut self, frame: &Frame) -> Result<Verdict> {
        let grid = frame
            .as_scalar()
            .ok_or_else(|| Error::config("upwelling classifier requires a temperature frame"))?;

        let values = grid.valid_values();
        if values.is_empty() {
            trace!(timestamp = %frame.timestamp, "no valid temperature cells");
            return Ok(Verdict::rejected());
        }

        let Some(clusters) = two_means(&values) else {
            trace!(timestamp = %frame.timestamp, "temperature field is not bimodal");
            return Ok(Verdict::rejected());
        };

        let difference = clusters.separation();
        if difference > self.params.centroid_difference {
            Ok(Verdict::qualified(Some(difference)))
        } else {
            Ok(Verdict::rejected())
        }
    }

    fn peak_properties(&self, peak: &Peak) -> Map<String, Value> {
        let mut properties = Map::new();
        properties.insert("peak".to_string(), timestamp_value(&peak.timestamp));
        properties.insert("max_centroid".to_string(), Value::from(peak.value));
        properties
    }
}
