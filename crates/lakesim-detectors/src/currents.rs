//! Localised currents classifier
//!
//! Flags frames containing a coherent patch of fast-moving water. Cells at or
//! above the speed threshold are grouped into 8-connected regions, and a
//! frame qualifies when at least one region's size falls inside the
//! configured band. The band is given as fractions of the wetted area, which
//! is counted once from the first frame seen.

use crate::classifier::{FrameClassifier, Verdict};
use crate::config::{CurrentsParams, DetectorKind};
use crate::segments::label_components;
use lakesim_core::reader::FrameRequest;
use lakesim_core::types::is_valid;
use lakesim_core::{Error, Frame, Grid, Result};
use tracing::{debug, trace};

/// Slack for fraction-to-cell rounding so `0.1 * 50` stays 5
const ROUNDING_EPSILON: f64 = 1e-9;

/// Cell-count bounds derived from the wetted area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellBounds {
    /// Valid cells in the reference frame
    pub wetted_cells: usize,
    pub min_cells: usize,
    pub max_cells: usize,
}

impl CellBounds {
    /// Convert area fractions to inclusive cell-count bounds
    pub fn from_fractions(wetted_cells: usize, min_fraction: f64, max_fraction: f64) -> Self {
        let wetted = wetted_cells as f64;
        Self {
            wetted_cells,
            min_cells: (min_fraction * wetted - ROUNDING_EPSILON).ceil().max(0.0) as usize,
            max_cells: (max_fraction * wetted + ROUNDING_EPSILON).floor().max(0.0) as usize,
        }
    }
}

/// Thresholded-segment classifier for localised currents
pub struct LocalisedCurrentsClassifier {
    params: CurrentsParams,
    bounds: Option<CellBounds>,
}

impl LocalisedCurrentsClassifier {
    /// Create a new localised currents classifier
    pub fn new(params: CurrentsParams) -> Self {
        Self {
            params,
            bounds: None,
        }
    }

    /// Bounds in use, once the reference frame has been seen
    pub fn bounds(&self) -> Option<CellBounds> {
        self.bounds
    }

    fn bounds_for(&mut self, speed: &Grid) -> CellBounds {
        *self.bounds.get_or_insert_with(|| {
            let (min_fraction, max_fraction) = self.params.area_fractions();
            let bounds = CellBounds::from_fractions(speed.valid_count(), min_fraction, max_fraction);
            debug!(
                wetted_cells = bounds.wetted_cells,
                min_cells = bounds.min_cells,
                max_cells = bounds.max_cells,
                "Reference wetted area established"
            );
            bounds
        })
    }
}

impl FrameClassifier for LocalisedCurrentsClassifier {
    fn kind(&self) -> DetectorKind {
        DetectorKind::LocalisedCurrents
    }

    fn request(&self) -> FrameRequest {
        FrameRequest::Velocity
    }

    fn depth(&self) -> f64 {
        self.params.depth
    }

    fn classify(&mut self, frame: &Frame) -> Result<Verdict> {
        let (u, v) = frame
            .as_vector()
            .ok_or_else(|| Error::config("localised currents classifier requires a velocity frame"))?;

        let speed = Grid::magnitude(u, v)?;
        let bounds = self.bounds_for(&speed);

        let threshold = self.params.threshold;
        let mask: Vec<bool> = speed
            .values()
            .iter()
            .map(|&s| is_valid(s) && s >= threshold)
            .collect();

        let segmentation = label_components(&mask, speed.rows(), speed.cols());
        trace!(
            timestamp = %frame.timestamp,
            regions = segmentation.count(),
            largest = segmentation.largest(),
            "segmented current speed"
        );

        if segmentation.any_sized_within(bounds.min_cells, bounds.max_cells) {
            Ok(Verdict::qualified(None))
        } else {
            Ok(Verdict::rejected())
        }
    }

    fn reset(&mut self) {
        self.bounds = None;
    }
}
