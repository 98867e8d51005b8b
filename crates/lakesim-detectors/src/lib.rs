//! LakeSim Detectors
//!
//! Event detection over gridded lake simulation output.
//!
//! Each configured detector pairs a frame classifier with an event assembler:
//! - `upwelling`: k-means bimodality of the temperature field
//! - `localised_currents`: connected regions of high current speed
//! - `threshold_detection`: any cell beyond a fixed value
//!
//! Frames are classified strictly in time order. The assembler turns the
//! verdict stream into time-bounded event records, bridging short gaps with
//! a configurable merge window.

pub mod assembler;
pub mod classifier;
pub mod config;
pub mod currents;
pub mod depth;
pub mod kmeans;
pub mod registry;
pub mod segments;
pub mod threshold;
pub mod upwelling;
pub mod verify;

pub use assembler::{AssemblerState, EventAssembler, EventSpan, Transition};
pub use classifier::{FrameClassifier, Peak, Verdict};
pub use config::{
    CurrentsParams, DetectorDefinition, DetectorKind, DetectorParams, ThresholdField,
    ThresholdParams, UpwellingParams,
};
pub use depth::resolve_depth_index;
pub use registry::{build_classifier, DiagnosticSink, EventRegistry, LoggingSink};
pub use verify::verify_temperature;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::assembler::EventAssembler;
    pub use crate::classifier::{FrameClassifier, Peak, Verdict};
    pub use crate::config::{DetectorDefinition, DetectorKind};
    pub use crate::currents::LocalisedCurrentsClassifier;
    pub use crate::registry::{DiagnosticSink, EventRegistry};
    pub use crate::threshold::ThresholdClassifier;
    pub use crate::upwelling::UpwellingClassifier;
}
