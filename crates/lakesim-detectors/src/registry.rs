//! Detector registry and the per-frame detection loop

use crate::assembler::{EventAssembler, EventSpan};
use crate::classifier::{FrameClassifier, Verdict};
use crate::config::{DetectorDefinition, DetectorParams};
use crate::currents::LocalisedCurrentsClassifier;
use crate::depth::resolve_depth_index;
use crate::threshold::ThresholdClassifier;
use crate::upwelling::UpwellingClassifier;
use lakesim_core::{EventRecord, Frame, FrameReader, Result};
use serde_json::Value;
use tracing::{debug, info, info_span, warn};

/// Optional observer of qualifying frames
///
/// Used for diagnostics such as plotting the frames that triggered an event.
/// Failures are logged and never affect detection.
pub trait DiagnosticSink {
    /// Called after every qualifying frame
    fn on_qualifying(
        &mut self,
        definition: &DetectorDefinition,
        frame: &Frame,
        verdict: &Verdict,
    ) -> Result<()>;
}

/// Sink that records qualifying frames in the log
#[derive(Debug, Default)]
pub struct LoggingSink {
    seen: usize,
}

impl LoggingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of qualifying frames observed
    pub fn seen(&self) -> usize {
        self.seen
    }
}

impl DiagnosticSink for LoggingSink {
    fn on_qualifying(
        &mut self,
        definition: &DetectorDefinition,
        frame: &Frame,
        verdict: &Verdict,
    ) -> Result<()> {
        self.seen += 1;
        debug!(
            detector = %definition.kind(),
            timestamp = %frame.timestamp,
            metric = ?verdict.metric,
            "qualifying frame"
        );
        Ok(())
    }
}

/// Instantiate the classifier for a definition
pub fn build_classifier(definition: &DetectorDefinition) -> Box<dyn FrameClassifier> {
    match &definition.params {
        DetectorParams::Upwelling(params) => Box::new(UpwellingClassifier::new(params.clone())),
        DetectorParams::LocalisedCurrents(params) => {
            Box::new(LocalisedCurrentsClassifier::new(params.clone()))
        }
        DetectorParams::ThresholdDetection(params) => {
            Box::new(ThresholdClassifier::new(params.clone()))
        }
    }
}

struct Detector {
    definition: DetectorDefinition,
    classifier: Box<dyn FrameClassifier>,
}

/// Registry of configured detectors
///
/// Built up front from every definition so configuration errors surface
/// before any data is read.
pub struct EventRegistry {
    detectors: Vec<Detector>,
}

impl EventRegistry {
    /// Create a registry from parsed definitions
    pub fn from_definitions(definitions: Vec<DetectorDefinition>) -> Self {
        let detectors = definitions
            .into_iter()
            .map(|definition| Detector {
                classifier: build_classifier(&definition),
                definition,
            })
            .collect();

        Self { detectors }
    }

    /// Parse the raw `events` list and create a registry
    pub fn from_values(values: &[Value]) -> Result<Self> {
        let definitions = DetectorDefinition::parse_all(values)?;
        info!("Configured {} event detectors", definitions.len());
        Ok(Self::from_definitions(definitions))
    }

    /// Number of configured detectors
    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    /// Configured definitions in order
    pub fn definitions(&self) -> impl Iterator<Item = &DetectorDefinition> {
        self.detectors.iter().map(|d| &d.definition)
    }

    /// Run every detector over the readers
    ///
    /// Readers are consumed in the given order, which must be chronological.
    /// Events are returned grouped by detector in definition order. The first
    /// error aborts the run and no events are returned.
    pub fn run(
        &mut self,
        readers: &[Box<dyn FrameReader>],
        mut sink: Option<&mut dyn DiagnosticSink>,
    ) -> Result<Vec<EventRecord>> {
        let mut events = Vec::new();

        for detector in &mut self.detectors {
            let kind = detector.definition.kind();
            let span = info_span!("detector", kind = %kind);
            let _enter = span.enter();

            let found = detector.run(readers, &mut sink)?;
            info!(
                "{} detector found {} events ({})",
                kind,
                found.len(),
                detector.definition.description
            );
            events.extend(found);
        }

        Ok(events)
    }
}

impl Detector {
    fn run(
        &mut self,
        readers: &[Box<dyn FrameReader>],
        sink: &mut Option<&mut dyn DiagnosticSink>,
    ) -> Result<Vec<EventRecord>> {
        let kind = self.definition.kind();
        let request = self.classifier.request();
        self.classifier.reset();

        let mut assembler = EventAssembler::new(self.definition.merge_window());

        for reader in readers {
            let depths = reader.layer_depths()?;
            let depth_index = resolve_depth_index(&depths, self.classifier.depth())?;
            let timestamps = reader.timestamps()?;
            debug!(
                reader = reader.name(),
                depth_index,
                frames = timestamps.len(),
                "reading frames"
            );

            for (time_index, timestamp) in timestamps.into_iter().enumerate() {
                let frame = reader.read_frame(request, timestamp, time_index, depth_index)?;
                let verdict = self.classifier.classify(&frame)?;
                metrics::counter!("lakesim_frames_classified_total", "detector" => kind.as_str())
                    .increment(1);

                if verdict.qualifies {
                    if let Some(sink) = sink.as_mut() {
                        if let Err(e) = sink.on_qualifying(&self.definition, &frame, &verdict) {
                            warn!("Diagnostic sink failed at {}: {}", frame.timestamp, e);
                        }
                    }
                }

                assembler.observe(timestamp, &verdict);
            }
        }

        let records: Vec<EventRecord> = assembler
            .finish()
            .into_iter()
            .map(|span| self.record(span))
            .collect();

        metrics::counter!("lakesim_events_total", "detector" => kind.as_str())
            .increment(records.len() as u64);

        Ok(records)
    }

    fn record(&self, span: EventSpan) -> EventRecord {
        EventRecord {
            event_type: self.definition.kind().as_str().to_string(),
            description: self.definition.description.clone(),
            start: span.start,
            end: span.end,
            properties: span
                .peak
                .map(|peak| self.classifier.peak_properties(&peak))
                .unwrap_or_default(),
            parameters: self.definition.parameters.clone(),
        }
    }
}
