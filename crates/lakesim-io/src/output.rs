//! Event list output

use lakesim_core::{EventRecord, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::path::Path;
use tracing::info;

/// Default output file name inside the simulation folder
pub const EVENTS_FILE: &str = "events.json";

/// Write events as a 4-space indented JSON list
///
/// The document is serialized in full before the file is touched, so a
/// serialization failure leaves any previous file intact.
pub fn write_events(path: impl AsRef<Path>, events: &[EventRecord]) -> Result<()> {
    let path = path.as_ref();

    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    events.serialize(&mut serializer)?;

    std::fs::write(path, buffer)?;
    info!("Wrote {} events to {}", events.len(), path.display());
    Ok(())
}
