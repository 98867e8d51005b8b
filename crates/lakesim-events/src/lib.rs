//! LakeSim Events
//!
//! The event detection stage of the lake simulation pipeline. Reads the
//! detector definitions from `properties.json`, runs them over the simulation
//! output and writes the resulting event list to `events.json`.

pub mod config;

use anyhow::{Context, Result};
use config::Properties;
use lakesim_core::FrameReader;
use lakesim_detectors::{verify_temperature, EventRegistry, LoggingSink};
use lakesim_io::{write_events, GridVariables, EVENTS_FILE};
use std::path::{Path, PathBuf};
use tracing::info;

/// Options for one run of the stage
#[derive(Debug, Clone)]
pub struct StageOptions {
    /// Simulation folder
    pub folder: PathBuf,

    /// Docker image that produced the output
    pub docker: String,

    /// Sanity-check surface temperature before detection
    pub verify: bool,

    /// Output file, relative to the folder unless absolute
    pub output: Option<PathBuf>,
}

impl StageOptions {
    /// Options with defaults for everything but the folder
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
            docker: config::DEFAULT_IMAGE.to_string(),
            verify: false,
            output: None,
        }
    }

    /// Where `events.json` goes
    pub fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => self.folder.join(path),
            None => self.folder.join(EVENTS_FILE),
        }
    }
}

/// What a run of the stage did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    /// No `events` key in `properties.json`
    Skipped,
    /// Events written to `path`
    Written { path: PathBuf, events: usize },
}

/// Run the stage against the NetCDF output of the folder
pub fn run_stage(options: &StageOptions) -> Result<StageOutcome> {
    run_stage_with(options, |folder, variables| {
        lakesim_io::open_readers(folder, variables)
    })
}

/// Run the stage with a custom source of frame readers
pub fn run_stage_with<F>(options: &StageOptions, open_readers: F) -> Result<StageOutcome>
where
    F: FnOnce(&Path, &GridVariables) -> lakesim_core::Result<Vec<Box<dyn FrameReader>>>,
{
    let folder = options.folder.as_path();
    let properties = Properties::load(folder)?;

    let Some(definitions) = properties.events else {
        info!("No event definitions included in properties.json");
        return Ok(StageOutcome::Skipped);
    };

    config::check_image(&options.docker)?;
    let mut registry =
        EventRegistry::from_values(&definitions).context("invalid event definitions")?;

    let readers = open_readers(folder, &properties.grid)
        .with_context(|| format!("unable to open simulation output in {}", folder.display()))?;

    if options.verify {
        verify_temperature(&readers)?;
    }

    info!("Detecting events");
    let mut sink = LoggingSink::new();
    let events = registry.run(&readers, Some(&mut sink))?;

    let path = options.output_path();
    write_events(&path, &events)
        .with_context(|| format!("unable to write {}", path.display()))?;

    Ok(StageOutcome::Written {
        path,
        events: events.len(),
    })
}
