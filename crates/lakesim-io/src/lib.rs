//! LakeSim I/O
//!
//! Everything that touches the simulation folder on disk:
//! - Discovery of the per-week NetCDF output files
//! - A NetCDF implementation of [`FrameReader`] (behind the `netcdf` feature)
//! - Writing `events.json`
//!
//! [`FrameReader`]: lakesim_core::FrameReader

pub mod dataset;
pub mod error;
pub mod netcdf_reader;
pub mod output;
pub mod variables;

pub use dataset::{discover_datasets, open_readers, POSTPROCESS_DIR};
pub use error::NetcdfError;
pub use netcdf_reader::NetcdfReader;
pub use output::{write_events, EVENTS_FILE};
pub use variables::GridVariables;
