//! LakeSim Core
//!
//! Core types, traits, and utilities shared across LakeSim components.
//!
//! This crate provides:
//! - Gridded field and frame types with fill-value masking
//! - Event records as written to `events.json`
//! - The `FrameReader` trait implemented by dataset backends
//! - Error types and result handling
//! - CF time-unit conversion for simulation time axes

pub mod error;
pub mod event;
pub mod reader;
pub mod time;
pub mod types;

pub use error::{Error, Result};
pub use event::EventRecord;
pub use reader::{FrameReader, FrameRequest, MemoryReader};
pub use time::TimeUnits;
pub use types::{Field, Frame, FrameData, Grid, FILL_VALUE};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::event::EventRecord;
    pub use crate::reader::{FrameReader, FrameRequest, MemoryReader};
    pub use crate::types::{Field, Frame, FrameData, Grid, FILL_VALUE};
}
