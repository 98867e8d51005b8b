//! Frame reader abstraction over gridded simulation output

use crate::{Error, Field, Frame, Grid, Result};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// What a classifier needs from each time step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRequest {
    /// One scalar field
    Scalar(Field),
    /// Both velocity components
    Velocity,
}

/// A randomly-sliceable source of gridded fields for one output file
///
/// Implementations cover a single file whose time axis is already in
/// ascending order. Readers for consecutive files are consumed in
/// file-name order, which the producer guarantees to be chronological.
pub trait FrameReader {
    /// Human readable name of the underlying source (usually a file name)
    fn name(&self) -> &str;

    /// Absolute timestamps of every time step
    fn timestamps(&self) -> Result<Vec<DateTime<Utc>>>;

    /// Depth of each vertical layer, in layer-index order
    fn layer_depths(&self) -> Result<Vec<f64>>;

    /// Read one 2D field at a time step and depth layer
    fn read_field(&self, field: Field, time_index: usize, depth_index: usize) -> Result<Grid>;

    /// Read everything a request needs into a frame
    fn read_frame(
        &self,
        request: FrameRequest,
        timestamp: DateTime<Utc>,
        time_index: usize,
        depth_index: usize,
    ) -> Result<Frame> {
        match request {
            FrameRequest::Scalar(field) => Ok(Frame::scalar(
                timestamp,
                self.read_field(field, time_index, depth_index)?,
            )),
            FrameRequest::Velocity => Ok(Frame::vector(
                timestamp,
                self.read_field(Field::VelocityU, time_index, depth_index)?,
                self.read_field(Field::VelocityV, time_index, depth_index)?,
            )),
        }
    }
}

/// In-memory reader for synthetic runs
#[derive(Debug, Clone, Default)]
pub struct MemoryReader {
    name: String,
    depths: Vec<f64>,
    timestamps: Vec<DateTime<Utc>>,
    fields: HashMap<(Field, usize, usize), Grid>,
}

impl MemoryReader {
    /// Create an empty reader with the given layer depths
    pub fn new(name: impl Into<String>, depths: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            depths,
            timestamps: Vec::new(),
            fields: HashMap::new(),
        }
    }

    /// Append a time step and return its index
    pub fn push_time(&mut self, timestamp: DateTime<Utc>) -> usize {
        self.timestamps.push(timestamp);
        self.timestamps.len() - 1
    }

    /// Store a field at a time step and depth layer
    pub fn insert(&mut self, field: Field, time_index: usize, depth_index: usize, grid: Grid) {
        self.fields.insert((field, time_index, depth_index), grid);
    }

    /// Builder form of [`MemoryReader::insert`]
    pub fn with_field(
        mut self,
        field: Field,
        time_index: usize,
        depth_index: usize,
        grid: Grid,
    ) -> Self {
        self.insert(field, time_index, depth_index, grid);
        self
    }

    /// Number of time steps
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

impl FrameReader for MemoryReader {
    fn name(&self) -> &str {
        &self.name
    }

    fn timestamps(&self) -> Result<Vec<DateTime<Utc>>> {
        Ok(self.timestamps.clone())
    }

    fn layer_depths(&self) -> Result<Vec<f64>> {
        Ok(self.depths.clone())
    }

    fn read_field(&self, field: Field, time_index: usize, depth_index: usize) -> Result<Grid> {
        self.fields
            .get(&(field, time_index, depth_index))
            .cloned()
            .ok_or_else(|| {
                Error::resource(format!(
                    "{}: no {} data at time index {} depth index {}",
                    self.name,
                    field.as_str(),
                    time_index,
                    depth_index
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_memory_reader_velocity_frame() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut reader = MemoryReader::new("week.nc", vec![0.5, 1.5]);
        let idx = reader.push_time(t0);
        reader.insert(Field::VelocityU, idx, 1, Grid::from_rows(vec![vec![1.0]]).unwrap());
        reader.insert(Field::VelocityV, idx, 1, Grid::from_rows(vec![vec![2.0]]).unwrap());

        let frame = reader.read_frame(FrameRequest::Velocity, t0, idx, 1).unwrap();
        let (u, v) = frame.as_vector().unwrap();
        assert_eq!(u.values(), &[1.0]);
        assert_eq!(v.values(), &[2.0]);
        assert_eq!(frame.timestamp, t0);
    }

    #[test]
    fn test_memory_reader_missing_field() {
        let reader = MemoryReader::new("empty.nc", vec![0.0]);
        let err = reader.read_field(Field::Temperature, 0, 0).unwrap_err();
        assert!(matches!(err, Error::Resource(_)));
    }
}
