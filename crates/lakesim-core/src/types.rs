//! Gridded field and frame types

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel marking a grid cell with no valid data (land, out of domain)
pub const FILL_VALUE: f64 = -999.0;

/// Check whether a cell value carries data
#[inline]
pub fn is_valid(value: f64) -> bool {
    value.is_finite() && value != FILL_VALUE
}

/// Physical fields a detector can request from a reader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Water temperature (degC)
    Temperature,
    /// Eastward velocity component (m/s)
    VelocityU,
    /// Northward velocity component (m/s)
    VelocityV,
}

impl Field {
    /// Short name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::VelocityU => "u",
            Self::VelocityV => "v",
        }
    }
}

/// A 2D row-major field on the lake grid
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl Grid {
    /// Create a grid from row-major values
    pub fn new(rows: usize, cols: usize, values: Vec<f64>) -> Result<Self> {
        if values.len() != rows * cols {
            return Err(Error::resource(format!(
                "grid of {}x{} cells received {} values",
                rows,
                cols,
                values.len()
            )));
        }
        Ok(Self { rows, cols, values })
    }

    /// Create a grid with every cell set to the fill value
    pub fn filled(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            values: vec![FILL_VALUE; rows * cols],
        }
    }

    /// Build a grid from nested rows, all of equal length
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map(Vec::len).unwrap_or(0);
        if rows.iter().any(|r| r.len() != n_cols) {
            return Err(Error::resource("grid rows have unequal lengths"));
        }
        Self::new(n_rows, n_cols, rows.into_iter().flatten().collect())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Raw row-major values, fill cells included
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value at (row, col), `None` outside the grid
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.values[row * self.cols + col])
        } else {
            None
        }
    }

    /// Whether the cell at a flat index carries data
    pub fn is_valid_at(&self, index: usize) -> bool {
        self.values.get(index).copied().map(is_valid).unwrap_or(false)
    }

    /// Valid values in row-major order, fill cells removed
    pub fn valid_values(&self) -> Vec<f64> {
        self.values.iter().copied().filter(|v| is_valid(*v)).collect()
    }

    /// Number of cells carrying data
    pub fn valid_count(&self) -> usize {
        self.values.iter().filter(|v| is_valid(**v)).count()
    }

    /// Cell-wise magnitude of a vector field
    ///
    /// A cell is invalid in the result when it is invalid in either component.
    pub fn magnitude(u: &Grid, v: &Grid) -> Result<Grid> {
        if u.rows != v.rows || u.cols != v.cols {
            return Err(Error::resource(format!(
                "velocity components differ in shape: {}x{} vs {}x{}",
                u.rows, u.cols, v.rows, v.cols
            )));
        }

        let values = u
            .values
            .iter()
            .zip(&v.values)
            .map(|(&a, &b)| {
                if is_valid(a) && is_valid(b) {
                    (a * a + b * b).sqrt()
                } else {
                    FILL_VALUE
                }
            })
            .collect();

        Ok(Grid {
            rows: u.rows,
            cols: u.cols,
            values,
        })
    }
}

/// Field payload of a frame
#[derive(Debug, Clone, PartialEq)]
pub enum FrameData {
    /// A single scalar field (temperature)
    Scalar(Grid),
    /// Vector components (velocity)
    Vector { u: Grid, v: Grid },
}

/// One time step of gridded data at a single depth layer
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Absolute timestamp of this time step
    pub timestamp: DateTime<Utc>,

    /// Field values for this time step
    pub data: FrameData,
}

impl Frame {
    /// Create a scalar frame
    pub fn scalar(timestamp: DateTime<Utc>, grid: Grid) -> Self {
        Self {
            timestamp,
            data: FrameData::Scalar(grid),
        }
    }

    /// Create a vector frame
    pub fn vector(timestamp: DateTime<Utc>, u: Grid, v: Grid) -> Self {
        Self {
            timestamp,
            data: FrameData::Vector { u, v },
        }
    }

    /// Scalar field of this frame, if it carries one
    pub fn as_scalar(&self) -> Option<&Grid> {
        match &self.data {
            FrameData::Scalar(grid) => Some(grid),
            FrameData::Vector { .. } => None,
        }
    }

    /// Vector components of this frame, if it carries them
    pub fn as_vector(&self) -> Option<(&Grid, &Grid)> {
        match &self.data {
            FrameData::Vector { u, v } => Some((u, v)),
            FrameData::Scalar(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_shape_mismatch() {
        assert!(Grid::new(2, 2, vec![1.0, 2.0, 3.0]).is_err());
        assert!(Grid::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).is_err());
    }

    #[test]
    fn test_valid_values_drop_fill() {
        let grid = Grid::from_rows(vec![
            vec![4.0, FILL_VALUE, 5.0],
            vec![f64::NAN, 6.0, FILL_VALUE],
        ])
        .unwrap();

        assert_eq!(grid.valid_values(), vec![4.0, 5.0, 6.0]);
        assert_eq!(grid.valid_count(), 3);
        assert!(!grid.is_valid_at(1));
        assert_eq!(grid.get(1, 1), Some(6.0));
        assert_eq!(grid.get(2, 0), None);
    }

    #[test]
    fn test_magnitude_propagates_fill() {
        let u = Grid::from_rows(vec![vec![3.0, FILL_VALUE, 0.0]]).unwrap();
        let v = Grid::from_rows(vec![vec![4.0, 1.0, FILL_VALUE]]).unwrap();

        let speed = Grid::magnitude(&u, &v).unwrap();
        assert_eq!(speed.values(), &[5.0, FILL_VALUE, FILL_VALUE]);
    }

    #[test]
    fn test_magnitude_shape_mismatch() {
        let u = Grid::filled(2, 3);
        let v = Grid::filled(3, 2);
        assert!(Grid::magnitude(&u, &v).is_err());
    }
}
