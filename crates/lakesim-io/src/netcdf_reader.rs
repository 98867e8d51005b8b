//! NetCDF frame reader
//!
//! Fields are stored as `[time, depth, row, col]`; velocity components may
//! carry extra leading singleton dimensions, and a field without a depth
//! axis (`[time, row, col]`) is treated as a single layer that answers every
//! depth of the file's depth axis. A whole variable
//! is read on first use and sliced in memory for every later frame.

use crate::error::NetcdfError;
use crate::variables::GridVariables;
use chrono::{DateTime, Utc};
use lakesim_core::{Field, FrameReader, Grid, Result, FILL_VALUE};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

/// Values at or beyond this magnitude are treated as fill
const HUGE_FILL: f64 = 1.0e30;

/// A fully loaded variable and its shape
#[derive(Debug, Clone, PartialEq)]
pub struct FieldData {
    name: String,
    shape: Vec<usize>,
    values: Vec<f64>,
}

impl FieldData {
    /// Wrap raw values, replacing `fill` (and NaN or huge values) with [`FILL_VALUE`]
    pub fn new(
        name: impl Into<String>,
        shape: Vec<usize>,
        mut values: Vec<f64>,
        fill: Option<f64>,
    ) -> std::result::Result<Self, NetcdfError> {
        let name = name.into();
        if shape.len() < 3 {
            return Err(NetcdfError::InvalidData(format!(
                "{}: expected at least 3 dimensions, found {}",
                name,
                shape.len()
            )));
        }
        let expected: usize = shape.iter().product();
        if values.len() != expected {
            return Err(NetcdfError::InvalidData(format!(
                "{}: {} values for shape {:?}",
                name,
                values.len(),
                shape
            )));
        }
        if shape.len() > 4 && shape[..shape.len() - 4].iter().any(|&len| len != 1) {
            return Err(NetcdfError::InvalidData(format!(
                "{}: leading dimensions of shape {:?} must be singleton",
                name, shape
            )));
        }

        for value in values.iter_mut() {
            let is_fill = fill.is_some_and(|f| *value == f);
            if is_fill || !value.is_finite() || value.abs() >= HUGE_FILL {
                *value = FILL_VALUE;
            }
        }

        Ok(Self {
            name,
            shape,
            values,
        })
    }

    fn dims(&self) -> (usize, usize, usize, usize) {
        let n = self.shape.len();
        let layers = if n >= 4 { self.shape[n - 3] } else { 1 };
        let steps = if n >= 4 { self.shape[n - 4] } else { self.shape[0] };
        (steps, layers, self.shape[n - 2], self.shape[n - 1])
    }

    /// Extract one 2D slice
    ///
    /// A single-layer field returns its only layer for any depth index.
    pub fn slice(
        &self,
        time_index: usize,
        depth_index: usize,
    ) -> std::result::Result<Grid, NetcdfError> {
        let (steps, layers, rows, cols) = self.dims();
        let check = |index: usize, len: usize| {
            if index < len {
                Ok(())
            } else {
                Err(NetcdfError::OutOfBounds {
                    variable: self.name.clone(),
                    index,
                    len,
                })
            }
        };
        check(time_index, steps)?;
        let depth_index = if layers == 1 { 0 } else { depth_index };
        check(depth_index, layers)?;

        let plane = rows * cols;
        let offset = (time_index * layers + depth_index) * plane;
        Grid::new(rows, cols, self.values[offset..offset + plane].to_vec())
            .map_err(|e| NetcdfError::InvalidData(e.to_string()))
    }
}

/// [`FrameReader`] over one NetCDF output file
pub struct NetcdfReader {
    name: String,
    timestamps: Vec<DateTime<Utc>>,
    depths: Vec<f64>,
    cache: RefCell<HashMap<Field, Rc<FieldData>>>,
    #[cfg(feature = "netcdf")]
    file: netcdf::File,
    #[cfg(feature = "netcdf")]
    variables: GridVariables,
}

impl NetcdfReader {
    fn cached(&self, field: Field) -> Result<Rc<FieldData>> {
        if let Some(data) = self.cache.borrow().get(&field) {
            return Ok(Rc::clone(data));
        }
        let data = Rc::new(self.load(field)?);
        self.cache.borrow_mut().insert(field, Rc::clone(&data));
        Ok(data)
    }
}

#[cfg(feature = "netcdf")]
impl NetcdfReader {
    /// Open a file and read its time and depth axes
    pub fn open(path: impl AsRef<Path>, variables: &GridVariables) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let file = netcdf::open(path).map_err(NetcdfError::from)?;

        let (timestamps, depths) = read_axes(&file, variables, &name)?;

        tracing::debug!(
            file = %name,
            steps = timestamps.len(),
            layers = depths.len(),
            "opened NetCDF output"
        );

        Ok(Self {
            name,
            timestamps,
            depths,
            cache: RefCell::new(HashMap::new()),
            file,
            variables: variables.clone(),
        })
    }

    fn load(&self, field: Field) -> Result<FieldData> {
        let var_name = self.variables.field(field);
        let var = self
            .file
            .variable(var_name)
            .ok_or_else(|| NetcdfError::MissingVariable(var_name.to_string()))?;

        let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
        let fill = var
            .attribute_value("_FillValue")
            .and_then(|r| r.ok())
            .and_then(|v| match v {
                netcdf::AttributeValue::Double(d) => Some(d),
                netcdf::AttributeValue::Float(f) => Some(f as f64),
                _ => None,
            });
        let values: Vec<f64> = var.get_values(..).map_err(NetcdfError::from)?;

        tracing::debug!(file = %self.name, variable = var_name, ?shape, "loaded field");
        Ok(FieldData::new(var_name, shape, values, fill)?)
    }
}

#[cfg(feature = "netcdf")]
fn read_axes(
    file: &netcdf::File,
    variables: &GridVariables,
    name: &str,
) -> Result<(Vec<DateTime<Utc>>, Vec<f64>)> {
    use lakesim_core::TimeUnits;

    let time_var = file
        .variable(&variables.time)
        .ok_or_else(|| NetcdfError::MissingVariable(variables.time.clone()))?;
    let units = match time_var.attribute_value("units") {
        Some(Ok(netcdf::AttributeValue::Str(units))) => units,
        _ => {
            return Err(NetcdfError::InvalidData(format!(
                "{}: time variable '{}' has no string units",
                name, variables.time
            ))
            .into());
        }
    };
    let units = TimeUnits::parse(&units)?;
    let raw_time: Vec<f64> = time_var.get_values(..).map_err(NetcdfError::from)?;
    let timestamps = raw_time
        .into_iter()
        .map(|t| units.to_datetime(t))
        .collect::<Result<Vec<_>>>()?;

    let depth_var = file
        .variable(&variables.depth)
        .ok_or_else(|| NetcdfError::MissingVariable(variables.depth.clone()))?;
    let depths: Vec<f64> = depth_var.get_values(..).map_err(NetcdfError::from)?;

    Ok((timestamps, depths))
}

#[cfg(not(feature = "netcdf"))]
impl NetcdfReader {
    /// Open a file and read its time and depth axes
    pub fn open(path: impl AsRef<Path>, variables: &GridVariables) -> Result<Self> {
        let _ = (path, variables);
        Err(NetcdfError::FeatureDisabled.into())
    }

    fn load(&self, _field: Field) -> Result<FieldData> {
        Err(NetcdfError::FeatureDisabled.into())
    }
}

impl FrameReader for NetcdfReader {
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
        let data = self.cached(field)?;
        Ok(data.slice(time_index, depth_index)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_four_dimensional() {
        // 2 steps, 2 layers, 1x2 grid
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let data = FieldData::new("t", vec![2, 2, 1, 2], values, None).unwrap();

        assert_eq!(data.slice(0, 1).unwrap().values(), &[3.0, 4.0]);
        assert_eq!(data.slice(1, 0).unwrap().values(), &[5.0, 6.0]);
    }

    #[test]
    fn test_slice_with_leading_singletons() {
        let values = vec![1.0, 2.0, 3.0, 4.0];
        let data = FieldData::new("u", vec![1, 2, 1, 1, 2], values, None).unwrap();
        assert_eq!(data.slice(1, 0).unwrap().values(), &[3.0, 4.0]);
    }

    #[test]
    fn test_three_dimensional_is_single_layer() {
        let data = FieldData::new("t", vec![2, 1, 2], vec![1.0, 2.0, 3.0, 4.0], None).unwrap();
        assert_eq!(data.slice(1, 0).unwrap().values(), &[3.0, 4.0]);
        assert_eq!(data.slice(1, 2).unwrap(), data.slice(1, 0).unwrap());
        assert!(data.slice(2, 0).is_err());
    }

    #[test]
    fn test_layered_depth_index_checked() {
        let data = FieldData::new("t", vec![1, 2, 1, 1], vec![1.0, 2.0], None).unwrap();
        assert_eq!(data.slice(0, 1).unwrap().values(), &[2.0]);
        assert!(matches!(
            data.slice(0, 2),
            Err(NetcdfError::OutOfBounds { index: 2, len: 2, .. })
        ));
    }

    #[test]
    fn test_fill_values_normalised() {
        let values = vec![-999.0, 1.0e37, f64::NAN, 9999.0];
        let data = FieldData::new("t", vec![1, 1, 2, 2], values, Some(9999.0)).unwrap();
        let grid = data.slice(0, 0).unwrap();
        assert_eq!(grid.valid_count(), 0);
        assert!(grid.values().iter().all(|&v| v == FILL_VALUE));
    }

    #[test]
    fn test_out_of_bounds() {
        let data = FieldData::new("t", vec![1, 1, 1, 1], vec![1.0], None).unwrap();
        assert!(matches!(
            data.slice(3, 0),
            Err(NetcdfError::OutOfBounds { index: 3, len: 1, .. })
        ));
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        assert!(FieldData::new("t", vec![2, 2, 2], vec![1.0], None).is_err());
        assert!(FieldData::new("u", vec![2, 1, 1, 1, 1], vec![1.0, 2.0], None).is_err());
    }

    #[cfg(not(feature = "netcdf"))]
    #[test]
    fn test_open_without_feature() {
        let result = NetcdfReader::open("missing.nc", &GridVariables::default());
        assert!(matches!(result, Err(lakesim_core::Error::Resource(_))));
    }
}
