//! NetCDF access errors

use thiserror::Error;

/// Error type for NetCDF operations
#[derive(Debug, Error)]
pub enum NetcdfError {
    /// NetCDF library error
    #[cfg(feature = "netcdf")]
    #[error("NetCDF error: {0}")]
    NetCDF(#[from] netcdf::Error),

    /// Variable not present in the file
    #[error("missing variable '{0}'")]
    MissingVariable(String),

    /// Variable or attribute with unexpected contents
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Index outside a variable's extent
    #[error("{variable}: index {index} out of range for dimension of length {len}")]
    OutOfBounds {
        variable: String,
        index: usize,
        len: usize,
    },

    /// Built without NetCDF support
    #[error("NetCDF support not enabled; rebuild with the `netcdf` feature")]
    FeatureDisabled,
}

impl From<NetcdfError> for lakesim_core::Error {
    fn from(e: NetcdfError) -> Self {
        lakesim_core::Error::resource(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converts_to_resource_error() {
        let err: lakesim_core::Error = NetcdfError::MissingVariable("t".to_string()).into();
        assert!(matches!(err, lakesim_core::Error::Resource(msg) if msg.contains("'t'")));
    }
}
