//! Error types for LakeSim

/// Result type alias using LakeSim's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for LakeSim operations
///
/// Configuration and resource errors are fatal for a detection run. Data
/// problems inside a frame (all cells filled, degenerate clustering) never
/// surface here; classifiers turn them into non-qualifying verdicts.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid or missing configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Detector type tag with no registered classifier
    #[error("unsupported detector type: {0}")]
    UnsupportedDetector(String),

    /// Requested depth outside the layer guard band
    #[error("depth {requested} m is outside the valid range [{min}, {max}] m")]
    OutOfRange {
        requested: f64,
        min: f64,
        max: f64,
    },

    /// Unreadable or corrupt input data
    #[error("resource error: {0}")]
    Resource(String),

    /// Simulation output failed a sanity check
    #[error("validation error: {0}")]
    Validation(String),

    /// Filesystem errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new unsupported detector error
    pub fn unsupported(tag: impl Into<String>) -> Self {
        Self::UnsupportedDetector(tag.into())
    }

    /// Create a new resource error
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Whether this error stems from configuration rather than data or I/O
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::UnsupportedDetector(_) | Self::OutOfRange { .. }
        )
    }
}
