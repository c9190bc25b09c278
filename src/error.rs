use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PatternError {
    #[error("Invalid grid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Stitch sequences have not been allocated")]
    NotAllocated,

    #[error("Invalid probability: {0}")]
    InvalidProbability(f64),

    #[error(
        "Stale stitch sequences: expected {width}x{height}, found {horizontal}x{vertical}"
    )]
    DimensionMismatch {
        width: usize,
        height: usize,
        horizontal: usize,
        vertical: usize,
    },

    #[error("Coordinate ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    #[error("Allocation failed: {0}")]
    Allocation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PatternError>;

impl From<std::collections::TryReserveError> for PatternError {
    fn from(err: std::collections::TryReserveError) -> Self {
        PatternError::Allocation(err.to_string())
    }
}

impl From<serde_json::Error> for PatternError {
    fn from(err: serde_json::Error) -> Self {
        PatternError::Config(err.to_string())
    }
}
