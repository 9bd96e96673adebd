//! Error types shared by the raster crates.

use thiserror::Error;

/// Result type alias for raster operations.
pub type Result<T> = std::result::Result<T, RasterError>;

/// Errors that can occur while constructing or exporting raster bands.
#[derive(Error, Debug)]
pub enum RasterError {
    /// Width, height, or resolution is non-positive, or data does not
    /// match the declared resolution.
    #[error("invalid raster geometry: {reason}")]
    InvalidGeometry { reason: String },

    /// File write failed for ordinary filesystem reasons.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Image encoding failed.
    #[error("image error: {0}")]
    Image(String),
}

impl RasterError {
    /// Shorthand for an `InvalidGeometry` error.
    pub fn geometry(reason: impl Into<String>) -> Self {
        RasterError::InvalidGeometry {
            reason: reason.into(),
        }
    }
}
