//! This module defines the error types used by the `courier-map` crate.

#![warn(missing_docs)]

/// Error type for map construction and access.
///
/// This enum encapsulates all possible errors that can occur when building
/// rasters, grids or classifiers from invalid parameters.
#[derive(Debug, PartialEq)]
pub enum MapError {
    /// Error for invalid raster or grid dimensions.
    /// This variant is returned when a dimension is zero or the resulting
    /// grid would have no cells.
    InvalidDimensions(&'static str),
    /// Error for an invalid grid cell size.
    /// This variant is returned when the cell size is not finite and positive.
    InvalidCellSize(&'static str),
    /// Error for a pixel buffer whose length does not match the declared
    /// raster dimensions.
    BufferSizeMismatch(&'static str),
    /// Error for an inverted road color band (`min > max`).
    InvalidBand(&'static str),
}

impl core::fmt::Display for MapError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MapError::InvalidDimensions(msg) => write!(f, "Invalid map dimensions: {}", msg),
            MapError::InvalidCellSize(msg) => write!(f, "Invalid cell size: {}", msg),
            MapError::BufferSizeMismatch(msg) => write!(f, "Pixel buffer mismatch: {}", msg),
            MapError::InvalidBand(msg) => write!(f, "Invalid road band: {}", msg),
        }
    }
}

impl core::error::Error for MapError {}
