//! Map-side building blocks for the courier simulation.
//!
//! This crate owns the raster buffer, the road-color classifier and the
//! coarse grid mapping between continuous raster coordinates and grid cells.
//! It knows nothing about searching or rendering; search consumes it through
//! [`RoadGrid`] and the rendering side only ever reads pixels.

pub mod classify;
pub mod error;
pub mod grid;
pub mod raster;
pub mod road;

pub use classify::{Granularity, RoadBand, RoadClassifier};
pub use error::MapError;
pub use grid::{GridFrame, GridPoint, WorldPoint};
pub use raster::{RasterMap, Rgba};
pub use road::RoadGrid;
