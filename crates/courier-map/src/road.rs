//! The map view handed to route planning.

#![warn(missing_docs)]

use std::sync::Arc;

use crate::classify::RoadClassifier;
use crate::error::MapError;
use crate::grid::{GridFrame, GridPoint, WorldPoint};
use crate::raster::RasterMap;

/// A raster, its road classifier and its grid frame, bundled as one value.
///
/// The raster is shared behind an `Arc`, so cloning a `RoadGrid` is cheap
/// and the clone keeps observing the same immutable pixels even if the
/// session later loads a different map. That is what lets route planning
/// run off the tick thread without racing a map reload.
#[derive(Debug, Clone)]
pub struct RoadGrid {
    map: Arc<RasterMap>,
    classifier: RoadClassifier,
    frame: GridFrame,
}

impl RoadGrid {
    /// Builds the grid view over a raster.
    ///
    /// # Arguments
    /// * `map` - The shared raster
    /// * `classifier` - The road predicate
    /// * `cell_size` - Grid cell edge length in pixels
    ///
    /// # Returns
    /// * `Result<Self, MapError>` - The grid, or a `GridFrame` construction error
    pub fn new(
        map: Arc<RasterMap>,
        classifier: RoadClassifier,
        cell_size: f32,
    ) -> Result<Self, MapError> {
        let frame = GridFrame::new(map.width(), map.height(), cell_size)?;
        Ok(RoadGrid { map, classifier, frame })
    }

    /// The shared raster.
    pub fn map(&self) -> &Arc<RasterMap> {
        &self.map
    }

    /// The grid frame.
    pub fn frame(&self) -> &GridFrame {
        &self.frame
    }

    /// The road classifier.
    pub fn classifier(&self) -> &RoadClassifier {
        &self.classifier
    }

    /// Returns `true` when the cell's center point sits on road.
    ///
    /// Out-of-grid cells are impassable, which keeps the search predicate
    /// total without a separate bounds check at every call site.
    pub fn is_passable(&self, cell: GridPoint) -> bool {
        match self.frame.grid_to_world(cell) {
            Some(center) => self.classifier.is_road(&self.map, center),
            None => false,
        }
    }

    /// Classifies an arbitrary continuous point.
    pub fn is_road(&self, point: WorldPoint) -> bool {
        self.classifier.is_road(&self.map, point)
    }
}
