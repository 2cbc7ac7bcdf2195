//! Coarse grid mapping between continuous raster coordinates and cells.

#![warn(missing_docs)]

use crate::error::MapError;

/// Represents a point in grid coordinates (cell indices).
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridPoint {
    /// The x-coordinate (column index) in the grid.
    pub x: usize,
    /// The y-coordinate (row index) in the grid.
    pub y: usize,
}

impl GridPoint {
    /// Creates a new `GridPoint`.
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Represents a point in continuous raster coordinates (pixels).
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldPoint {
    /// The x-coordinate in pixels.
    pub x: f32,
    /// The y-coordinate in pixels.
    pub y: f32,
}

impl WorldPoint {
    /// Creates a new `WorldPoint`.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A fixed-cell-size grid laid over a raster.
///
/// The grid origin is the raster's top-left corner; the grid covers
/// `floor(width / cell_size)` columns and `floor(height / cell_size)` rows.
/// The cell size is a session-wide configuration constant, not derived from
/// the map: smaller cells raise path fidelity and search cost quadratically.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridFrame {
    cell_size: f32,
    cols: usize,
    rows: usize,
}

impl GridFrame {
    /// Creates a grid frame covering a raster of the given pixel dimensions.
    ///
    /// # Arguments
    /// * `width` - Raster width in pixels
    /// * `height` - Raster height in pixels
    /// * `cell_size` - Cell edge length in pixels
    ///
    /// # Returns
    /// * `Result<Self, MapError>` - The frame, or an error when the cell
    ///   size is not finite and positive or yields a grid with no cells
    pub fn new(width: usize, height: usize, cell_size: f32) -> Result<Self, MapError> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(MapError::InvalidCellSize("Cell size must be finite and positive"));
        }
        let cols = (width as f32 / cell_size).floor() as usize;
        let rows = (height as f32 / cell_size).floor() as usize;
        if cols == 0 || rows == 0 {
            return Err(MapError::InvalidDimensions(
                "Cell size larger than the raster leaves an empty grid",
            ));
        }
        Ok(GridFrame { cell_size, cols, rows })
    }

    /// Cell edge length in pixels.
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of grid columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of grid rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Converts continuous raster coordinates to grid coordinates.
    /// Returns `None` when the point falls outside the grid.
    pub fn world_to_grid(&self, world_p: WorldPoint) -> Option<GridPoint> {
        let grid_x_f = world_p.x / self.cell_size;
        let grid_y_f = world_p.y / self.cell_size;

        if grid_x_f < 0.0
            || grid_y_f < 0.0
            || grid_x_f >= self.cols as f32
            || grid_y_f >= self.rows as f32
        {
            return None;
        }

        Some(GridPoint::new(grid_x_f.floor() as usize, grid_y_f.floor() as usize))
    }

    /// Converts grid coordinates to the continuous center point of the cell.
    /// Returns `None` when the cell is out of bounds.
    ///
    /// Round-tripping a point through `world_to_grid` and back lands within
    /// `cell_size / sqrt(2)` of the original (exactly on it only for points
    /// already at a cell center).
    pub fn grid_to_world(&self, grid_p: GridPoint) -> Option<WorldPoint> {
        if grid_p.x < self.cols && grid_p.y < self.rows {
            let world_x = (grid_p.x as f32 + 0.5) * self.cell_size;
            let world_y = (grid_p.y as f32 + 0.5) * self.cell_size;
            Some(WorldPoint::new(world_x, world_y))
        } else {
            None
        }
    }
}
