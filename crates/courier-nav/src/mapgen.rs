//! Synthetic raster maps for demos and tests.

use courier_map::{MapError, RasterMap, Rgba};
use rand::Rng;

/// Mid-band asphalt gray; classifies as road under the canonical band.
pub const ROAD_FILL: Rgba = Rgba::new(120, 120, 120, 255);
/// Near-black obstacle fill; never classifies as road.
pub const BLOCK_FILL: Rgba = Rgba::new(24, 24, 24, 255);

/// Default obstacle probability per cell.
pub const DEFAULT_OBSTACLE_RATIO: f64 = 0.2;

/// Paints a random road/obstacle raster of `cols x rows` cells, each
/// `cell_size` pixels square.
///
/// Every cell is road-gray unless an independent draw with probability
/// `obstacle_ratio` (clamped to `0..=1`) blacks it out. Painting whole cells
/// keeps the raster aligned with the search grid when the same cell size is
/// used for both.
pub fn random_map<R: Rng + ?Sized>(
    rng: &mut R,
    cols: usize,
    rows: usize,
    cell_size: usize,
    obstacle_ratio: f64,
) -> Result<RasterMap, MapError> {
    if cell_size == 0 {
        return Err(MapError::InvalidCellSize("Cell size must be non-zero"));
    }
    let ratio = obstacle_ratio.clamp(0.0, 1.0);
    let mut map = RasterMap::filled(cols * cell_size, rows * cell_size, ROAD_FILL)?;
    for gy in 0..rows {
        for gx in 0..cols {
            if rng.random_bool(ratio) {
                map.fill_rect(
                    (gx * cell_size) as i32,
                    (gy * cell_size) as i32,
                    cell_size,
                    cell_size,
                    BLOCK_FILL,
                );
            }
        }
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_map::{Granularity, GridPoint, RoadBand, RoadClassifier, RoadGrid};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::Arc;

    #[test]
    fn test_generated_cells_classify_cleanly() {
        let mut rng = StdRng::seed_from_u64(99);
        let raster = random_map(&mut rng, 10, 8, 20, DEFAULT_OBSTACLE_RATIO).unwrap();
        assert_eq!(raster.width(), 200);
        assert_eq!(raster.height(), 160);

        let grid = RoadGrid::new(
            Arc::new(raster),
            RoadClassifier::new(RoadBand::asphalt(), Granularity::Point),
            20.0,
        )
        .unwrap();

        // Each cell is either road or obstacle, decided by its fill color.
        let mut roads = 0;
        for y in 0..8 {
            for x in 0..10 {
                if grid.is_passable(GridPoint::new(x, y)) {
                    roads += 1;
                }
            }
        }
        assert!(roads > 0, "a 0.2 obstacle ratio should leave road cells");
        assert!(roads < 80, "seed 99 should block at least one cell");
    }

    #[test]
    fn test_ratio_extremes() {
        let mut rng = StdRng::seed_from_u64(1);
        let all_road = random_map(&mut rng, 4, 4, 10, 0.0).unwrap();
        let all_block = random_map(&mut rng, 4, 4, 10, 1.0).unwrap();
        let band = RoadBand::asphalt();
        assert!(band.contains(all_road.get_pixel(5, 5).unwrap()));
        assert!(!band.contains(all_block.get_pixel(5, 5).unwrap()));
    }

    #[test]
    fn test_zero_cell_size_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            random_map(&mut rng, 4, 4, 0, 0.2),
            Err(MapError::InvalidCellSize(_))
        ));
    }
}
