//! Two-leg courier routes over a road grid.

use courier_map::{GridPoint, RoadGrid, WorldPoint};

use crate::astar::{Passable, astar_search};
use crate::simplify::simplify_path;

impl Passable for RoadGrid {
    fn cols(&self) -> usize {
        self.frame().cols()
    }

    fn rows(&self) -> usize {
        self.frame().rows()
    }

    fn is_passable(&self, cell: GridPoint) -> bool {
        RoadGrid::is_passable(self, cell)
    }
}

/// Plans the simplified cell route `start → pickup → goal`.
///
/// Both legs are searched independently; the pickup cell, which ends the
/// first leg and starts the second, appears only once in the concatenation.
/// Returns `None` when either leg is unreachable; there are no partial
/// routes.
pub fn plan_route<M: Passable>(
    map: &M,
    start: GridPoint,
    pickup: GridPoint,
    goal: GridPoint,
) -> Option<Vec<GridPoint>> {
    let mut cells = astar_search(map, start, pickup)?;
    let second = astar_search(map, pickup, goal)?;
    cells.pop(); // drop the duplicated junction, the second leg re-adds it
    cells.extend(second);
    Some(simplify_path(&cells))
}

/// Plans a route and maps it to cell-center waypoints in raster space.
pub fn plan_waypoints(
    grid: &RoadGrid,
    start: GridPoint,
    pickup: GridPoint,
    goal: GridPoint,
) -> Option<Vec<WorldPoint>> {
    let cells = plan_route(grid, start, pickup, goal)?;
    cells
        .into_iter()
        .map(|cell| grid.frame().grid_to_world(cell))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::astar::GridMask;
    use courier_map::{Granularity, RasterMap, Rgba, RoadBand, RoadClassifier};
    use std::sync::Arc;

    #[test]
    fn test_route_dedupes_junction() {
        let mask = GridMask::open(6, 6);
        let start = GridPoint::new(0, 0);
        let pickup = GridPoint::new(3, 0);
        let goal = GridPoint::new(3, 4);

        let route = plan_route(&mask, start, pickup, goal).unwrap();
        // Straight leg, corner at the pickup, straight leg: three waypoints,
        // with the pickup appearing exactly once.
        assert_eq!(route, vec![start, pickup, goal]);
        assert_eq!(route.iter().filter(|&&c| c == pickup).count(), 1);
    }

    #[test]
    fn test_collinear_junction_is_compressed_away() {
        let mask = GridMask::open(8, 3);
        let route = plan_route(
            &mask,
            GridPoint::new(0, 1),
            GridPoint::new(4, 1),
            GridPoint::new(7, 1),
        )
        .unwrap();
        // The pickup sits on a straight run, so simplification removes it.
        assert_eq!(route, vec![GridPoint::new(0, 1), GridPoint::new(7, 1)]);
    }

    #[test]
    fn test_unreachable_leg_fails_whole_route() {
        let mut mask = GridMask::open(5, 5);
        for y in 0..5 {
            mask.block(2, y);
        }
        // Pickup reachable, goal on the far side of the wall.
        assert_eq!(
            plan_route(&mask, GridPoint::new(0, 0), GridPoint::new(1, 3), GridPoint::new(4, 0)),
            None
        );
        // Pickup itself unreachable.
        assert_eq!(
            plan_route(&mask, GridPoint::new(0, 0), GridPoint::new(4, 0), GridPoint::new(1, 3)),
            None
        );
    }

    #[test]
    fn test_degenerate_legs() {
        let mask = GridMask::open(4, 4);
        let a = GridPoint::new(1, 1);
        let b = GridPoint::new(3, 1);
        // start == pickup collapses to a single leg.
        assert_eq!(plan_route(&mask, a, a, b), Some(vec![a, b]));
        // pickup == goal likewise.
        assert_eq!(plan_route(&mask, a, b, b), Some(vec![a, b]));
        // Fully degenerate request.
        assert_eq!(plan_route(&mask, a, a, a), Some(vec![a]));
    }

    #[test]
    fn test_waypoints_are_cell_centers() {
        let raster = RasterMap::filled(60, 20, Rgba::new(120, 120, 120, 255)).unwrap();
        let grid = RoadGrid::new(
            Arc::new(raster),
            RoadClassifier::new(RoadBand::asphalt(), Granularity::Point),
            10.0,
        )
        .unwrap();

        let waypoints = plan_waypoints(
            &grid,
            GridPoint::new(0, 0),
            GridPoint::new(3, 0),
            GridPoint::new(5, 1),
        )
        .unwrap();

        assert_eq!(waypoints.first(), Some(&WorldPoint::new(5.0, 5.0)));
        assert_eq!(waypoints.last(), Some(&WorldPoint::new(55.0, 15.0)));
        for w in &waypoints {
            assert_eq!((w.x - 5.0) % 10.0, 0.0);
            assert_eq!((w.y - 5.0) % 10.0, 0.0);
        }
    }
}
