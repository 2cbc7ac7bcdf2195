//! Direction-change compression of cell paths.

use courier_map::GridPoint;

/// Collapses a cell-by-cell path to its direction-change waypoints.
///
/// The first and last cells are always retained; an interior cell survives
/// iff the step into it differs from the step out of it (both measured on
/// the original path). Straight runs therefore compress to their endpoints
/// while every corner is preserved, so connecting the retained cells with
/// straight segments reconstructs the original turn sequence.
///
/// Paths shorter than 3 cells are returned unchanged. This is not
/// line-of-sight shortcutting: no cell is skipped unless the path through
/// it is exactly collinear.
pub fn simplify_path(path: &[GridPoint]) -> Vec<GridPoint> {
    if path.len() < 3 {
        return path.to_vec();
    }

    let mut simplified = Vec::with_capacity(path.len());
    simplified.push(path[0]);
    for i in 1..path.len() - 1 {
        if step(path[i - 1], path[i]) != step(path[i], path[i + 1]) {
            simplified.push(path[i]);
        }
    }
    simplified.push(path[path.len() - 1]);
    simplified
}

fn step(from: GridPoint, to: GridPoint) -> (isize, isize) {
    (
        to.x as isize - from.x as isize,
        to.y as isize - from.y as isize,
    )
}
