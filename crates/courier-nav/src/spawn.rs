//! Random placement of courier endpoints on road cells.

use courier_map::GridPoint;
use rand::Rng;

use crate::astar::Passable;

/// Default sampling budget before placement is reported as failed.
pub const DEFAULT_SAMPLE_ATTEMPTS: usize = 5000;

/// Samples uniform random cells until one is passable.
///
/// Returns `None` once `max_attempts` draws have all missed road; the caller
/// surfaces that as a "no valid road position" failure instead of planning
/// with a bogus point. The budget keeps a road-free (or nearly road-free)
/// map from hanging the request.
pub fn sample_road_cell<M, R>(map: &M, rng: &mut R, max_attempts: usize) -> Option<GridPoint>
where
    M: Passable,
    R: Rng + ?Sized,
{
    for _ in 0..max_attempts {
        let cell = GridPoint::new(rng.random_range(0..map.cols()), rng.random_range(0..map.rows()));
        if map.is_passable(cell) {
            return Some(cell);
        }
    }
    None
}

/// Samples `N` distinct passable cells from one shared attempt budget.
///
/// Used for the start/pickup/goal triplet; duplicates count against the
/// budget like any other miss.
pub fn sample_distinct_road_cells<const N: usize, M, R>(
    map: &M,
    rng: &mut R,
    max_attempts: usize,
) -> Option<[GridPoint; N]>
where
    M: Passable,
    R: Rng + ?Sized,
{
    let mut picked = [GridPoint::default(); N];
    let mut count = 0;
    for _ in 0..max_attempts {
        let cell = GridPoint::new(rng.random_range(0..map.cols()), rng.random_range(0..map.rows()));
        if map.is_passable(cell) && !picked[..count].contains(&cell) {
            picked[count] = cell;
            count += 1;
            if count == N {
                return Some(picked);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::astar::GridMask;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_open_grid_always_yields_a_cell() {
        let mask = GridMask::open(10, 10);
        let mut rng = StdRng::seed_from_u64(7);
        let cell = sample_road_cell(&mask, &mut rng, DEFAULT_SAMPLE_ATTEMPTS).unwrap();
        assert!(mask.is_passable(cell));
    }

    #[test]
    fn test_blocked_grid_exhausts_the_budget() {
        let mut mask = GridMask::open(6, 6);
        for y in 0..6 {
            for x in 0..6 {
                mask.block(x, y);
            }
        }
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(sample_road_cell(&mask, &mut rng, DEFAULT_SAMPLE_ATTEMPTS), None);
    }

    #[test]
    fn test_distinct_triplet() {
        let mask = GridMask::open(8, 8);
        let mut rng = StdRng::seed_from_u64(42);
        let [a, b, c] =
            sample_distinct_road_cells::<3, _, _>(&mask, &mut rng, DEFAULT_SAMPLE_ATTEMPTS).unwrap();
        assert!(a != b && b != c && a != c);
        assert!(mask.is_passable(a) && mask.is_passable(b) && mask.is_passable(c));
    }

    #[test]
    fn test_triplet_needs_three_road_cells() {
        // Only two passable cells: a distinct triplet can never be drawn.
        let mut mask = GridMask::open(4, 4);
        for y in 0..4 {
            for x in 0..4 {
                if !((x, y) == (0, 0) || (x, y) == (3, 3)) {
                    mask.block(x, y);
                }
            }
        }
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(sample_distinct_road_cells::<3, _, _>(&mask, &mut rng, 2000), None);
    }
}
