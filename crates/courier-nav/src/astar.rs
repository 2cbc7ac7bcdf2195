/*

A* = f(n) = g(n) + h(n)

Where:
    n = a grid cell
    g(n) = actual step count from the start cell to n
    h(n) = Manhattan distance from n to the goal (admissible and consistent
           on a 4-connected unit-cost grid, so returned paths are optimal)
    f(n) = total estimated cost of the cheapest path through n

The frontier is a binary min-heap on f. Ties on f resolve to the
lexicographically smallest (y, x) cell, which makes the returned path
deterministic; callers comparing outputs should still compare path cost, not
cell identity, since any equal-cost path satisfies the contract.

*/

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use courier_map::GridPoint;

/// The passability view searched by [`astar_search`].
///
/// Cells outside `cols() x rows()` are never generated as neighbors, so
/// implementations only answer for in-range cells.
pub trait Passable {
    /// Number of grid columns.
    fn cols(&self) -> usize;
    /// Number of grid rows.
    fn rows(&self) -> usize;
    /// Whether the cell can be traversed.
    fn is_passable(&self, cell: GridPoint) -> bool;
}

/// A dense boolean passability mask, for tests and demos.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridMask {
    cols: usize,
    rows: usize,
    blocked: Vec<bool>,
}

impl GridMask {
    /// Creates a fully open mask.
    pub fn open(cols: usize, rows: usize) -> Self {
        GridMask { cols, rows, blocked: vec![false; cols * rows] }
    }

    /// Creates a mask from rows of cells, `0` walkable and anything else blocked.
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        let mut mask = Self::open(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, &cell) in row.iter().enumerate() {
                if cell != 0 {
                    mask.block(x, y);
                }
            }
        }
        mask
    }

    /// Marks a cell impassable.
    pub fn block(&mut self, x: usize, y: usize) {
        self.blocked[y * self.cols + x] = true;
    }
}

impl Passable for GridMask {
    fn cols(&self) -> usize {
        self.cols
    }

    fn rows(&self) -> usize {
        self.rows
    }

    fn is_passable(&self, cell: GridPoint) -> bool {
        cell.x < self.cols && cell.y < self.rows && !self.blocked[cell.y * self.cols + cell.x]
    }
}

fn manhattan_distance(a: GridPoint, b: GridPoint) -> usize {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}

fn neighbors<M: Passable>(map: &M, p: GridPoint) -> Vec<GridPoint> {
    let mut neighbors = Vec::with_capacity(4);
    if p.y > 0 {
        neighbors.push(GridPoint::new(p.x, p.y - 1)); // Up
    }
    if p.x > 0 {
        neighbors.push(GridPoint::new(p.x - 1, p.y)); // Left
    }
    if p.x + 1 < map.cols() {
        neighbors.push(GridPoint::new(p.x + 1, p.y)); // Right
    }
    if p.y + 1 < map.rows() {
        neighbors.push(GridPoint::new(p.x, p.y + 1)); // Down
    }
    neighbors.retain(|n| map.is_passable(*n));
    neighbors
}

#[derive(Copy, Clone, Eq, PartialEq)]
struct State {
    cost: usize,
    position: GridPoint,
}

// The priority queue depends on `Ord`.
// Explicitly implement the trait so the queue becomes a min-heap
// instead of a max-heap, with ties resolved to the smallest (y, x).
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.position.y.cmp(&self.position.y))
            .then_with(|| other.position.x.cmp(&self.position.x))
    }
}

// `PartialOrd` needs to be implemented as well.
impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn reconstruct_path(came_from: &HashMap<GridPoint, GridPoint>, mut current: GridPoint) -> Vec<GridPoint> {
    let mut path = vec![current];
    while let Some(&previous) = came_from.get(&current) {
        path.push(previous);
        current = previous;
    }
    path.reverse();
    path
}

/// Shortest 4-connected path from `start` to `goal`, inclusive of both.
///
/// Edges have unit cost; an edge into a cell exists iff that cell is
/// passable. Both endpoints are the caller's responsibility (validated road
/// cells inside the grid) and are not re-checked here. `start == goal`
/// returns the single-cell path. Returns `None` when the goal is
/// unreachable.
pub fn astar_search<M: Passable>(map: &M, start: GridPoint, goal: GridPoint) -> Option<Vec<GridPoint>> {
    let mut open_set = BinaryHeap::new();
    let mut came_from = HashMap::new();

    let mut g_score = HashMap::new();
    g_score.insert(start, 0usize);

    open_set.push(State { cost: manhattan_distance(start, goal), position: start });

    while let Some(State { cost: _, position: current }) = open_set.pop() {
        if current == goal {
            return Some(reconstruct_path(&came_from, current));
        }

        for neighbor in neighbors(map, current) {
            let tentative_g_score = g_score[&current] + 1; // Cost between adjacent cells is 1

            if tentative_g_score < *g_score.get(&neighbor).unwrap_or(&usize::MAX) {
                came_from.insert(neighbor, current);
                g_score.insert(neighbor, tentative_g_score);
                let h = manhattan_distance(neighbor, goal);
                open_set.push(State { cost: tentative_g_score + h, position: neighbor });
            }
        }
    }

    None // No path found
}
