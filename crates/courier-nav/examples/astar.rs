use std::collections::HashSet;

use courier_map::GridPoint;
use courier_nav::astar::{GridMask, Passable, astar_search};
use courier_nav::simplify::simplify_path;

fn main() {
    // Create a mask
    // 0 = walkable
    // 1 = blocked
    let mask = GridMask::from_rows(&[
        &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0], // Row 0
        &[0, 1, 1, 0, 0, 0, 0, 1, 1, 0], // Row 1
        &[0, 0, 0, 0, 1, 0, 0, 0, 0, 0], // Row 2
        &[0, 0, 1, 1, 1, 1, 0, 1, 0, 0], // Row 3
        &[0, 0, 0, 0, 0, 1, 0, 1, 0, 0], // Row 4
        &[0, 1, 1, 1, 0, 1, 0, 1, 1, 0], // Row 5
        &[0, 0, 0, 1, 0, 0, 0, 0, 0, 0], // Row 6
        &[0, 1, 0, 1, 0, 1, 1, 1, 0, 0], // Row 7
        &[0, 1, 0, 0, 0, 0, 0, 0, 1, 0], // Row 8
        &[0, 0, 0, 1, 1, 1, 0, 0, 0, 0], // Row 9
    ]);

    let start = GridPoint::new(0, 0);
    let goal = GridPoint::new(9, 9);
    println!("Start: {:?}, Goal: {:?}", start, goal);

    let Some(path) = astar_search(&mask, start, goal) else {
        println!("No path found.");
        return;
    };

    println!("\nPath found, {} cells.", path.len());
    let waypoints = simplify_path(&path);
    println!("Simplified to {} waypoints: {:?}", waypoints.len(), waypoints);

    let path_set: HashSet<GridPoint> = path.iter().cloned().collect();
    let corner_set: HashSet<GridPoint> = waypoints.iter().cloned().collect();

    println!("\nGrid with path ('*' path, 'o' retained waypoint):");
    for y in 0..10 {
        for x in 0..10 {
            let cell = GridPoint::new(x, y);
            if cell == start {
                print!("S ");
            } else if cell == goal {
                print!("G ");
            } else if corner_set.contains(&cell) {
                print!("o ");
            } else if path_set.contains(&cell) {
                print!("* ");
            } else if !mask.is_passable(cell) {
                print!("X ");
            } else {
                print!(". ");
            }
        }
        println!();
    }
}
