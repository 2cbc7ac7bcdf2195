use std::sync::Arc;

use courier_map::{Granularity, RoadBand, RoadClassifier, RoadGrid};
use courier_nav::mapgen::{DEFAULT_OBSTACLE_RATIO, random_map};
use courier_nav::route::plan_waypoints;
use courier_nav::spawn::{DEFAULT_SAMPLE_ATTEMPTS, sample_distinct_road_cells};

fn main() {
    // Paint a random 24x18 cell map (20 px cells) and plan a courier route
    // between three randomly placed road cells.
    let mut rng = rand::rng();
    let raster = random_map(&mut rng, 24, 18, 20, DEFAULT_OBSTACLE_RATIO).unwrap();
    let grid = RoadGrid::new(
        Arc::new(raster),
        RoadClassifier::new(RoadBand::asphalt(), Granularity::Point),
        20.0,
    )
    .unwrap();

    let Some([start, pickup, goal]) =
        sample_distinct_road_cells::<3, _, _>(&grid, &mut rng, DEFAULT_SAMPLE_ATTEMPTS)
    else {
        println!("No valid road positions found.");
        return;
    };
    println!("Start: {:?}, Pickup: {:?}, Goal: {:?}", start, pickup, goal);

    match plan_waypoints(&grid, start, pickup, goal) {
        Some(waypoints) => {
            println!("Route found, {} waypoints:", waypoints.len());
            for w in &waypoints {
                println!("  ({:.1}, {:.1})", w.x, w.y);
            }
        }
        None => println!("No route found."),
    }
}
