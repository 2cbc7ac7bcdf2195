//! Route planning for the courier simulation.
//!
//! Search runs on a coarse grid over the raster map: A* with a Manhattan
//! heuristic finds cell paths, the simplifier collapses them to
//! direction-change waypoints, and the planner task does both legs of a
//! courier route (start → pickup → goal) off the tick thread.

pub mod astar;
pub mod mapgen;
pub mod planner;
pub mod route;
pub mod simplify;
pub mod spawn;

pub use astar::{GridMask, Passable, astar_search};
pub use planner::{RouteRequest, RouteResponse, run_planner_task};
pub use route::{plan_route, plan_waypoints};
pub use simplify::simplify_path;
pub use spawn::{DEFAULT_SAMPLE_ATTEMPTS, sample_distinct_road_cells, sample_road_cell};
