use std::sync::Arc;

use tracing::{debug, info};

use courier_map::{GridPoint, RasterMap, RoadBand, RoadClassifier, RoadGrid, WorldPoint};
use courier_motion::{MotionConfig, MotionController, Pose, RunState, Waypoint};
use courier_nav::planner::{RouteRequest, RouteResponse};
use courier_nav::{mapgen, plan_waypoints, sample_distinct_road_cells};

use crate::blackboard::{Markers, RunStatus};
use crate::config::SimConfig;
use crate::error::SessionError;

/// One courier simulation: the loaded map, the start/pickup/goal triplet,
/// the agent pose and the active motion run.
///
/// The session is a plain value owned by its caller (the sim thread here,
/// plain test functions elsewhere); all mutation goes through its methods,
/// and several independent sessions can coexist. In-flight route planning is
/// tied to the session by an epoch: every operation that invalidates a
/// pending plan bumps the epoch, and responses stamped with an older epoch
/// are discarded on arrival.
pub struct Session {
    cell_size: f32,
    classifier: RoadClassifier,
    sample_attempts: usize,
    grid: Option<RoadGrid>,
    points: Option<[GridPoint; 3]>,
    agent: Pose,
    controller: MotionController,
    route: Vec<WorldPoint>,
    route_epoch: u64,
    planning: bool,
}

impl Session {
    /// Builds a session from the validated configuration.
    pub fn new(cfg: &SimConfig) -> Result<Self, SessionError> {
        let band = RoadBand::new(cfg.map.road_min, cfg.map.road_max)?;
        let motion = MotionConfig::new(
            cfg.motion.speed,
            cfg.motion.rotation_speed,
            cfg.motion.snap_radius,
            cfg.motion.stall_gap,
        )?;
        Ok(Session {
            cell_size: cfg.map.cell_size,
            classifier: RoadClassifier::new(band, cfg.map.granularity),
            sample_attempts: cfg.spawn.sample_attempts,
            grid: None,
            points: None,
            agent: Pose::default(),
            controller: MotionController::new(motion),
            route: Vec::new(),
            route_epoch: 0,
            planning: false,
        })
    }

    /// Installs a raster as the session map.
    ///
    /// Markers, route and any active or pending run are discarded; the old
    /// raster stays alive only for planner requests that already hold it,
    /// whose results will be discarded as stale.
    pub fn load_map(&mut self, map: Arc<RasterMap>) -> Result<(), SessionError> {
        let grid = RoadGrid::new(map, self.classifier, self.cell_size)?;
        info!(cols = grid.frame().cols(), rows = grid.frame().rows(), "Map loaded");
        self.grid = Some(grid);
        self.points = None;
        self.cancel_run();
        Ok(())
    }

    /// Paints and installs a random road/obstacle map.
    pub fn generate_map(
        &mut self,
        cols: usize,
        rows: usize,
        obstacle_ratio: f64,
    ) -> Result<(), SessionError> {
        let mut rng = rand::rng();
        let raster =
            mapgen::random_map(&mut rng, cols, rows, self.cell_size as usize, obstacle_ratio)?;
        self.load_map(Arc::new(raster))
    }

    /// Places start, pickup and goal on three distinct random road cells and
    /// teleports the agent to the start.
    pub fn randomize_points(&mut self) -> Result<(), SessionError> {
        let grid = self.grid.as_ref().ok_or(SessionError::MapNotLoaded)?;
        let mut rng = rand::rng();
        let cells = sample_distinct_road_cells::<3, _, _>(grid, &mut rng, self.sample_attempts)
            .ok_or(SessionError::NoRoadPosition)?;
        let Some(start) = grid.frame().grid_to_world(cells[0]) else {
            return Err(SessionError::NoRoadPosition);
        };
        debug!(start = ?cells[0], pickup = ?cells[1], goal = ?cells[2], "Points randomized");
        self.points = Some(cells);
        self.agent = Pose::new(start.x as f64, start.y as f64, 0.0);
        self.cancel_run();
        Ok(())
    }

    /// Builds an epoch-stamped planning request for the current triplet.
    ///
    /// The request owns its map view, so a later `load_map` cannot race the
    /// planner; bumping the epoch here also supersedes any earlier request
    /// still in flight.
    pub fn route_request(&mut self) -> Result<RouteRequest, SessionError> {
        let grid = self.grid.as_ref().ok_or(SessionError::MapNotLoaded)?.clone();
        let [start, pickup, goal] = self.points.ok_or(SessionError::PointsNotSet)?;
        self.route_epoch += 1;
        self.planning = true;
        Ok(RouteRequest { epoch: self.route_epoch, grid, start, pickup, goal })
    }

    /// Accepts a planner response, starting the motion run on success.
    ///
    /// Responses from superseded requests are ignored. A current-epoch
    /// response without waypoints is the user-visible "no route found"; no
    /// partial run is started.
    pub fn install_route(&mut self, response: &RouteResponse) -> Result<(), SessionError> {
        if response.epoch != self.route_epoch {
            debug!(
                epoch = response.epoch,
                current = self.route_epoch,
                "Discarding stale route response"
            );
            return Ok(());
        }
        self.planning = false;
        let Some(waypoints) = &response.waypoints else {
            self.cancel_run();
            return Err(SessionError::NoRoute);
        };
        self.route = waypoints.clone();
        self.controller.start(
            waypoints.iter().map(|w| Waypoint::new(w.x as f64, w.y as f64)).collect(),
        );
        info!(waypoints = self.route.len(), "Route installed, run started");
        Ok(())
    }

    /// Plans and starts the route synchronously.
    ///
    /// Same computation the planner task performs, without the message hop;
    /// used by tests and headless callers.
    pub fn plan_blocking(&mut self) -> Result<(), SessionError> {
        let request = self.route_request()?;
        let waypoints =
            plan_waypoints(&request.grid, request.start, request.pickup, request.goal);
        let response = RouteResponse { epoch: request.epoch, waypoints };
        self.install_route(&response)
    }

    /// Cancels the active run and supersedes any pending plan.
    pub fn stop(&mut self) {
        self.cancel_run();
    }

    /// Delivers one timestamped tick (ms) to the motion controller.
    pub fn tick(&mut self, timestamp_ms: f64) {
        self.agent = self.controller.tick(self.agent, timestamp_ms);
    }

    fn cancel_run(&mut self) {
        self.controller.stop();
        self.route.clear();
        self.route_epoch += 1;
        self.planning = false;
    }

    /// The current agent pose.
    pub fn pose(&self) -> Pose {
        self.agent
    }

    /// The planned route waypoints of the active run, if any.
    pub fn route(&self) -> &[WorldPoint] {
        &self.route
    }

    /// The loaded raster, if any.
    pub fn map(&self) -> Option<&Arc<RasterMap>> {
        self.grid.as_ref().map(|g| g.map())
    }

    /// The start/pickup/goal markers as raster-space points.
    pub fn markers(&self) -> Option<Markers> {
        let grid = self.grid.as_ref()?;
        let [start, pickup, goal] = self.points?;
        Some(Markers {
            start: grid.frame().grid_to_world(start)?,
            pickup: grid.frame().grid_to_world(pickup)?,
            goal: grid.frame().grid_to_world(goal)?,
        })
    }

    /// Coarse status for the HUD.
    pub fn status(&self) -> RunStatus {
        if self.planning {
            return RunStatus::Planning;
        }
        match self.controller.state() {
            RunState::Idle => RunStatus::Idle,
            RunState::Following { index } => {
                RunStatus::Following { next: index, total: self.route.len() }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_map::Rgba;

    const ROAD: Rgba = Rgba::new(120, 120, 120, 255);
    const GRASS: Rgba = Rgba::new(40, 180, 60, 255);

    fn session() -> Session {
        Session::new(&SimConfig::default()).unwrap()
    }

    fn road_raster(width: usize, height: usize) -> Arc<RasterMap> {
        Arc::new(RasterMap::filled(width, height, ROAD).unwrap())
    }

    #[test]
    fn test_inverted_band_rejected() {
        let mut cfg = SimConfig::default();
        cfg.map.road_min = 200;
        cfg.map.road_max = 100;
        assert!(matches!(Session::new(&cfg), Err(SessionError::Map(_))));
    }

    #[test]
    fn test_negative_speed_rejected() {
        let mut cfg = SimConfig::default();
        cfg.motion.speed = -1.0;
        assert!(matches!(Session::new(&cfg), Err(SessionError::Motion(_))));
    }

    #[test]
    fn test_operations_require_a_map() {
        let mut s = session();
        assert_eq!(s.randomize_points(), Err(SessionError::MapNotLoaded));
        assert!(matches!(s.route_request(), Err(SessionError::MapNotLoaded)));
    }

    #[test]
    fn test_route_requires_points() {
        let mut s = session();
        s.load_map(road_raster(200, 200)).unwrap();
        assert!(matches!(s.route_request(), Err(SessionError::PointsNotSet)));
    }

    #[test]
    fn test_randomize_fails_without_road() {
        let mut s = session();
        s.load_map(Arc::new(RasterMap::filled(200, 200, GRASS).unwrap())).unwrap();
        assert_eq!(s.randomize_points(), Err(SessionError::NoRoadPosition));
    }

    #[test]
    fn test_randomize_places_markers_and_agent() {
        let mut s = session();
        s.load_map(road_raster(200, 200)).unwrap();
        s.randomize_points().unwrap();
        let markers = s.markers().unwrap();
        assert!(markers.start != markers.pickup && markers.pickup != markers.goal);
        let pose = s.pose();
        assert_eq!(pose.x as f32, markers.start.x);
        assert_eq!(pose.y as f32, markers.start.y);
    }

    #[test]
    fn test_no_route_between_islands() {
        // Two road islands separated by a full-height grass wall.
        let mut raster = RasterMap::filled(200, 100, ROAD).unwrap();
        raster.fill_rect(80, 0, 40, 100, GRASS);
        let mut s = session();
        s.load_map(Arc::new(raster)).unwrap();
        // Deterministic triplet spanning the wall.
        s.points = Some([GridPoint::new(0, 0), GridPoint::new(1, 1), GridPoint::new(9, 1)]);
        assert_eq!(s.plan_blocking(), Err(SessionError::NoRoute));
        assert_eq!(s.status(), RunStatus::Idle);
        assert!(s.route().is_empty());
    }

    #[test]
    fn test_run_reaches_the_goal() {
        let mut s = session();
        s.load_map(road_raster(200, 200)).unwrap();
        s.points = Some([GridPoint::new(0, 0), GridPoint::new(5, 0), GridPoint::new(5, 5)]);
        s.agent = Pose::new(10.0, 10.0, 0.0);
        s.plan_blocking().unwrap();
        assert!(matches!(s.status(), RunStatus::Following { .. }));

        let goal = s.route().last().copied().unwrap();
        let mut ts = 0.0;
        for _ in 0..10_000 {
            ts += 50.0;
            s.tick(ts);
            if s.status() == RunStatus::Idle {
                break;
            }
        }
        assert_eq!(s.status(), RunStatus::Idle);
        let pose = s.pose();
        assert!((pose.x - goal.x as f64).abs() < 1e-6);
        assert!((pose.y - goal.y as f64).abs() < 1e-6);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut s = session();
        s.load_map(road_raster(200, 200)).unwrap();
        s.points = Some([GridPoint::new(0, 0), GridPoint::new(3, 0), GridPoint::new(6, 0)]);
        let request = s.route_request().unwrap();
        let waypoints =
            plan_waypoints(&request.grid, request.start, request.pickup, request.goal);
        // The stop supersedes the request before its response lands.
        s.stop();
        let response = RouteResponse { epoch: request.epoch, waypoints };
        assert_eq!(s.install_route(&response), Ok(()));
        assert_eq!(s.status(), RunStatus::Idle);
        assert!(s.route().is_empty());
    }

    #[test]
    fn test_new_request_supersedes_previous() {
        let mut s = session();
        s.load_map(road_raster(200, 200)).unwrap();
        s.points = Some([GridPoint::new(0, 0), GridPoint::new(3, 0), GridPoint::new(6, 0)]);
        let first = s.route_request().unwrap();
        let second = s.route_request().unwrap();
        assert!(second.epoch > first.epoch);

        let stale = RouteResponse {
            epoch: first.epoch,
            waypoints: plan_waypoints(&first.grid, first.start, first.pickup, first.goal),
        };
        s.install_route(&stale).unwrap();
        assert_eq!(s.status(), RunStatus::Planning); // still waiting on the live request

        let live = RouteResponse {
            epoch: second.epoch,
            waypoints: plan_waypoints(&second.grid, second.start, second.pickup, second.goal),
        };
        s.install_route(&live).unwrap();
        assert!(matches!(s.status(), RunStatus::Following { .. }));
    }

    #[test]
    fn test_generate_map_is_loadable() {
        let mut s = session();
        s.generate_map(12, 10, 0.2).unwrap();
        let map = s.map().unwrap();
        assert_eq!(map.width(), 12 * 20);
        assert_eq!(map.height(), 10 * 20);
    }
}
