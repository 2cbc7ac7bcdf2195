//! Async route planning task.
//!
//! Search runs to completion synchronously inside one request, so it lives
//! on its own task instead of the simulation tick thread: the tick loop
//! stays responsive while a large grid is searched, and results come back
//! as messages that the session installs atomically.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use courier_map::{GridPoint, RoadGrid, WorldPoint};

use crate::route::plan_waypoints;

/// A route planning request.
///
/// Carries its own clone of the road grid (which shares the raster behind an
/// `Arc`), so planning never races a map reload on the session side. The
/// epoch is echoed back in the response; the session discards responses
/// whose epoch it has since moved past.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    /// Session route epoch at request time.
    pub epoch: u64,
    /// The map view to plan on.
    pub grid: RoadGrid,
    /// Start cell (validated road cell).
    pub start: GridPoint,
    /// Pickup cell (validated road cell).
    pub pickup: GridPoint,
    /// Goal cell (validated road cell).
    pub goal: GridPoint,
}

/// The planner's answer to a [`RouteRequest`].
#[derive(Debug, Clone)]
pub struct RouteResponse {
    /// Epoch copied from the request.
    pub epoch: u64,
    /// Cell-center waypoints, or `None` when no route exists.
    pub waypoints: Option<Vec<WorldPoint>>,
}

/// Route planner task: consumes requests, publishes responses.
///
/// # Arguments
/// * `request_rx` - A Tokio broadcast receiver for `Arc<RouteRequest>` messages.
/// * `response_tx` - A Tokio broadcast sender to publish `Arc<RouteResponse>` results.
pub async fn run_planner_task(
    mut request_rx: broadcast::Receiver<Arc<RouteRequest>>,
    response_tx: broadcast::Sender<Arc<RouteResponse>>,
) -> anyhow::Result<()> {
    info!("Route planner task started.");
    loop {
        match request_rx.recv().await {
            Ok(request) => {
                debug!(
                    epoch = request.epoch,
                    start = ?request.start,
                    pickup = ?request.pickup,
                    goal = ?request.goal,
                    "Planning route"
                );
                let waypoints =
                    plan_waypoints(&request.grid, request.start, request.pickup, request.goal);
                match &waypoints {
                    Some(w) => info!(epoch = request.epoch, waypoints = w.len(), "Route planned"),
                    None => warn!(epoch = request.epoch, "No route found"),
                }
                let response = RouteResponse { epoch: request.epoch, waypoints };
                if response_tx.receiver_count() > 0 {
                    if let Err(e) = response_tx.send(Arc::new(response)) {
                        warn!("Failed to publish route response: {}", e);
                    }
                }
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!("Route request receiver lagged by {} messages in planner task.", n);
                continue;
            }
            Err(broadcast::error::RecvError::Closed) => {
                return Err(anyhow::anyhow!("Route request channel closed for planner task"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_map::{Granularity, RasterMap, Rgba, RoadBand, RoadClassifier};
    use std::time::Duration;

    fn open_grid() -> RoadGrid {
        let raster = RasterMap::filled(80, 80, Rgba::new(120, 120, 120, 255)).unwrap();
        RoadGrid::new(
            Arc::new(raster),
            RoadClassifier::new(RoadBand::asphalt(), Granularity::Point),
            10.0,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_planner_round_trip() {
        let (req_tx, req_rx) = broadcast::channel(4);
        let (resp_tx, mut resp_rx) = broadcast::channel(4);
        tokio::spawn(run_planner_task(req_rx, resp_tx));

        let request = RouteRequest {
            epoch: 3,
            grid: open_grid(),
            start: GridPoint::new(0, 0),
            pickup: GridPoint::new(4, 0),
            goal: GridPoint::new(4, 6),
        };
        req_tx.send(Arc::new(request)).unwrap();

        let response = tokio::time::timeout(Duration::from_secs(5), resp_rx.recv())
            .await
            .expect("planner timed out")
            .unwrap();
        assert_eq!(response.epoch, 3);
        let waypoints = response.waypoints.as_ref().expect("route should exist");
        assert_eq!(waypoints.first(), Some(&WorldPoint::new(5.0, 5.0)));
        assert_eq!(waypoints.last(), Some(&WorldPoint::new(45.0, 65.0)));
    }

    #[tokio::test]
    async fn test_planner_reports_unreachable_routes() {
        // Left and right road islands split by a grass wall.
        let mut raster = RasterMap::filled(80, 40, Rgba::new(120, 120, 120, 255)).unwrap();
        raster.fill_rect(40, 0, 10, 40, Rgba::new(40, 180, 60, 255));
        let grid = RoadGrid::new(
            Arc::new(raster),
            RoadClassifier::new(RoadBand::asphalt(), Granularity::Point),
            10.0,
        )
        .unwrap();

        let (req_tx, req_rx) = broadcast::channel(4);
        let (resp_tx, mut resp_rx) = broadcast::channel(4);
        tokio::spawn(run_planner_task(req_rx, resp_tx));

        req_tx
            .send(Arc::new(RouteRequest {
                epoch: 9,
                grid,
                start: GridPoint::new(0, 0),
                pickup: GridPoint::new(1, 1),
                goal: GridPoint::new(7, 0),
            }))
            .unwrap();

        let response = tokio::time::timeout(Duration::from_secs(5), resp_rx.recv())
            .await
            .expect("planner timed out")
            .unwrap();
        assert_eq!(response.epoch, 9);
        assert!(response.waypoints.is_none());
    }
}
