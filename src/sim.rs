use std::sync::Arc;
use std::time::{Duration, Instant};

use spin_sleep::SpinSleeper;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

use courier_map::RasterMap;
use courier_nav::planner::{RouteRequest, RouteResponse};

use crate::blackboard::{self, Blackboard};
use crate::config::SimConfig;
use crate::session::Session;

/// Commands the UI publishes to the simulation thread.
#[derive(Debug)]
pub enum Command {
    /// Install a decoded raster as the session map.
    LoadMap(Arc<RasterMap>),
    /// Paint and install a random map.
    GenerateMap,
    /// Place start/pickup/goal on random road cells.
    Randomize,
    /// Plan the route for the current triplet and start driving it.
    Start,
    /// Cancel the active run.
    Stop,
}

const TICK_PERIOD: Duration = Duration::from_micros(16_667); // ~60 Hz

/// Body of the dedicated simulation thread.
///
/// The session lives entirely on this thread: each loop iteration drains
/// pending commands and planner responses, delivers one timestamped tick and
/// publishes a state snapshot to the blackboard for the renderer.
pub fn run_sim_loop(
    mut session: Session,
    cfg: SimConfig,
    bb: Blackboard,
    mut command_rx: broadcast::Receiver<Arc<Command>>,
    request_tx: broadcast::Sender<Arc<RouteRequest>>,
    mut response_rx: broadcast::Receiver<Arc<RouteResponse>>,
) {
    info!("Simulation thread started.");
    let sleeper = SpinSleeper::new(100_000);
    let started = Instant::now();

    loop {
        loop {
            match command_rx.try_recv() {
                Ok(cmd) => handle_command(&mut session, &cfg, &bb, &request_tx, &cmd),
                Err(broadcast::error::TryRecvError::Empty) => break,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    warn!("Command receiver lagged by {} messages.", n);
                }
                Err(broadcast::error::TryRecvError::Closed) => {
                    error!("Command channel closed. Exiting simulation loop.");
                    return;
                }
            }
        }

        loop {
            match response_rx.try_recv() {
                Ok(response) => {
                    if let Err(e) = session.install_route(&response) {
                        warn!(%e, "Route request failed");
                        blackboard::raise_fault(&bb, &e.to_string());
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => break,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    warn!("Route response receiver lagged by {} messages.", n);
                }
                Err(broadcast::error::TryRecvError::Closed) => {
                    error!("Route response channel closed. Exiting simulation loop.");
                    return;
                }
            }
        }

        let now_ms = started.elapsed().as_secs_f64() * 1000.0;
        session.tick(now_ms);
        publish(&session, &bb);
        blackboard::touch_tick(&bb);

        sleeper.sleep(TICK_PERIOD);
    }
}

fn handle_command(
    session: &mut Session,
    cfg: &SimConfig,
    bb: &Blackboard,
    request_tx: &broadcast::Sender<Arc<RouteRequest>>,
    cmd: &Command,
) {
    let outcome = match cmd {
        Command::LoadMap(map) => session.load_map(Arc::clone(map)),
        Command::GenerateMap => {
            session.generate_map(cfg.map.gen_cols, cfg.map.gen_rows, cfg.map.obstacle_ratio)
        }
        Command::Randomize => session.randomize_points(),
        Command::Start => session.route_request().map(|request| {
            if request_tx.send(Arc::new(request)).is_err() {
                warn!("No planner task listening for route requests.");
            }
        }),
        Command::Stop => {
            session.stop();
            Ok(())
        }
    };
    if let Err(e) = outcome {
        warn!(%e, command = ?cmd, "Command failed");
        blackboard::raise_fault(bb, &e.to_string());
    }
}

fn publish(session: &Session, bb: &Blackboard) {
    let mut g = bb.write();
    g.pose = session.pose();
    g.markers = session.markers();
    g.waypoints = session.route().to_vec();
    g.status = session.status();
    match session.map() {
        Some(map) => {
            let replaced = g.map.as_ref().is_none_or(|m| !Arc::ptr_eq(m, map));
            if replaced {
                g.map = Some(Arc::clone(map));
                g.map_epoch += 1;
            }
        }
        None => {
            if g.map.take().is_some() {
                g.map_epoch += 1;
            }
        }
    }
}
