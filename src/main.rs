mod blackboard;   // brings `blackboard.rs` in as `crate::blackboard`
mod bus;          // brings `bus.rs` in as `crate::bus`
mod config;       // brings `config.rs` in as `crate::config`
mod error;        // brings `error.rs` in as `crate::error`
mod graphics;     // brings `graphics.rs` in as `crate::graphics`
mod session;      // brings `session.rs` in as `crate::session`
mod sim;          // brings `sim.rs` in as `crate::sim`

use std::sync::Arc;
use std::time::{Duration, Instant};

use macroquad::texture::load_image;
use tracing::{error, info, warn};
use tracing_subscriber::{self, EnvFilter};

use courier_map::RasterMap;
use courier_nav::planner::{RouteRequest, RouteResponse, run_planner_task};

use crate::blackboard::{Blackboard, raise_fault, snapshot};
use crate::bus::Topic;
use crate::graphics::window_conf;
use crate::session::Session;
use crate::sim::Command;

#[macroquad::main(window_conf)]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    info!("Courier simulation started. Setting up Tokio runtime and spawning tasks...");

    let cfg = match config::load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}. Falling back to defaults.", e);
            config::SimConfig::default()
        }
    };

    let session = match Session::new(&cfg) {
        Ok(session) => session,
        Err(e) => {
            error!("Invalid simulation configuration: {}", e);
            return;
        }
    };

    let tokio_rt = tokio::runtime::Runtime::new().unwrap();

    let commands: Topic<Command> = Topic::new(16);
    let requests: Topic<RouteRequest> = Topic::new(4);
    let responses: Topic<RouteResponse> = Topic::new(4);
    let bb: Blackboard = Arc::default();

    if let Err(e) = run(&tokio_rt, session, &cfg, &bb, &commands, &requests, &responses) {
        error!("Failed to start simulation tasks: {:?}", e);
        return;
    }

    // Seed the session with an initial map (decoded image, or a random one)
    // and a first triplet; everything after that is key-driven.
    match &cfg.map.path {
        Some(path) => match decode_map(path).await {
            Ok(map) => commands.publish(Command::LoadMap(Arc::new(map))),
            Err(e) => {
                warn!("Failed to load map image {}: {}. Painting a random map.", path, e);
                commands.publish(Command::GenerateMap);
            }
        },
        None => commands.publish(Command::GenerateMap),
    }
    commands.publish(Command::Randomize);

    graphics::run_visualization_loop(bb, commands).await;
}

fn run(
    tokio_rt: &tokio::runtime::Runtime,
    session: Session,
    cfg: &config::SimConfig,
    bb: &Blackboard,
    commands: &Topic<Command>,
    requests: &Topic<RouteRequest>,
    responses: &Topic<RouteResponse>,
) -> anyhow::Result<()> {
    info!("Spawning planner task...");
    let request_rx = requests.subscribe();
    let response_tx = responses.sender();
    tokio_rt.spawn(async move {
        match run_planner_task(request_rx, response_tx).await {
            Ok(_) => info!("Planner task finished."),
            Err(e) => error!("Planner task failed: {:?}", e),
        }
    });

    info!("Spawning watchdog task...");
    tokio_rt.spawn(watchdog(bb.clone()));

    info!("Spawning simulation thread...");
    std::thread::Builder::new()
        .name("sim".into())
        .spawn({
            let cfg = cfg.clone();
            let bb = bb.clone();
            let command_rx = commands.subscribe();
            let request_tx = requests.sender();
            let response_rx = responses.subscribe();
            move || sim::run_sim_loop(session, cfg, bb, command_rx, request_tx, response_rx)
        })?;

    Ok(())
}

async fn decode_map(path: &str) -> anyhow::Result<RasterMap> {
    let image = load_image(path)
        .await
        .map_err(|e| anyhow::anyhow!("image decode failed: {}", e))?;
    let map = RasterMap::from_rgba8(image.width as usize, image.height as usize, image.bytes)?;
    info!(width = map.width(), height = map.height(), "Map image decoded");
    Ok(map)
}

async fn watchdog(bb: Blackboard) -> anyhow::Result<()> {
    info!("Watchdog task started.");
    let mut tick = tokio::time::interval(Duration::from_millis(250));
    loop {
        tick.tick().await;
        let last_tick_ts = snapshot(&bb).last_tick_ts;
        let age = Instant::now() - last_tick_ts;
        if age > Duration::from_millis(500) {
            warn!(?age, last_tick_ts = ?last_tick_ts, "Simulation tick stalled.");
            raise_fault(&bb, "sim tick stalled");
        }
    }
}
