use parking_lot::RwLock;
use std::{sync::Arc, time::Instant};

use courier_map::{RasterMap, WorldPoint};
use courier_motion::Pose;

/// The start/pickup/goal triplet in raster coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Markers {
    pub start: WorldPoint,
    pub pickup: WorldPoint,
    pub goal: WorldPoint,
}

/// Coarse run status for the HUD.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    Idle,
    Planning,
    Following { next: usize, total: usize },
}

#[derive(Clone)]
pub struct State {
    pub map: Option<Arc<RasterMap>>,
    /// Bumped whenever `map` is replaced, so the renderer knows to rebuild
    /// its texture.
    pub map_epoch: u64,
    pub pose: Pose,
    pub markers: Option<Markers>,
    pub waypoints: Vec<WorldPoint>,
    pub status: RunStatus,
    pub last_tick_ts: Instant,
    pub faults: Vec<String>,
}

impl Default for State {
    fn default() -> Self {
        State {
            map: None,
            map_epoch: 0,
            pose: Pose::default(),
            markers: None,
            waypoints: Vec::new(),
            status: RunStatus::Idle,
            last_tick_ts: Instant::now(),
            faults: Vec::new(),
        }
    }
}

pub type Blackboard = Arc<RwLock<State>>;

pub fn snapshot(bb: &Blackboard) -> State {
    (*bb.read()).clone()
}

pub fn touch_tick(bb: &Blackboard) {
    bb.write().last_tick_ts = Instant::now();
}

pub fn raise_fault(bb: &Blackboard, msg: &str) {
    let mut g = bb.write();
    if !g.faults.iter().any(|s| s == msg) {
        g.faults.push(msg.to_string());
    }
}
