//! Tick-driven waypoint-following motion controller.

#![warn(missing_docs)]

use alloc::vec::Vec;

use libm::{atan2, cos, hypot, sin};

use crate::{MotionConfig, Pose, Waypoint};

/// The controller's run state.
///
/// A run progresses `Idle → Following(0) → Following(1) → … → Idle` and is
/// terminal once the last waypoint has been consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// No active run; ticks have no effect.
    Idle,
    /// Actively driving toward the waypoint at `index`.
    Following {
        /// Index of the current target in the captured waypoint list.
        index: usize,
    },
}

/// Drives an agent pose along a waypoint sequence across repeated
/// time-stamped ticks.
///
/// The controller owns the waypoint list of the active run. Starting a new
/// run replaces the previous run wholesale: the old list is dropped and the
/// timestamp baseline cleared, so a superseded run can have no further
/// effect on the pose.
#[derive(Debug, Clone)]
pub struct MotionController {
    config: MotionConfig,
    waypoints: Vec<Waypoint>,
    state: RunState,
    last_timestamp: Option<f64>,
}

impl MotionController {
    /// Construct an idle controller with the given configuration.
    pub const fn new(config: MotionConfig) -> Self {
        MotionController {
            config,
            waypoints: Vec::new(),
            state: RunState::Idle,
            last_timestamp: None,
        }
    }

    /// Returns the controller's configuration.
    pub fn config(&self) -> MotionConfig {
        self.config
    }

    /// Returns the current run state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Returns `true` when no run is active.
    pub fn is_idle(&self) -> bool {
        self.state == RunState::Idle
    }

    /// Returns the remaining waypoints of the active run, current target first.
    pub fn remaining(&self) -> &[Waypoint] {
        match self.state {
            RunState::Idle => &[],
            RunState::Following { index } => &self.waypoints[index..],
        }
    }

    /// Begin a new run over `waypoints`, cancelling any active run.
    ///
    /// An empty list leaves the controller idle. The first tick after a
    /// start only records the timestamp baseline and performs no movement.
    pub fn start(&mut self, waypoints: Vec<Waypoint>) {
        self.state = if waypoints.is_empty() {
            RunState::Idle
        } else {
            RunState::Following { index: 0 }
        };
        self.waypoints = waypoints;
        self.last_timestamp = None;
    }

    /// Cancel the active run, if any.
    pub fn stop(&mut self) {
        self.state = RunState::Idle;
        self.waypoints.clear();
        self.last_timestamp = None;
    }

    /// Advance the pose by one tick at `timestamp` (ms, monotonic).
    ///
    /// Returns the updated pose. Idle controllers return the pose unchanged.
    /// The first tick of a run records the baseline only; gaps larger than
    /// the configured stall gap refresh the baseline without moving (so a
    /// suspended process cannot produce a teleporting jump); timestamps that
    /// do not advance are ignored.
    pub fn tick(&mut self, pose: Pose, timestamp: f64) -> Pose {
        let RunState::Following { index } = self.state else {
            return pose;
        };
        let Some(last) = self.last_timestamp else {
            self.last_timestamp = Some(timestamp);
            return pose;
        };
        let dt = timestamp - last;
        if dt <= 0.0 {
            return pose;
        }
        self.last_timestamp = Some(timestamp);
        if dt > self.config.stall_gap {
            return pose;
        }

        let target = self.waypoints[index];
        let dx = target.x - pose.x;
        let dy = target.y - pose.y;
        let distance = hypot(dx, dy);

        if distance < self.config.snap_radius {
            self.advance(index);
            return Pose::new(target.x, target.y, pose.theta);
        }

        // Shortest-turn rotation toward the target bearing, then a
        // translation clamped so the agent cannot overshoot the target.
        let bearing = atan2(dy, dx);
        let diff = Pose::normalize_angle(bearing - pose.theta);
        let blend = f64::min(1.0, self.config.rotation_speed * dt);
        let theta = Pose::normalize_angle(pose.theta + diff * blend);

        let step = f64::min(self.config.speed * dt, distance);
        Pose::new(pose.x + cos(bearing) * step, pose.y + sin(bearing) * step, theta)
    }

    fn advance(&mut self, index: usize) {
        let next = index + 1;
        if next >= self.waypoints.len() {
            self.state = RunState::Idle;
            self.waypoints.clear();
            self.last_timestamp = None;
        } else {
            self.state = RunState::Following { index: next };
        }
    }
}
