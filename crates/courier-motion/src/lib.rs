#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

//! A `no_std` library for time-stepped 2D waypoint-following motion.
//!
//! This crate provides an agent pose, angle normalization helpers, and a
//! tick-driven motion controller that advances a pose toward a waypoint
//! sequence with bounded linear and angular velocity.

extern crate alloc;

use core::f64::consts::PI;
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod controller;
pub mod error;

pub use controller::{MotionController, RunState};
pub use error::MotionError;

/// A 2‑D agent pose `(x, y, θ)` in pixel units and radians (θ measured from
/// the +x axis, with +y pointing down in raster space).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    /// Raster-space x position (px).
    pub x: f64,
    /// Raster-space y position (px).
    pub y: f64,
    /// Heading (rad), normalized to `(-PI, PI]`.
    pub theta: f64,
}

impl Pose {
    /// Construct a new pose.
    ///
    /// # Arguments
    ///
    /// * `x`: Raster-space x position in pixels.
    /// * `y`: Raster-space y position in pixels.
    /// * `theta`: Heading in radians.
    pub const fn new(x: f64, y: f64, theta: f64) -> Self {
        Pose { x, y, theta }
    }

    /// Normalize an angle to be within `(-PI, PI]`.
    ///
    /// Angles at `-PI` will be normalized to `PI`, so the result always
    /// describes the shortest turn.
    ///
    /// # Arguments
    ///
    /// * `angle`: The angle in radians to normalize.
    ///
    /// # Returns
    ///
    /// The normalized angle in radians.
    pub fn normalize_angle(angle: f64) -> f64 {
        let a = angle % (2.0 * PI);
        if a > PI {
            a - 2.0 * PI
        } else if a <= -PI {
            a + 2.0 * PI
        } else {
            a
        }
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(x: {:.2}, y: {:.2}, θ: {:.2} rad)", self.x, self.y, self.theta)
    }
}

/// A continuous-coordinate target consumed by the motion controller.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Waypoint {
    /// Raster-space x position (px).
    pub x: f64,
    /// Raster-space y position (px).
    pub y: f64,
}

impl Waypoint {
    /// Construct a new waypoint.
    ///
    /// # Arguments
    ///
    /// * `x`: Raster-space x position in pixels.
    /// * `y`: Raster-space y position in pixels.
    pub const fn new(x: f64, y: f64) -> Self {
        Waypoint { x, y }
    }
}

impl fmt::Display for Waypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(x: {:.2}, y: {:.2})", self.x, self.y)
    }
}

/// Fixed motion parameters for a controller.
///
/// Speeds are expressed per millisecond of tick time: `speed` in pixels/ms
/// and `rotation_speed` as the fraction of the remaining angle error closed
/// per ms (saturating at 1).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionConfig {
    /// Linear speed (px/ms).
    pub speed: f64,
    /// Rotation blend rate (1/ms).
    pub rotation_speed: f64,
    /// Distance below which the agent snaps onto the target (px).
    pub snap_radius: f64,
    /// Tick gaps longer than this are skipped entirely (ms).
    pub stall_gap: f64,
}

impl MotionConfig {
    /// Construct a new motion configuration.
    ///
    /// # Arguments
    ///
    /// * `speed`: Linear speed in pixels per millisecond.
    /// * `rotation_speed`: Rotation blend rate per millisecond.
    /// * `snap_radius`: Snap distance in pixels.
    /// * `stall_gap`: Maximum accepted tick gap in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns `Err(MotionError::InvalidSpeed)` if `speed` is negative or not finite.
    /// Returns `Err(MotionError::InvalidRotationSpeed)` if `rotation_speed` is negative or not finite.
    /// Returns `Err(MotionError::InvalidSnapRadius)` if `snap_radius` is negative or not finite.
    /// Returns `Err(MotionError::InvalidStallGap)` if `stall_gap` is not finite and positive.
    pub const fn new(
        speed: f64,
        rotation_speed: f64,
        snap_radius: f64,
        stall_gap: f64,
    ) -> Result<Self, MotionError> {
        if !(speed.is_finite() && speed >= 0.0) {
            return Err(MotionError::InvalidSpeed("must be finite and non-negative"));
        }
        if !(rotation_speed.is_finite() && rotation_speed >= 0.0) {
            return Err(MotionError::InvalidRotationSpeed(
                "must be finite and non-negative",
            ));
        }
        if !(snap_radius.is_finite() && snap_radius >= 0.0) {
            return Err(MotionError::InvalidSnapRadius(
                "must be finite and non-negative",
            ));
        }
        if !(stall_gap.is_finite() && stall_gap > 0.0) {
            return Err(MotionError::InvalidStallGap("must be finite and positive"));
        }
        Ok(MotionConfig {
            speed,
            rotation_speed,
            snap_radius,
            stall_gap,
        })
    }
}

impl fmt::Display for MotionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MotionConfig (v: {:.3} px/ms, ω: {:.3} /ms, snap: {:.1} px, stall: {:.0} ms)",
            self.speed, self.rotation_speed, self.snap_radius, self.stall_gap
        )
    }
}
