//! This module defines the error types used by the `courier-motion` crate.

#![warn(missing_docs)]

/// Error type for motion configuration.
///
/// This enum encapsulates all possible errors that can occur when
/// constructing a motion configuration with invalid parameters.
#[derive(Debug, PartialEq)]
pub enum MotionError {
    /// Error for an invalid linear speed.
    /// This variant is returned when the speed is negative or not finite.
    InvalidSpeed(&'static str),
    /// Error for an invalid rotation blend rate.
    /// This variant is returned when the rotation speed is negative or not finite.
    InvalidRotationSpeed(&'static str),
    /// Error for an invalid snap radius.
    /// This variant is returned when the snap radius is negative or not finite.
    InvalidSnapRadius(&'static str),
    /// Error for an invalid stall gap.
    /// This variant is returned when the stall gap is not finite and positive.
    InvalidStallGap(&'static str),
}

impl core::fmt::Display for MotionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MotionError::InvalidSpeed(msg) => write!(f, "Invalid speed: {}", msg),
            MotionError::InvalidRotationSpeed(msg) => {
                write!(f, "Invalid rotation speed: {}", msg)
            }
            MotionError::InvalidSnapRadius(msg) => write!(f, "Invalid snap radius: {}", msg),
            MotionError::InvalidStallGap(msg) => write!(f, "Invalid stall gap: {}", msg),
        }
    }
}

impl core::error::Error for MotionError {}
