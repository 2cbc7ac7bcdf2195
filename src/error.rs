use courier_map::MapError;
use courier_motion::MotionError;
use thiserror::Error;

/// User-visible session failures.
///
/// All of these are terminal for the requested operation; nothing is retried
/// and the caller must issue a fresh request.
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("no map loaded")]
    MapNotLoaded,
    #[error("start, pickup and goal are not set")]
    PointsNotSet,
    #[error("no valid road position found")]
    NoRoadPosition,
    #[error("no route found")]
    NoRoute,
    #[error("invalid map configuration: {0}")]
    Map(#[from] MapError),
    #[error("invalid motion configuration: {0}")]
    Motion(#[from] MotionError),
}
