use crate::location::Location;
use thiserror::Error;

/// Failures a planning step can report. None of these abort a turn: callers
/// fall back to another behavior or hold the unit in place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("no route from {from:?} to {to:?}")]
    Unreachable { from: Location, to: Location },
    #[error("route affords {gathers} gather actions")]
    Unaffordable { gathers: u32 },
    #[error("invalid direction code {0}")]
    InvalidDirection(u8),
    #[error("{from:?} and {to:?} are not adjacent")]
    NonAdjacent { from: Location, to: Location },
}
