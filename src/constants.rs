pub const MAP_WIDTH: u8 = 48;
pub const MAP_HEIGHT: u8 = 48;

/// Maximum number of primitives the host accepts in a single unit queue.
pub const MAX_QUEUE_LENGTH: usize = 20;

/// Bases occupy the 3x3 block centered on their position.
pub const BASE_FOOTPRINT_RADIUS: u8 = 1;

pub const CYCLE_LENGTH: u32 = 50;
pub const DAY_LENGTH: u32 = 30;

/// Returns true when `time` falls in the low-light part of the day cycle.
pub fn is_night(time: u32) -> bool {
    time % CYCLE_LENGTH >= DAY_LENGTH
}
