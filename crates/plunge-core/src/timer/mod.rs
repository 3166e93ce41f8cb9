mod adjust;
mod engine;

pub use adjust::{
    exceeds_haptic_threshold, seconds_from_raw, Direction, RotaryRange,
    DEFAULT_HAPTIC_THRESHOLD_SECS,
};
pub use engine::{CountdownEngine, TimerState};
