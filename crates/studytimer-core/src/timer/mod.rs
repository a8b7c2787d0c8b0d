mod engine;

pub use engine::{TimerEngine, TimerSnapshot, TimerStatus, TICK_INTERVAL};
