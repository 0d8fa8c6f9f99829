//! # Derived Analysis
//!
//! Stages that only read earlier series:
//!
//! - `passes` - passes and interceptions from the possession series
//! - `speed_distance` - distance and speed from tactical positions

pub mod passes;
pub mod speed_distance;

pub use passes::{team_event_counts, PassInferencer, TeamEventCounts};
pub use speed_distance::{
    average_speed, total_distance, MotionSample, MotionSeries, SpeedDistanceCalculator,
};
