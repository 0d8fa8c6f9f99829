//! # bb_core - Basketball Frame Analytics
//!
//! Turns per-frame detections from a basketball clip (player, ball and hoop
//! boxes plus court keypoints) into game analytics.
//!
//! ## Features
//! - Possession per frame with hysteresis
//! - Passes and interceptions from possession changes
//! - Top-down tactical positions through per-frame homographies
//! - Distance and speed per player
//! - Shot detection, make/miss classification and box score
//!
//! ## Usage
//! ```rust
//! use bb_core::{AnalyticsConfig, GameAnalyzer, GameInput};
//!
//! let input = GameInput { num_frames: 10, ..Default::default() };
//! let analysis = GameAnalyzer::new(AnalyticsConfig::default()).analyze(&input).unwrap();
//! assert_eq!(analysis.possession.len(), 10);
//! ```

// Doc formatting lints - purely cosmetic, fix incrementally
#![allow(clippy::doc_lazy_continuation)]
// Struct initialization pattern used intentionally
#![allow(clippy::field_reassign_with_default)]

pub mod analysis;
pub mod api;
pub mod config;
pub mod error;
pub mod geometry;
pub mod models;
pub mod pipeline;
pub mod possession;
pub mod shot;
pub mod summary;
pub mod tactical;

pub use api::{analyze_json, input_schema, summarize_json};
pub use config::AnalyticsConfig;
pub use error::{AnalyticsError, FrameError, Result};
pub use geometry::{BoundingBox, Homography, Point2};
pub use models::{GameInput, PlayerId, PossessionChange, ShotEvent, ShotOutcome, TeamId};
pub use pipeline::{Diagnostics, GameAnalysis, GameAnalyzer};
pub use summary::GameSummary;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;
