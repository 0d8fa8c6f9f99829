//! # Analytics Configuration
//!
//! Every tunable used by the analytics stages lives here instead of being
//! scattered as magic numbers.
//!
//! ## Usage
//! ```rust
//! use bb_core::config::AnalyticsConfig;
//!
//! let config = AnalyticsConfig::default();
//! let strict = AnalyticsConfig::strict();
//! let from_env = AnalyticsConfig::from_env_or_default();
//! ```
//!
//! ## Environment Variables
//!
//! - `BB_ANALYTICS_PROFILE`: Select preset (strict, lenient, default)

mod court_config;
mod thresholds_config;

pub use court_config::{CourtConfig, MotionConfig};
pub use thresholds_config::{
    BallCleaningConfig, KeypointThresholds, PossessionThresholds, ShotThresholds,
};

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::error::{AnalyticsError, Result};

pub const PROFILE_ENV: &str = "BB_ANALYTICS_PROFILE";

/// Full analytics configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub court: CourtConfig,
    pub motion: MotionConfig,
    pub possession: PossessionThresholds,
    pub keypoints: KeypointThresholds,
    pub shot: ShotThresholds,
    pub ball_cleaning: BallCleaningConfig,
    /// Shard per-frame stages (keypoint validation, tactical mapping) with rayon
    pub parallel: bool,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            court: CourtConfig::default(),
            motion: MotionConfig::default(),
            possession: PossessionThresholds::default(),
            keypoints: KeypointThresholds::default(),
            shot: ShotThresholds::default(),
            ball_cleaning: BallCleaningConfig::default(),
            parallel: true,
        }
    }
}

impl AnalyticsConfig {
    /// Strict preset - longer hysteresis, tighter calibration
    pub fn strict() -> Self {
        Self {
            possession: PossessionThresholds {
                containment_threshold: 0.85,
                max_distance_px: 35.0,
                min_frames: 15,
            },
            keypoints: KeypointThresholds {
                max_proportion_error: 0.5,
                ..KeypointThresholds::default()
            },
            shot: ShotThresholds {
                ellipse_threshold: 25.0,
                ..ShotThresholds::default()
            },
            ..Self::default()
        }
    }

    /// Lenient preset - for low-resolution footage with noisy boxes
    pub fn lenient() -> Self {
        Self {
            possession: PossessionThresholds {
                containment_threshold: 0.7,
                max_distance_px: 70.0,
                min_frames: 7,
            },
            ball_cleaning: BallCleaningConfig {
                enabled: true,
                ..BallCleaningConfig::default()
            },
            ..Self::default()
        }
    }

    /// Preset by name; unknown names fall back to the default.
    pub fn from_profile(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "strict" => Self::strict(),
            "lenient" => Self::lenient(),
            _ => Self::default(),
        }
    }

    /// Load from environment variable or use default
    pub fn from_env_or_default() -> Self {
        Self::from_profile(&env::var(PROFILE_ENV).unwrap_or_default())
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a `.yaml`/`.yml` or `.json` file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&raw),
            Some("json") => Self::from_json_str(&raw),
            other => Err(AnalyticsError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(AnalyticsError::InvalidConfig(msg.to_string()));
        // NaN fails every comparison, so bounds are written as the accepted range
        let positive = |v: f64| v.is_finite() && v > 0.0;

        if !positive(self.court.canvas_width) || !positive(self.court.canvas_height) {
            return invalid("tactical canvas must have positive size");
        }
        if !positive(self.court.court_length_m) || !positive(self.court.court_width_m) {
            return invalid("court dimensions must be positive");
        }
        if !positive(self.motion.default_frame_rate) {
            return invalid("frame rate must be positive");
        }
        if !(0.0..=1.0).contains(&self.possession.containment_threshold) {
            return invalid("containment threshold must be within [0, 1]");
        }
        if !(self.possession.max_distance_px.is_finite() && self.possession.max_distance_px >= 0.0) {
            return invalid("possession distance must be non-negative");
        }
        if self.possession.min_frames == 0 {
            return invalid("possession min_frames must be at least 1");
        }
        if !positive(self.keypoints.max_proportion_error) {
            return invalid("keypoint proportion error must be positive");
        }
        if self.keypoints.min_points_to_validate < 3 {
            return invalid("keypoint validation needs at least 3 points");
        }
        if self.keypoints.min_points_to_map < 4 {
            return invalid("a homography needs at least 4 points");
        }
        if !positive(self.shot.ellipse_threshold) || !positive(self.shot.ellipse_vertical_ratio) {
            return invalid("shot ellipse parameters must be positive");
        }
        if !positive(self.ball_cleaning.max_jump_px_per_frame) {
            return invalid("ball jump limit must be positive");
        }
        Ok(())
    }
}
