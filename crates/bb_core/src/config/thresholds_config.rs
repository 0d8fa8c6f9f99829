//! Detection thresholds for the per-frame stages.
//!
//! | Group | Stage |
//! |-------|-------|
//! | `possession` | possession detector |
//! | `keypoints` | keypoint validator, tactical mapper |
//! | `shot` | shot/score state machine |
//! | `ball_cleaning` | optional ball track preprocessing |

use serde::{Deserialize, Serialize};

/// Possession detector thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PossessionThresholds {
    /// Containment ratio above which a player encloses the ball (0.0 - 1.0)
    pub containment_threshold: f64,
    /// Maximum anchor distance for a non-enclosing candidate (pixels)
    pub max_distance_px: f64,
    /// Consecutive frames a candidate needs before possession is written
    pub min_frames: usize,
}

impl Default for PossessionThresholds {
    fn default() -> Self {
        Self {
            containment_threshold: 0.8,
            max_distance_px: 50.0,
            min_frames: 11,
        }
    }
}

/// Keypoint validation and mapping thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeypointThresholds {
    /// Relative proportion error above which a keypoint is dropped
    pub max_proportion_error: f64,
    /// Detected points needed before validation runs at all
    pub min_points_to_validate: usize,
    /// Valid points needed to fit a homography
    pub min_points_to_map: usize,
}

impl Default for KeypointThresholds {
    fn default() -> Self {
        Self {
            max_proportion_error: 0.8,
            min_points_to_validate: 3,
            min_points_to_map: 4,
        }
    }
}

/// Shot/score state machine thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotThresholds {
    /// Upper bound on the normalized ellipse form for a make.
    /// Loose on purpose: hoop boxes are small and ball centers jitter.
    pub ellipse_threshold: f64,
    /// Vertical ellipse radius as a fraction of the horizontal one
    pub ellipse_vertical_ratio: f64,
    /// Frames during which collision checks are suppressed after a shot
    pub display_frames: u32,
    /// Points awarded per made shot
    pub points_per_make: u32,
}

impl Default for ShotThresholds {
    fn default() -> Self {
        Self {
            ellipse_threshold: 100.0,
            ellipse_vertical_ratio: 0.35,
            display_frames: 30,
            points_per_make: 2,
        }
    }
}

/// Ball track preprocessing (off unless the upstream tracker skipped it)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallCleaningConfig {
    /// Reject jumps and interpolate gaps before analysis
    pub enabled: bool,
    /// Maximum top-left corner travel per frame of gap (pixels)
    pub max_jump_px_per_frame: f64,
}

impl Default for BallCleaningConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_jump_px_per_frame: 25.0,
        }
    }
}
