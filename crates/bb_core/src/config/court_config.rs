//! Court geometry and motion calibration.

use serde::{Deserialize, Serialize};

/// Tactical canvas and the physical court it represents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourtConfig {
    /// Tactical canvas width (units)
    pub canvas_width: f64,
    /// Tactical canvas height (units)
    pub canvas_height: f64,
    /// Physical court length (meters)
    pub court_length_m: f64,
    /// Physical court width (meters)
    pub court_width_m: f64,
}

impl Default for CourtConfig {
    fn default() -> Self {
        Self {
            canvas_width: 300.0,
            canvas_height: 161.0,
            court_length_m: 28.0,
            court_width_m: 15.0,
        }
    }
}

impl CourtConfig {
    /// Meters per tactical unit along the court length.
    pub fn meters_per_unit(&self) -> f64 {
        self.court_length_m / self.canvas_width
    }

    /// Converts a court-space length in meters into canvas units, per axis.
    pub fn meters_to_canvas(&self, x_m: f64, y_m: f64) -> (f64, f64) {
        (
            x_m / self.court_length_m * self.canvas_width,
            y_m / self.court_width_m * self.canvas_height,
        )
    }

    pub fn in_bounds(&self, x: f64, y: f64) -> bool {
        (0.0..=self.canvas_width).contains(&x) && (0.0..=self.canvas_height).contains(&y)
    }
}

/// Frame timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Frame rate used when the input does not carry one
    pub default_frame_rate: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            default_frame_rate: 24.0,
        }
    }
}
