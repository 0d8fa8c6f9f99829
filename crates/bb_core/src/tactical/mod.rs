//! # Tactical View
//!
//! Calibrates perspective detections into the fixed top-down court canvas.
//!
//! - `court_layout` - reference landmarks on the canvas
//! - `keypoint_validator` - drops landmarks with implausible proportions
//! - `view_mapper` - per-frame homography and player projection

pub mod court_layout;
pub mod keypoint_validator;
pub mod view_mapper;

pub use court_layout::{CourtLayout, LAYOUT_LEN};
pub use keypoint_validator::KeypointValidator;
pub use view_mapper::{FrameCalibration, TacticalPositions, TacticalViewMapper};
