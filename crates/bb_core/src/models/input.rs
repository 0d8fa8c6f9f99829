//! Per-frame detection contract consumed from the upstream tracker.
//!
//! The contract is checked once, at the sequence boundary, by
//! [`GameInput::validate`]; after that every stage may assume frame indices
//! are in range and boxes are well formed.

use std::collections::{BTreeMap, BTreeSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::tracks::{HoopDetection, PlayerId, TeamId};
use crate::error::{AnalyticsError, Result};
use crate::geometry::{BoundingBox, Point2};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PlayerInput {
    pub id: PlayerId,
    /// frame → box
    pub boxes: BTreeMap<usize, BoundingBox>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HoopInput {
    pub label: String,
    #[serde(default)]
    pub team: Option<TeamId>,
    pub boxes: BTreeMap<usize, BoundingBox>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TeamInput {
    pub id: TeamId,
    pub name: String,
}

/// Everything the analytics core needs for one clip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GameInput {
    pub num_frames: usize,
    /// Frames per second; the configured default applies when absent
    #[serde(default)]
    pub frame_rate: Option<f64>,
    /// Source frame width in pixels, needed to split raw hoop detections
    #[serde(default)]
    pub frame_width: Option<f64>,
    #[serde(default)]
    pub teams: Vec<TeamInput>,
    #[serde(default)]
    pub players: Vec<PlayerInput>,
    /// frame → ball box, absent frames have no ball
    #[serde(default)]
    pub ball: BTreeMap<usize, BoundingBox>,
    /// Labeled hoop tracks
    #[serde(default)]
    pub hoops: Vec<HoopInput>,
    /// Unlabeled per-frame hoop detections, split left/right when `hoops` is empty
    #[serde(default)]
    pub hoop_detections: Vec<Vec<HoopDetection>>,
    /// Per-frame court keypoints in layout order; an empty frame means no detection
    #[serde(default)]
    pub keypoints: Vec<Vec<Point2>>,
    /// Per-frame player → team assignment
    #[serde(default)]
    pub team_assignments: Vec<BTreeMap<PlayerId, TeamId>>,
}

impl GameInput {
    /// Checks the contract: every series spans the same frame range, boxes
    /// are well formed and keypoint frames match the layout length.
    pub fn validate(&self, layout_len: usize) -> Result<()> {
        let n = self.num_frames;

        let check_len = |name: &str, found: usize| -> Result<()> {
            if found != 0 && found != n {
                return Err(AnalyticsError::FrameRangeMismatch {
                    source_name: name.to_string(),
                    expected: n,
                    found,
                });
            }
            Ok(())
        };
        check_len("keypoints", self.keypoints.len())?;
        check_len("team_assignments", self.team_assignments.len())?;
        check_len("hoop_detections", self.hoop_detections.len())?;

        check_boxes("ball", &self.ball, n)?;
        let mut seen = BTreeSet::new();
        for player in &self.players {
            if !seen.insert(player.id) {
                return Err(AnalyticsError::DuplicatePlayer(player.id));
            }
            check_boxes(&format!("player {}", player.id), &player.boxes, n)?;
        }
        for hoop in &self.hoops {
            check_boxes(&format!("hoop {}", hoop.label), &hoop.boxes, n)?;
        }
        for (frame, detections) in self.hoop_detections.iter().enumerate() {
            if detections.iter().any(|d| !d.bbox.is_well_formed()) {
                return Err(AnalyticsError::MalformedBox {
                    source_name: "hoop_detections".to_string(),
                    frame,
                });
            }
        }

        if self.hoops.is_empty() && !self.hoop_detections.is_empty() && self.frame_width.is_none() {
            return Err(AnalyticsError::MissingInput(
                "frame_width is required to split hoop_detections".to_string(),
            ));
        }

        for (frame, points) in self.keypoints.iter().enumerate() {
            if !points.is_empty() && points.len() != layout_len {
                return Err(AnalyticsError::KeypointLayoutMismatch {
                    frame,
                    expected: layout_len,
                    found: points.len(),
                });
            }
        }

        if let Some(rate) = self.frame_rate {
            if !(rate.is_finite() && rate > 0.0) {
                return Err(AnalyticsError::InvalidConfig(format!(
                    "frame rate must be positive, got {}",
                    rate
                )));
            }
        }

        Ok(())
    }
}

fn check_boxes(name: &str, boxes: &BTreeMap<usize, BoundingBox>, num_frames: usize) -> Result<()> {
    if let Some((&last, _)) = boxes.iter().next_back() {
        if last >= num_frames {
            return Err(AnalyticsError::FrameRangeMismatch {
                source_name: name.to_string(),
                expected: num_frames,
                found: last + 1,
            });
        }
    }
    if let Some((&frame, _)) = boxes.iter().find(|(_, b)| !b.is_well_formed()) {
        return Err(AnalyticsError::MalformedBox {
            source_name: name.to_string(),
            frame,
        });
    }
    Ok(())
}
