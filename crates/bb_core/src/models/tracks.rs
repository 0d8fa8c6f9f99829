//! Per-entity box tracks.
//!
//! Players, the ball and hoops all expose per-frame boxes through
//! [`FrameBoxes`]; each kind adds its own extensions (team and stats for
//! players, ownership and gap cleaning for the ball, static averaging for
//! hoops). Recorded boxes are never edited in place: cleaning a track
//! returns a new one.

use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::stats::PlayerStats;
use crate::error::FrameError;
use crate::geometry::{BoundingBox, Point2};

pub type PlayerId = u32;
pub type TeamId = u8;

/// Which kind of entity a track follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackKind {
    Player,
    Ball,
    Hoop,
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TrackKind::Player => write!(f, "player"),
            TrackKind::Ball => write!(f, "ball"),
            TrackKind::Hoop => write!(f, "hoop"),
        }
    }
}

/// Generic per-frame box access shared by every track kind.
pub trait FrameBoxes {
    fn kind(&self) -> TrackKind;

    fn box_at(&self, frame: usize) -> Option<&BoundingBox>;

    fn has_box_at(&self, frame: usize) -> bool {
        self.box_at(frame).is_some()
    }

    /// Highest frame index carrying a box.
    fn last_frame(&self) -> Option<usize>;

    fn require_box(&self, frame: usize) -> Result<&BoundingBox, FrameError> {
        self.box_at(frame).ok_or(FrameError::MissingDetection {
            frame,
            kind: self.kind(),
        })
    }
}

// ============================================================================
// Player
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerTrack {
    pub id: PlayerId,
    boxes: BTreeMap<usize, BoundingBox>,
    /// Most recent team assignment seen for this player
    pub team: Option<TeamId>,
    pub stats: PlayerStats,
}

impl PlayerTrack {
    pub fn new(id: PlayerId, boxes: BTreeMap<usize, BoundingBox>) -> Self {
        Self {
            id,
            boxes,
            team: None,
            stats: PlayerStats::default(),
        }
    }

    pub fn boxes(&self) -> &BTreeMap<usize, BoundingBox> {
        &self.boxes
    }
}

impl FrameBoxes for PlayerTrack {
    fn kind(&self) -> TrackKind {
        TrackKind::Player
    }

    fn box_at(&self, frame: usize) -> Option<&BoundingBox> {
        self.boxes.get(&frame)
    }

    fn last_frame(&self) -> Option<usize> {
        self.boxes.keys().next_back().copied()
    }
}

// ============================================================================
// Ball
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BallTrack {
    boxes: BTreeMap<usize, BoundingBox>,
    last_owner: Option<PlayerId>,
}

impl BallTrack {
    pub fn new(boxes: BTreeMap<usize, BoundingBox>) -> Self {
        Self {
            boxes,
            last_owner: None,
        }
    }

    pub fn boxes(&self) -> &BTreeMap<usize, BoundingBox> {
        &self.boxes
    }

    pub fn center_at(&self, frame: usize) -> Option<Point2> {
        self.boxes.get(&frame).map(BoundingBox::center)
    }

    pub fn last_owner(&self) -> Option<PlayerId> {
        self.last_owner
    }

    pub fn set_last_owner(&mut self, player: PlayerId) {
        self.last_owner = Some(player);
    }

    /// Drops detections that jump too far from the last accepted one.
    ///
    /// Walking frames in order, a box is kept when its top-left corner is
    /// within `max_px_per_frame × gap` of the previously kept box.
    pub fn without_outliers(&self, max_px_per_frame: f64) -> BallTrack {
        let mut kept = BTreeMap::new();
        let mut last_good: Option<(usize, BoundingBox)> = None;

        for (&frame, bbox) in &self.boxes {
            match last_good {
                None => {
                    kept.insert(frame, *bbox);
                    last_good = Some((frame, *bbox));
                }
                Some((last_frame, last_box)) => {
                    let gap = (frame - last_frame) as f64;
                    let jump = Point2::new(bbox.x1, bbox.y1)
                        .distance_to(&Point2::new(last_box.x1, last_box.y1));
                    if jump <= max_px_per_frame * gap {
                        kept.insert(frame, *bbox);
                        last_good = Some((frame, *bbox));
                    }
                }
            }
        }

        BallTrack {
            boxes: kept,
            last_owner: self.last_owner,
        }
    }

    /// Fills every frame in `0..=last_frame` by linear interpolation.
    ///
    /// Frames before the first detection take the first box.
    pub fn interpolated(&self) -> BallTrack {
        let mut filled = BTreeMap::new();
        let known: Vec<(usize, BoundingBox)> = self.boxes.iter().map(|(f, b)| (*f, *b)).collect();

        let Some(&(first_frame, first_box)) = known.first() else {
            return self.clone();
        };

        for frame in 0..first_frame {
            filled.insert(frame, first_box);
        }

        for pair in known.windows(2) {
            let (f0, b0) = pair[0];
            let (f1, b1) = pair[1];
            let span = (f1 - f0) as f64;
            for frame in f0..f1 {
                let t = (frame - f0) as f64 / span;
                let lerp = |a: f64, b: f64| a + (b - a) * t;
                filled.insert(
                    frame,
                    BoundingBox::new(
                        lerp(b0.x1, b1.x1),
                        lerp(b0.y1, b1.y1),
                        lerp(b0.x2, b1.x2),
                        lerp(b0.y2, b1.y2),
                    ),
                );
            }
        }

        if let Some(&(last_frame, last_box)) = known.last() {
            filled.insert(last_frame, last_box);
        }

        BallTrack {
            boxes: filled,
            last_owner: self.last_owner,
        }
    }
}

impl FrameBoxes for BallTrack {
    fn kind(&self) -> TrackKind {
        TrackKind::Ball
    }

    fn box_at(&self, frame: usize) -> Option<&BoundingBox> {
        self.boxes.get(&frame)
    }

    fn last_frame(&self) -> Option<usize> {
        self.boxes.keys().next_back().copied()
    }
}

// ============================================================================
// Hoop
// ============================================================================

/// Raw hoop detection before left/right assignment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HoopDetection {
    pub bbox: BoundingBox,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoopTrack {
    pub label: String,
    /// Team that scores into this hoop, when known
    pub team: Option<TeamId>,
    boxes: BTreeMap<usize, BoundingBox>,
}

impl HoopTrack {
    pub fn new(label: impl Into<String>, boxes: BTreeMap<usize, BoundingBox>) -> Self {
        Self {
            label: label.into(),
            team: None,
            boxes,
        }
    }

    pub fn with_team(mut self, team: Option<TeamId>) -> Self {
        self.team = team;
        self
    }

    pub fn boxes(&self) -> &BTreeMap<usize, BoundingBox> {
        &self.boxes
    }

    /// Splits raw detections into a left and a right hoop by the frame midline,
    /// keeping the most confident detection per side per frame.
    pub fn split_left_right(detections: &[Vec<HoopDetection>], frame_width: f64) -> (HoopTrack, HoopTrack) {
        let midpoint = (frame_width / 2.0).floor();
        let mut left = BTreeMap::new();
        let mut right = BTreeMap::new();

        for (frame, frame_detections) in detections.iter().enumerate() {
            let mut left_best: Option<&HoopDetection> = None;
            let mut right_best: Option<&HoopDetection> = None;

            for det in frame_detections {
                let side = if det.bbox.center().x < midpoint {
                    &mut left_best
                } else {
                    &mut right_best
                };
                if side.map_or(true, |best| det.confidence > best.confidence) {
                    *side = Some(det);
                }
            }

            if let Some(det) = left_best {
                left.insert(frame, det.bbox);
            }
            if let Some(det) = right_best {
                right.insert(frame, det.bbox);
            }
        }

        (HoopTrack::new("left", left), HoopTrack::new("right", right))
    }

    /// Collapses the track to its mean box, reported for every frame in `0..num_frames`.
    ///
    /// Hoops are static; averaging removes detector jitter. A track with no
    /// detections stays empty.
    pub fn averaged(&self, num_frames: usize) -> HoopTrack {
        let n = self.boxes.len() as f64;
        if self.boxes.is_empty() {
            return self.clone();
        }
        let (mut x1, mut y1, mut x2, mut y2) = (0.0, 0.0, 0.0, 0.0);
        for b in self.boxes.values() {
            x1 += b.x1;
            y1 += b.y1;
            x2 += b.x2;
            y2 += b.y2;
        }
        let mean = BoundingBox::new(x1 / n, y1 / n, x2 / n, y2 / n);

        HoopTrack {
            label: self.label.clone(),
            team: self.team,
            boxes: (0..num_frames).map(|f| (f, mean)).collect(),
        }
    }
}

impl FrameBoxes for HoopTrack {
    fn kind(&self) -> TrackKind {
        TrackKind::Hoop
    }

    fn box_at(&self, frame: usize) -> Option<&BoundingBox> {
        self.boxes.get(&frame)
    }

    fn last_frame(&self) -> Option<usize> {
        self.boxes.keys().next_back().copied()
    }
}
