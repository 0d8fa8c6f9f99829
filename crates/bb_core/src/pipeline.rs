//! # Game Analyzer
//!
//! Runs every stage over one clip in data-flow order:
//!
//! 1. contract validation (once, at the boundary)
//! 2. keypoint validation → tactical mapping
//! 3. possession
//! 4. passes and interceptions, speed and distance
//! 5. shots and scoring
//!
//! Stages 2 and 4 are per-frame and may run on the rayon pool; possession and
//! shots walk frames in order.

use serde::{Deserialize, Serialize};

use crate::analysis::{MotionSeries, PassInferencer, SpeedDistanceCalculator};
use crate::config::AnalyticsConfig;
use crate::error::Result;
use crate::models::{
    BallTrack, GameInput, HoopTrack, PlayerTrack, PossessionChange, Roster, ShotEvent, Team,
    TeamAssignments,
};
use crate::possession::{PossessionDetector, PossessionSeries, PossessionShare};
use crate::shot::{ShotDetector, ShotInputs};
use crate::summary::GameSummary;
use crate::tactical::{CourtLayout, KeypointValidator, TacticalPositions, TacticalViewMapper};

/// Counters for everything recovered locally during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Frames where no homography could be fitted
    pub skipped_calibration_frames: usize,
    /// Keypoints zeroed by the plausibility check
    pub rejected_keypoints: usize,
    /// Frames without any keypoint detection
    pub empty_keypoint_frames: usize,
    /// Ball boxes dropped as outliers (cleaning only)
    pub ball_outliers_dropped: usize,
    /// Ball boxes added by interpolation (cleaning only)
    pub ball_frames_interpolated: usize,
}

/// Every series produced for one clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameAnalysis {
    pub num_frames: usize,
    pub frame_rate: f64,
    pub possession: PossessionSeries,
    pub possession_changes: Vec<PossessionChange>,
    pub tactical_positions: TacticalPositions,
    pub motion: MotionSeries,
    pub shots: Vec<ShotEvent>,
    pub summary: GameSummary,
    pub diagnostics: Diagnostics,
    #[serde(skip)]
    pub roster: Roster,
}

impl GameAnalysis {
    pub fn passes(&self) -> impl Iterator<Item = &PossessionChange> {
        self.possession_changes.iter().filter(|c| c.is_pass())
    }

    pub fn interceptions(&self) -> impl Iterator<Item = &PossessionChange> {
        self.possession_changes.iter().filter(|c| c.is_interception())
    }
}

pub struct GameAnalyzer {
    config: AnalyticsConfig,
    layout: CourtLayout,
}

impl GameAnalyzer {
    pub fn new(config: AnalyticsConfig) -> Self {
        let layout = CourtLayout::new(&config.court);
        Self { config, layout }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub fn layout(&self) -> &CourtLayout {
        &self.layout
    }

    pub fn analyze(&self, input: &GameInput) -> Result<GameAnalysis> {
        self.config.validate()?;
        input.validate(self.layout.len())?;

        let n = input.num_frames;
        let parallel = self.config.parallel;
        let frame_rate = input.frame_rate.unwrap_or(self.config.motion.default_frame_rate);
        let mut diagnostics = Diagnostics::default();

        let mut roster = Roster::new(
            input
                .players
                .iter()
                .map(|p| PlayerTrack::new(p.id, p.boxes.clone())),
            input.teams.iter().map(|t| Team::new(t.id, t.name.clone())),
        );
        roster.apply_team_assignments(&input.team_assignments);
        let teams = TeamAssignments::new(input.team_assignments.clone());

        let mut ball = self.prepare_ball(input, &mut diagnostics);
        let hoops = self.prepare_hoops(input);

        // Calibration
        let keypoints = if input.keypoints.is_empty() {
            vec![Vec::new(); n]
        } else {
            input.keypoints.clone()
        };
        diagnostics.empty_keypoint_frames = keypoints
            .iter()
            .filter(|f| !f.iter().any(|p| p.is_detected()))
            .count();
        if diagnostics.empty_keypoint_frames > 0 {
            log::warn!(
                "{} of {} frames carry no court keypoints",
                diagnostics.empty_keypoint_frames,
                n
            );
        }

        let validator = KeypointValidator::new(&self.layout, self.config.keypoints.clone());
        let validated = validator.validate_all(&keypoints, parallel);
        diagnostics.rejected_keypoints = count_detected(&keypoints) - count_detected(&validated);

        let mapper = TacticalViewMapper::new(&self.layout, self.config.keypoints.min_points_to_map);
        let (tactical_positions, skipped) = mapper.map_sequence(&validated, roster.players(), parallel);
        diagnostics.skipped_calibration_frames = skipped;

        // Possession and derived events
        let detector = PossessionDetector::new(self.config.possession.clone());
        let possession = detector.detect(&ball, roster.players(), n);

        let possession_changes =
            PassInferencer::new(&teams).infer_and_record(&possession, &mut roster.ledger());

        let motion = SpeedDistanceCalculator::new(self.config.court.meters_per_unit(), frame_rate)
            .compute(&tactical_positions, parallel);

        // Shots
        let shots = {
            let inputs = ShotInputs {
                hoops: &hoops,
                possession: &possession,
                changes: &possession_changes,
                teams: &teams,
                tactical: &tactical_positions,
            };
            ShotDetector::new(self.config.shot.clone()).run(&mut ball, &inputs, n, &mut roster.ledger())
        };

        let share = PossessionShare::from_series(&possession, &teams);
        let summary = GameSummary::build(&roster, &share, &possession_changes, &motion, &shots);

        log::info!(
            "analyzed {} frames: {} possession changes, {} shots, {} frames uncalibrated",
            n,
            possession_changes.len(),
            shots.len(),
            diagnostics.skipped_calibration_frames
        );

        Ok(GameAnalysis {
            num_frames: n,
            frame_rate,
            possession,
            possession_changes,
            tactical_positions,
            motion,
            shots,
            summary,
            diagnostics,
            roster,
        })
    }

    fn prepare_ball(&self, input: &GameInput, diagnostics: &mut Diagnostics) -> BallTrack {
        let raw = BallTrack::new(input.ball.clone());
        if !self.config.ball_cleaning.enabled {
            return raw;
        }

        let kept = raw.without_outliers(self.config.ball_cleaning.max_jump_px_per_frame);
        let filled = kept.interpolated();
        diagnostics.ball_outliers_dropped = raw.boxes().len() - kept.boxes().len();
        diagnostics.ball_frames_interpolated = filled.boxes().len() - kept.boxes().len();
        log::debug!(
            "ball cleaning: {} outliers dropped, {} frames interpolated",
            diagnostics.ball_outliers_dropped,
            diagnostics.ball_frames_interpolated
        );
        filled
    }

    /// Labeled hoops win over raw detections; either way hoops are static
    /// and collapse to their mean box.
    fn prepare_hoops(&self, input: &GameInput) -> Vec<HoopTrack> {
        let n = input.num_frames;
        if !input.hoops.is_empty() {
            return input
                .hoops
                .iter()
                .map(|h| {
                    HoopTrack::new(h.label.clone(), h.boxes.clone())
                        .with_team(h.team)
                        .averaged(n)
                })
                .collect();
        }

        match input.frame_width {
            Some(width) if !input.hoop_detections.is_empty() => {
                let (left, right) = HoopTrack::split_left_right(&input.hoop_detections, width);
                vec![left.averaged(n), right.averaged(n)]
            }
            _ => Vec::new(),
        }
    }
}

fn count_detected(frames: &[Vec<crate::geometry::Point2>]) -> usize {
    frames
        .iter()
        .map(|f| f.iter().filter(|p| p.is_detected()).count())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalyticsError;
    use crate::geometry::BoundingBox;
    use crate::models::{HoopDetection, PlayerInput};
    use std::collections::BTreeMap;

    #[test]
    fn test_empty_clip() {
        let analysis = GameAnalyzer::new(AnalyticsConfig::default())
            .analyze(&GameInput {
                num_frames: 5,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(analysis.possession, vec![None; 5]);
        assert_eq!(analysis.tactical_positions.len(), 5);
        assert_eq!(analysis.diagnostics.skipped_calibration_frames, 5);
        assert_eq!(analysis.diagnostics.empty_keypoint_frames, 5);
        assert!(analysis.shots.is_empty());
        assert!((analysis.frame_rate - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_contract_error_raised_once() {
        let input = GameInput {
            num_frames: 3,
            keypoints: vec![vec![]; 2],
            ..Default::default()
        };
        let err = GameAnalyzer::new(AnalyticsConfig::default()).analyze(&input).unwrap_err();
        assert!(matches!(err, AnalyticsError::FrameRangeMismatch { .. }));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = AnalyticsConfig::default();
        config.possession.min_frames = 0;
        let err = GameAnalyzer::new(config)
            .analyze(&GameInput::default())
            .unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidConfig(_)));
    }

    #[test]
    fn test_ball_cleaning_diagnostics() {
        let mut config = AnalyticsConfig::default();
        config.ball_cleaning.enabled = true;
        let b = |x: f64| BoundingBox::new(x, 100.0, x + 10.0, 110.0);
        let input = GameInput {
            num_frames: 6,
            ball: BTreeMap::from([(0, b(100.0)), (1, b(105.0)), (2, b(900.0)), (4, b(115.0))]),
            ..Default::default()
        };
        let analysis = GameAnalyzer::new(config).analyze(&input).unwrap();
        assert_eq!(analysis.diagnostics.ball_outliers_dropped, 1);
        // Frames 2 and 3 filled between 1 and 4
        assert_eq!(analysis.diagnostics.ball_frames_interpolated, 2);
    }

    #[test]
    fn test_hoops_from_raw_detections() {
        let det = |x: f64| HoopDetection {
            bbox: BoundingBox::new(x, 50.0, x + 40.0, 70.0),
            confidence: 0.9,
        };
        let input = GameInput {
            num_frames: 2,
            frame_width: Some(1920.0),
            hoop_detections: vec![vec![det(100.0), det(1700.0)], vec![det(110.0)]],
            players: vec![PlayerInput {
                id: 1,
                boxes: BTreeMap::new(),
            }],
            ..Default::default()
        };
        let analyzer = GameAnalyzer::new(AnalyticsConfig::default());
        let hoops = analyzer.prepare_hoops(&input);
        assert_eq!(hoops.len(), 2);
        assert_eq!(hoops[0].label, "left");
        assert_eq!(hoops[0].boxes().len(), 2);
        assert!(analyzer.analyze(&input).is_ok());
    }

    #[test]
    fn test_analysis_serializes_without_roster() {
        let analysis = GameAnalyzer::new(AnalyticsConfig::default())
            .analyze(&GameInput {
                num_frames: 2,
                ..Default::default()
            })
            .unwrap();
        let json = serde_json::to_value(&analysis).unwrap();
        assert!(json.get("roster").is_none());
        assert!(json["possession"].is_array());
        assert!(json["summary"]["teams"].is_array());
    }
}
