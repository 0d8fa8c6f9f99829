//! Projects player foot positions onto the tactical canvas.
//!
//! Each frame gets its own homography fitted from that frame's validated
//! keypoints; there is no smoothing between frames.

use std::collections::BTreeMap;

use rayon::prelude::*;

use super::court_layout::CourtLayout;
use crate::error::FrameError;
use crate::geometry::{Homography, Point2};
use crate::models::{FrameBoxes, PlayerId, PlayerTrack};

/// Per-frame tactical positions: frame → player → canvas point.
pub type TacticalPositions = Vec<BTreeMap<PlayerId, Point2>>;

/// Outcome of calibrating one frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameCalibration {
    Mapped(BTreeMap<PlayerId, Point2>),
    Skipped(FrameError),
}

pub struct TacticalViewMapper<'a> {
    layout: &'a CourtLayout,
    min_points: usize,
}

impl<'a> TacticalViewMapper<'a> {
    pub fn new(layout: &'a CourtLayout, min_points: usize) -> Self {
        Self { layout, min_points }
    }

    /// Fits detected→reference for one frame.
    pub fn fit_frame(&self, keypoints: &[Point2]) -> Result<Homography, FrameError> {
        let (source, target): (Vec<Point2>, Vec<Point2>) = keypoints
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_detected())
            .filter_map(|(i, p)| self.layout.point(i).map(|r| (*p, r)))
            .unzip();

        if source.len() < self.min_points {
            return Err(FrameError::degenerate(format!(
                "{} valid keypoints, need {}",
                source.len(),
                self.min_points
            )));
        }

        Homography::estimate(&source, &target)
    }

    /// Maps every player with a box in `frame`; out-of-bounds or unmappable
    /// players are left out.
    pub fn map_frame<'p>(
        &self,
        frame: usize,
        keypoints: &[Point2],
        players: impl IntoIterator<Item = &'p PlayerTrack>,
    ) -> FrameCalibration {
        let homography = match self.fit_frame(keypoints) {
            Ok(h) => h,
            Err(err) => return FrameCalibration::Skipped(err),
        };

        let mut positions = BTreeMap::new();
        for player in players {
            let Some(bbox) = player.box_at(frame) else {
                continue;
            };
            match homography.apply(bbox.foot_position()) {
                Ok(p) if self.layout.contains(p) => {
                    positions.insert(player.id, p);
                }
                Ok(_) => {}
                Err(err) => {
                    log::debug!("frame {}: player {} not mapped: {}", frame, player.id, err);
                }
            }
        }
        FrameCalibration::Mapped(positions)
    }

    /// Maps every frame of the sequence. `keypoints[f]` must already be validated.
    pub fn map_sequence(
        &self,
        keypoints: &[Vec<Point2>],
        players: &BTreeMap<PlayerId, PlayerTrack>,
        parallel: bool,
    ) -> (TacticalPositions, usize) {
        let map_one = |(frame, kps): (usize, &Vec<Point2>)| match self.map_frame(frame, kps, players.values()) {
            FrameCalibration::Mapped(positions) => (positions, false),
            FrameCalibration::Skipped(err) => {
                log::debug!("frame {}: no tactical mapping: {}", frame, err);
                (BTreeMap::new(), true)
            }
        };

        let results: Vec<(BTreeMap<PlayerId, Point2>, bool)> = if parallel {
            keypoints.par_iter().enumerate().map(map_one).collect()
        } else {
            keypoints.iter().enumerate().map(map_one).collect()
        };

        let skipped = results.iter().filter(|(_, skipped)| *skipped).count();
        (results.into_iter().map(|(p, _)| p).collect(), skipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BoundingBox;

    /// Camera model: canvas → pixels as a scale + offset (an affine homography).
    fn to_pixels(p: Point2) -> Point2 {
        Point2::new(4.0 * p.x + 200.0, 3.0 * p.y + 150.0)
    }

    fn detected_frame(layout: &CourtLayout, indices: &[usize]) -> Vec<Point2> {
        let mut frame = vec![Point2::default(); layout.len()];
        for &i in indices {
            frame[i] = to_pixels(layout.points()[i]);
        }
        frame
    }

    fn player_with_foot_at(id: PlayerId, frame: usize, canvas: Point2) -> PlayerTrack {
        let foot = to_pixels(canvas);
        let bbox = BoundingBox::new(foot.x - 20.0, foot.y - 120.0, foot.x + 20.0, foot.y);
        PlayerTrack::new(id, BTreeMap::from([(frame, bbox)]))
    }

    #[test]
    fn test_maps_foot_position() {
        let layout = CourtLayout::default();
        let mapper = TacticalViewMapper::new(&layout, 4);
        let kps = detected_frame(&layout, &[0, 5, 10, 15, 8]);
        let player = player_with_foot_at(3, 0, Point2::new(120.0, 80.0));

        match mapper.map_frame(0, &kps, [&player]) {
            FrameCalibration::Mapped(positions) => {
                let p = positions.get(&3).expect("player mapped");
                assert!(p.distance_to(&Point2::new(120.0, 80.0)) < 1e-6, "got {:?}", p);
            }
            FrameCalibration::Skipped(err) => panic!("unexpected skip: {}", err),
        }
    }

    #[test]
    fn test_out_of_bounds_dropped() {
        let layout = CourtLayout::default();
        let mapper = TacticalViewMapper::new(&layout, 4);
        let kps = detected_frame(&layout, &[0, 5, 10, 15]);
        let outside = player_with_foot_at(1, 0, Point2::new(320.0, 80.0));
        let inside = player_with_foot_at(2, 0, Point2::new(299.0, 160.0));

        let FrameCalibration::Mapped(positions) = mapper.map_frame(0, &kps, [&outside, &inside]) else {
            panic!("frame should map");
        };
        assert!(!positions.contains_key(&1), "player beyond the right edge kept");
        assert!(positions.contains_key(&2));
        for p in positions.values() {
            assert!(layout.contains(*p));
        }
    }

    #[test]
    fn test_too_few_keypoints_skips_frame() {
        let layout = CourtLayout::default();
        let mapper = TacticalViewMapper::new(&layout, 4);
        let kps = detected_frame(&layout, &[0, 5, 10]);
        let player = player_with_foot_at(1, 0, Point2::new(100.0, 100.0));
        assert!(matches!(
            mapper.map_frame(0, &kps, [&player]),
            FrameCalibration::Skipped(FrameError::DegenerateGeometry { .. })
        ));
    }

    #[test]
    fn test_sideline_heavy_keypoints_skip_frame() {
        // Four left-edge landmarks and one free-throw corner cannot fix a homography
        let layout = CourtLayout::default();
        let mapper = TacticalViewMapper::new(&layout, 4);
        let kps = detected_frame(&layout, &[0, 1, 2, 3, 8]);
        assert!(matches!(mapper.fit_frame(&kps), Err(FrameError::DegenerateGeometry { .. })));

        let player = player_with_foot_at(1, 0, Point2::new(200.0, 80.0));
        assert!(matches!(
            mapper.map_frame(0, &kps, [&player]),
            FrameCalibration::Skipped(FrameError::DegenerateGeometry { .. })
        ));

        let kps = detected_frame(&layout, &[0, 1, 2, 3, 8, 9]);
        let FrameCalibration::Mapped(positions) = mapper.map_frame(0, &kps, [&player]) else {
            panic!("frame should map with a second free-throw corner");
        };
        assert!(positions[&1].distance_to(&Point2::new(200.0, 80.0)) < 1e-6);
    }

    #[test]
    fn test_map_sequence_counts_skipped_frames() {
        let layout = CourtLayout::default();
        let mapper = TacticalViewMapper::new(&layout, 4);
        let good = detected_frame(&layout, &[0, 5, 10, 15]);
        let frames = vec![good.clone(), vec![], good];

        let foot_a = to_pixels(Point2::new(50.0, 50.0));
        let foot_b = to_pixels(Point2::new(60.0, 50.0));
        let track = PlayerTrack::new(
            9,
            BTreeMap::from([
                (0, BoundingBox::new(foot_a.x - 20.0, foot_a.y - 120.0, foot_a.x + 20.0, foot_a.y)),
                (2, BoundingBox::new(foot_b.x - 20.0, foot_b.y - 120.0, foot_b.x + 20.0, foot_b.y)),
            ]),
        );
        let players = BTreeMap::from([(9, track)]);

        let (positions, skipped) = mapper.map_sequence(&frames, &players, false);
        assert_eq!(positions.len(), 3);
        assert_eq!(skipped, 1);
        assert!(positions[1].is_empty());
        assert!(positions[0][&9].distance_to(&Point2::new(50.0, 50.0)) < 1e-6);
        assert!(positions[2][&9].distance_to(&Point2::new(60.0, 50.0)) < 1e-6);

        let (par, _) = mapper.map_sequence(&frames, &players, true);
        assert_eq!(par.len(), positions.len());
    }
}
