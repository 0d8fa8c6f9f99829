//! Ball possession per frame.
//!
//! Each frame picks at most one candidate holder from box geometry alone.
//! A candidate only becomes the recorded holder once it has been selected
//! for `min_frames` consecutive frames; the frames before that stay `None`.
//! Writes are forward only, earlier frames of a streak are never back-filled.

use std::collections::BTreeMap;

use crate::config::PossessionThresholds;
use crate::geometry::{containment_ratio, BoundingBox, Point2};
use crate::models::{BallTrack, FrameBoxes, PlayerId, PlayerTrack};

/// frame → confirmed holder
pub type PossessionSeries = Vec<Option<PlayerId>>;

/// Current run of consecutive selections of one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Streak {
    candidate: PlayerId,
    frames: usize,
}

pub struct PossessionDetector {
    thresholds: PossessionThresholds,
}

impl PossessionDetector {
    pub fn new(thresholds: PossessionThresholds) -> Self {
        Self { thresholds }
    }

    /// Points on a player box measured against the ball center.
    ///
    /// The projected edge points come first and only exist when the ball
    /// center lies strictly inside the box span on that axis. Half and third
    /// offsets are floored to whole pixels.
    pub fn anchor_points(player: &BoundingBox, ball_center: Point2) -> Vec<Point2> {
        let BoundingBox { x1, y1, x2, y2 } = *player;
        let half_w = (player.width() / 2.0).floor();
        let half_h = (player.height() / 2.0).floor();
        let third_h = (player.height() / 3.0).floor();

        let mut points = Vec::with_capacity(14);
        if ball_center.y > y1 && ball_center.y < y2 {
            points.push(Point2::new(x1, ball_center.y));
            points.push(Point2::new(x2, ball_center.y));
        }
        if ball_center.x > x1 && ball_center.x < x2 {
            points.push(Point2::new(ball_center.x, y1));
            points.push(Point2::new(ball_center.x, y2));
        }

        points.extend([
            Point2::new(x1 + half_w, y1),
            Point2::new(x2, y1),
            Point2::new(x1, y1),
            Point2::new(x2, y1 + half_h),
            Point2::new(x1, y1 + half_h),
            Point2::new(x1 + half_w, y1 + half_h),
            Point2::new(x2, y2),
            Point2::new(x1, y2),
            Point2::new(x1 + half_w, y2),
            Point2::new(x1 + half_w, y1 + third_h),
        ]);
        points
    }

    pub fn min_anchor_distance(player: &BoundingBox, ball_center: Point2) -> f64 {
        Self::anchor_points(player, ball_center)
            .into_iter()
            .map(|p| p.distance_to(&ball_center))
            .fold(f64::INFINITY, f64::min)
    }

    /// Best holder for one frame, before hysteresis.
    ///
    /// Players enclosing the ball win over everyone else; among them the one
    /// whose nearest anchor is farthest from the ball is chosen. Otherwise the
    /// nearest player within `max_distance_px`. Ties keep the lowest id.
    pub fn select_candidate<'p>(
        &self,
        frame: usize,
        ball: &BoundingBox,
        players: impl IntoIterator<Item = &'p PlayerTrack>,
    ) -> Option<PlayerId> {
        let ball_center = ball.center();
        let mut enclosing: Option<(PlayerId, f64)> = None;
        let mut nearest: Option<(PlayerId, f64)> = None;

        for player in players {
            let Some(player_box) = player.box_at(frame) else {
                continue;
            };
            let containment = containment_ratio(player_box, ball);
            let min_distance = Self::min_anchor_distance(player_box, ball_center);

            if containment > self.thresholds.containment_threshold {
                if enclosing.map_or(true, |(_, best)| min_distance > best) {
                    enclosing = Some((player.id, min_distance));
                }
            } else if nearest.map_or(true, |(_, best)| min_distance < best) {
                nearest = Some((player.id, min_distance));
            }
        }

        if let Some((id, _)) = enclosing {
            return Some(id);
        }
        nearest
            .filter(|(_, d)| *d < self.thresholds.max_distance_px)
            .map(|(id, _)| id)
    }

    /// Runs the whole sequence. The result always has `num_frames` entries.
    pub fn detect(
        &self,
        ball: &BallTrack,
        players: &BTreeMap<PlayerId, PlayerTrack>,
        num_frames: usize,
    ) -> PossessionSeries {
        let mut series: PossessionSeries = vec![None; num_frames];
        let mut streak: Option<Streak> = None;

        for (frame, slot) in series.iter_mut().enumerate() {
            let candidate = match ball.require_box(frame) {
                Ok(ball_box) => self.select_candidate(frame, ball_box, players.values()),
                Err(err) => {
                    log::trace!("{}", err);
                    None
                }
            };

            let Some(candidate) = candidate else {
                streak = None;
                continue;
            };

            let frames = match streak {
                Some(s) if s.candidate == candidate => s.frames + 1,
                _ => 1,
            };
            streak = Some(Streak { candidate, frames });

            if frames >= self.thresholds.min_frames {
                *slot = Some(candidate);
            }
        }

        log::debug!(
            "possession: {} of {} frames confirmed",
            series.iter().filter(|p| p.is_some()).count(),
            num_frames
        );
        series
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: PlayerId, bbox: BoundingBox, frames: impl IntoIterator<Item = usize>) -> PlayerTrack {
        PlayerTrack::new(id, frames.into_iter().map(|f| (f, bbox)).collect())
    }

    fn ball_at(center: Point2, frames: impl IntoIterator<Item = usize>) -> BallTrack {
        let bbox = BoundingBox::new(center.x - 5.0, center.y - 5.0, center.x + 5.0, center.y + 5.0);
        BallTrack::new(frames.into_iter().map(|f| (f, bbox)).collect())
    }

    fn roster(players: impl IntoIterator<Item = PlayerTrack>) -> BTreeMap<PlayerId, PlayerTrack> {
        players.into_iter().map(|p| (p.id, p)).collect()
    }

    fn immediate() -> PossessionDetector {
        PossessionDetector::new(PossessionThresholds {
            min_frames: 1,
            ..PossessionThresholds::default()
        })
    }

    #[test]
    fn test_anchor_points_with_projection() {
        let bbox = BoundingBox::new(0.0, 0.0, 41.0, 101.0);
        let points = PossessionDetector::anchor_points(&bbox, Point2::new(10.0, 50.0));
        assert_eq!(points.len(), 14);
        assert_eq!(points[0], Point2::new(0.0, 50.0));
        assert_eq!(points[3], Point2::new(10.0, 101.0));
        // Floored half width and third height
        assert_eq!(points[4], Point2::new(20.0, 0.0));
        assert_eq!(points[13], Point2::new(20.0, 33.0));
    }

    #[test]
    fn test_anchor_points_outside_span() {
        let bbox = BoundingBox::new(0.0, 0.0, 40.0, 100.0);
        let points = PossessionDetector::anchor_points(&bbox, Point2::new(60.0, 120.0));
        assert_eq!(points.len(), 10);
    }

    #[test]
    fn test_series_length_matches_frames() {
        let players = roster([player(1, BoundingBox::new(0.0, 0.0, 40.0, 100.0), 0..5)]);
        let detector = PossessionDetector::new(PossessionThresholds::default());
        assert_eq!(detector.detect(&BallTrack::default(), &players, 40).len(), 40);
        assert_eq!(detector.detect(&ball_at(Point2::new(20.0, 50.0), 0..3), &players, 7).len(), 7);
    }

    #[test]
    fn test_hysteresis_window() {
        let players = roster([player(1, BoundingBox::new(0.0, 0.0, 40.0, 100.0), 0..40)]);
        let ball = ball_at(Point2::new(20.0, 50.0), 10..=30);
        let series = PossessionDetector::new(PossessionThresholds::default()).detect(&ball, &players, 40);

        for (frame, holder) in series.iter().enumerate() {
            let expected = if (20..=30).contains(&frame) { Some(1) } else { None };
            assert_eq!(*holder, expected, "frame {}", frame);
        }
    }

    #[test]
    fn test_absent_ball_resets_streak() {
        let players = roster([player(1, BoundingBox::new(0.0, 0.0, 40.0, 100.0), 0..40)]);
        let ball = ball_at(Point2::new(20.0, 50.0), (0..8).chain(9..30));
        let series = PossessionDetector::new(PossessionThresholds::default()).detect(&ball, &players, 30);

        // First streak is 8 frames, too short; second starts over at frame 9
        assert!(series[..19].iter().all(Option::is_none));
        assert_eq!(series[19], Some(1));
    }

    #[test]
    fn test_candidate_switch_resets_streak() {
        let players = roster([
            player(1, BoundingBox::new(0.0, 0.0, 40.0, 100.0), 0..30),
            player(2, BoundingBox::new(200.0, 0.0, 240.0, 100.0), 0..30),
        ]);
        let mut boxes: BTreeMap<usize, BoundingBox> = BTreeMap::new();
        for f in 0..30 {
            let cx = if f < 5 { 20.0 } else { 220.0 };
            boxes.insert(f, BoundingBox::new(cx - 5.0, 45.0, cx + 5.0, 55.0));
        }
        let detector = PossessionDetector::new(PossessionThresholds {
            min_frames: 3,
            ..PossessionThresholds::default()
        });
        let series = detector.detect(&BallTrack::new(boxes), &players, 30);
        assert_eq!(&series[..7], &[None, None, Some(1), Some(1), Some(1), None, None]);
        assert_eq!(series[7], Some(2));
    }

    #[test]
    fn test_enclosing_prefers_largest_anchor_distance() {
        // Ball sits on A's center anchor but 30px from B's nearest anchor
        let a = player(1, BoundingBox::new(0.0, 0.0, 100.0, 200.0), [0]);
        let b = player(2, BoundingBox::new(20.0, 60.0, 120.0, 260.0), [0]);
        let ball = BoundingBox::new(45.0, 95.0, 55.0, 105.0);

        let b_distance = PossessionDetector::min_anchor_distance(&b.boxes()[&0], ball.center());
        assert!((b_distance - 30.0).abs() < 1e-9, "got {}", b_distance);
        assert_eq!(immediate().select_candidate(0, &ball, [&a, &b]), Some(2));
    }

    #[test]
    fn test_enclosing_beats_nearer_regular() {
        let enclosing = player(1, BoundingBox::new(0.0, 0.0, 100.0, 200.0), [0]);
        // Edge touching the ball: distance 0 but containment only half
        let touching = player(2, BoundingBox::new(60.0, 0.0, 160.0, 200.0), [0]);
        let ball = BoundingBox::new(55.0, 95.0, 65.0, 105.0);
        let detector = immediate();
        assert_eq!(containment_ratio(&touching.boxes()[&0], &ball), 0.5);
        assert_eq!(detector.select_candidate(0, &ball, [&enclosing, &touching]), Some(1));
    }

    #[test]
    fn test_distance_threshold() {
        let p = player(1, BoundingBox::new(0.0, 0.0, 40.0, 100.0), [0]);
        let detector = immediate();

        let near = BoundingBox::new(75.0, 45.0, 85.0, 55.0); // 40px from the right edge
        assert_eq!(detector.select_candidate(0, &near, [&p]), Some(1));

        let far = BoundingBox::new(95.0, 45.0, 105.0, 55.0); // 60px
        assert_eq!(detector.select_candidate(0, &far, [&p]), None);
    }

    #[test]
    fn test_nearest_regular_wins() {
        let a = player(1, BoundingBox::new(0.0, 0.0, 40.0, 100.0), [0]);
        let b = player(2, BoundingBox::new(100.0, 0.0, 140.0, 100.0), [0]);
        let ball = BoundingBox::new(80.0, 45.0, 90.0, 55.0);
        assert_eq!(immediate().select_candidate(0, &ball, [&a, &b]), Some(2));
    }

    #[test]
    fn test_players_without_box_ignored() {
        let p = player(1, BoundingBox::new(0.0, 0.0, 40.0, 100.0), [1]);
        let ball = BoundingBox::new(15.0, 45.0, 25.0, 55.0);
        assert_eq!(immediate().select_candidate(0, &ball, [&p]), None);
        assert_eq!(immediate().select_candidate(1, &ball, [&p]), Some(1));
    }
}

#[cfg(all(test, feature = "proptest"))]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_series_length_and_holders(
            centers in proptest::collection::vec(proptest::option::of((0.0f64..400.0, 0.0f64..300.0)), 0..60),
            min_frames in 1usize..15,
        ) {
            let players: BTreeMap<PlayerId, PlayerTrack> = [
                PlayerTrack::new(3, (0..60).map(|f| (f, BoundingBox::new(0.0, 0.0, 80.0, 200.0))).collect()),
                PlayerTrack::new(8, (0..60).map(|f| (f, BoundingBox::new(200.0, 50.0, 280.0, 250.0))).collect()),
            ]
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

            let ball = BallTrack::new(
                centers
                    .iter()
                    .enumerate()
                    .filter_map(|(f, c)| c.map(|(x, y)| (f, BoundingBox::new(x - 4.0, y - 4.0, x + 4.0, y + 4.0))))
                    .collect(),
            );
            let detector = PossessionDetector::new(PossessionThresholds {
                min_frames,
                ..PossessionThresholds::default()
            });
            let series = detector.detect(&ball, &players, centers.len());

            prop_assert_eq!(series.len(), centers.len());
            for (frame, holder) in series.iter().enumerate() {
                if let Some(id) = holder {
                    prop_assert!(players.contains_key(id));
                    prop_assert!(centers[frame].is_some(), "holder without a ball at {}", frame);
                }
            }
        }
    }
}
