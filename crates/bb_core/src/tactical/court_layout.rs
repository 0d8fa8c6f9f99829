//! Reference court landmarks on the tactical canvas.
//!
//! The keypoint detector emits landmarks in this exact order; index `i` of a
//! detected frame corresponds to `CourtLayout::points()[i]`.

use crate::config::CourtConfig;
use crate::geometry::Point2;

/// Baseline-relative landmark offsets along the court width (meters)
const CORNER_THREE_Y_M: f64 = 0.91;
const LANE_TOP_Y_M: f64 = 5.18;
const LANE_BOTTOM_Y_M: f64 = 10.0;
const CORNER_THREE_FAR_Y_M: f64 = 14.1;

/// Free-throw line distance from the baseline (meters)
const FREE_THROW_X_M: f64 = 5.79;

pub const LAYOUT_LEN: usize = 18;

#[derive(Debug, Clone, PartialEq)]
pub struct CourtLayout {
    points: Vec<Point2>,
    court: CourtConfig,
}

impl CourtLayout {
    /// Builds the 18 landmarks, each coordinate truncated to a whole canvas unit.
    pub fn new(court: &CourtConfig) -> Self {
        let w = court.canvas_width;
        let h = court.canvas_height;
        let y_at = |m: f64| court.meters_to_canvas(0.0, m).1.trunc();
        let x_at = |m: f64| court.meters_to_canvas(m, 0.0).0.trunc();
        let mid_x = (w / 2.0).trunc();
        let h_int = h.trunc();
        let w_int = w.trunc();

        let points = vec![
            // left edge
            Point2::new(0.0, 0.0),
            Point2::new(0.0, y_at(CORNER_THREE_Y_M)),
            Point2::new(0.0, y_at(LANE_TOP_Y_M)),
            Point2::new(0.0, y_at(LANE_BOTTOM_Y_M)),
            Point2::new(0.0, y_at(CORNER_THREE_FAR_Y_M)),
            Point2::new(0.0, h_int),
            // middle line
            Point2::new(mid_x, h_int),
            Point2::new(mid_x, 0.0),
            // left free-throw line
            Point2::new(x_at(FREE_THROW_X_M), y_at(LANE_TOP_Y_M)),
            Point2::new(x_at(FREE_THROW_X_M), y_at(LANE_BOTTOM_Y_M)),
            // right edge
            Point2::new(w_int, h_int),
            Point2::new(w_int, y_at(CORNER_THREE_FAR_Y_M)),
            Point2::new(w_int, y_at(LANE_BOTTOM_Y_M)),
            Point2::new(w_int, y_at(LANE_TOP_Y_M)),
            Point2::new(w_int, y_at(CORNER_THREE_Y_M)),
            Point2::new(w_int, 0.0),
            // right free-throw line
            Point2::new(x_at(court.court_length_m - FREE_THROW_X_M), y_at(LANE_TOP_Y_M)),
            Point2::new(x_at(court.court_length_m - FREE_THROW_X_M), y_at(LANE_BOTTOM_Y_M)),
        ];
        debug_assert_eq!(points.len(), LAYOUT_LEN);

        Self {
            points,
            court: court.clone(),
        }
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn point(&self, index: usize) -> Option<Point2> {
        self.points.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Inclusive canvas bounds.
    pub fn contains(&self, p: Point2) -> bool {
        self.court.in_bounds(p.x, p.y)
    }
}

impl Default for CourtLayout {
    fn default() -> Self {
        Self::new(&CourtConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_values() {
        let layout = CourtLayout::default();
        assert_eq!(layout.len(), LAYOUT_LEN);
        let p = layout.points();
        assert_eq!(p[1], Point2::new(0.0, 9.0));
        assert_eq!(p[2], Point2::new(0.0, 55.0));
        assert_eq!(p[3], Point2::new(0.0, 107.0));
        assert_eq!(p[4], Point2::new(0.0, 151.0));
        assert_eq!(p[6], Point2::new(150.0, 161.0));
        assert_eq!(p[8], Point2::new(62.0, 55.0));
        assert_eq!(p[15], Point2::new(300.0, 0.0));
        assert_eq!(p[16], Point2::new(237.0, 55.0));
        assert_eq!(p[17], Point2::new(237.0, 107.0));
    }

    #[test]
    fn test_contains_follows_court_canvas() {
        let layout = CourtLayout::default();
        assert!(layout.contains(Point2::new(0.0, 0.0)));
        assert!(layout.contains(Point2::new(300.0, 161.0)));
        assert!(!layout.contains(Point2::new(300.5, 80.0)));

        let mut court = CourtConfig::default();
        court.canvas_width = 600.0;
        court.canvas_height = 322.0;
        let wide = CourtLayout::new(&court);
        assert!(wide.contains(Point2::new(300.5, 80.0)));
        assert_eq!(wide.points()[8], Point2::new(124.0, 111.0));
    }

    #[test]
    fn test_layout_is_mirror_symmetric_on_edges() {
        let layout = CourtLayout::default();
        let p = layout.points();
        // Right edge lists the left edge heights in reverse
        for (i, (left, right)) in p[0..6].iter().zip(p[10..16].iter().rev()).enumerate() {
            assert_eq!(left.y, right.y, "edge point {} vs {}", i, 15 - i);
        }
    }
}
