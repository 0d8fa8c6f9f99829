//! Keypoint plausibility check.
//!
//! A detected landmark is kept when its distances to two other landmarks
//! keep roughly the same proportion as in the reference layout. The check is
//! a single ascending pass per frame: a point dropped at index `i` is left
//! out of the comparisons for every later index of the same frame, while
//! earlier indices were already judged against it.

use rayon::prelude::*;

use super::court_layout::CourtLayout;
use crate::config::KeypointThresholds;
use crate::geometry::{distance, Point2};

pub struct KeypointValidator<'a> {
    layout: &'a CourtLayout,
    thresholds: KeypointThresholds,
}

impl<'a> KeypointValidator<'a> {
    pub fn new(layout: &'a CourtLayout, thresholds: KeypointThresholds) -> Self {
        Self { layout, thresholds }
    }

    /// Returns a copy of `frame` with implausible points zeroed.
    pub fn validate_frame(&self, frame: &[Point2]) -> Vec<Point2> {
        let mut points = frame.to_vec();

        let detected: Vec<usize> = points
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_detected())
            .map(|(i, _)| i)
            .collect();

        if detected.len() < self.thresholds.min_points_to_validate {
            return points;
        }

        let mut invalid: Vec<usize> = Vec::new();

        for &i in &detected {
            let Some(reference_i) = self.layout.point(i) else {
                continue;
            };

            let mut others = detected.iter().copied().filter(|&idx| idx != i && !invalid.contains(&idx));
            let (Some(j), Some(k)) = (others.next(), others.next()) else {
                continue;
            };
            let (Some(reference_j), Some(reference_k)) = (self.layout.point(j), self.layout.point(k)) else {
                continue;
            };

            let d_ij = distance(points[i], points[j]);
            let d_ik = distance(points[i], points[k]);
            let t_ij = distance(reference_i, reference_j);
            let t_ik = distance(reference_i, reference_k);

            if t_ij <= 0.0 || t_ik <= 0.0 {
                continue;
            }

            let detected_ratio = if d_ik > 0.0 { d_ij / d_ik } else { f64::INFINITY };
            let reference_ratio = t_ij / t_ik;
            let error = ((detected_ratio - reference_ratio) / reference_ratio).abs();

            if error > self.thresholds.max_proportion_error {
                log::debug!(
                    "keypoint {} rejected: proportion error {:.3} against {} and {}",
                    i,
                    error,
                    j,
                    k
                );
                points[i] = Point2::default();
                invalid.push(i);
            }
        }

        points
    }

    /// Validates every frame independently.
    pub fn validate_all(&self, frames: &[Vec<Point2>], parallel: bool) -> Vec<Vec<Point2>> {
        if parallel {
            frames.par_iter().map(|f| self.validate_frame(f)).collect()
        } else {
            frames.iter().map(|f| self.validate_frame(f)).collect()
        }
    }
}
