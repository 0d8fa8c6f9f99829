//! Planar homography estimation (normalized DLT).
//!
//! Fits `H` such that `target ~ H * source` in homogeneous coordinates.
//! Both point sets are conditioned (centroid at origin, mean distance √2)
//! before solving, and the solution is the eigenvector of `AᵀA` with the
//! smallest eigenvalue.

use nalgebra::{DMatrix, Matrix3, SymmetricEigen, Vector3};

use super::bbox::Point2;
use crate::error::FrameError;

/// Below this, a homogeneous `w` is treated as a point at infinity.
const W_EPSILON: f64 = 1e-12;

/// Below this, `|det(H)|` is treated as singular.
const DET_EPSILON: f64 = 1e-12;

/// Twice the triangle area below which three points count as collinear.
const COLLINEAR_EPSILON: f64 = 1e-6;

/// Second-smallest over largest eigenvalue of `AᵀA` below which the
/// correspondences leave more than one solution direction.
const RANK_EPSILON: f64 = 1e-10;

/// A fitted projective transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Homography {
    matrix: Matrix3<f64>,
}

impl Homography {
    /// Fits a homography from at least four correspondences.
    ///
    /// Fails with [`FrameError::DegenerateGeometry`] when the inputs are
    /// too few, mismatched or collinear, when they leave the solution
    /// underdetermined, or when the solve is singular.
    pub fn estimate(source: &[Point2], target: &[Point2]) -> Result<Self, FrameError> {
        if source.len() != target.len() {
            return Err(FrameError::degenerate(format!(
                "{} source points vs {} target points",
                source.len(),
                target.len()
            )));
        }
        if source.len() < 4 {
            return Err(FrameError::degenerate(format!(
                "need at least 4 correspondences, got {}",
                source.len()
            )));
        }
        if !in_general_position(source) || !in_general_position(target) {
            return Err(FrameError::degenerate("correspondences are collinear"));
        }

        let (src_norm, t_src) = condition(source)?;
        let (dst_norm, t_dst) = condition(target)?;

        let n = source.len();
        let mut a = DMatrix::<f64>::zeros(2 * n, 9);
        for (i, (s, d)) in src_norm.iter().zip(dst_norm.iter()).enumerate() {
            let (x, y) = (s.x, s.y);
            let (u, v) = (d.x, d.y);
            let r = 2 * i;
            a[(r, 0)] = -x;
            a[(r, 1)] = -y;
            a[(r, 2)] = -1.0;
            a[(r, 6)] = u * x;
            a[(r, 7)] = u * y;
            a[(r, 8)] = u;
            a[(r + 1, 3)] = -x;
            a[(r + 1, 4)] = -y;
            a[(r + 1, 5)] = -1.0;
            a[(r + 1, 6)] = v * x;
            a[(r + 1, 7)] = v * y;
            a[(r + 1, 8)] = v;
        }

        let ata = a.transpose() * &a;
        let eigen = SymmetricEigen::new(ata);
        let mut order: Vec<usize> = (0..eigen.eigenvalues.len()).collect();
        order.sort_by(|&l, &r| eigen.eigenvalues[l].total_cmp(&eigen.eigenvalues[r]));
        let (Some(&smallest), Some(&second), Some(&top)) = (order.first(), order.get(1), order.last()) else {
            return Err(FrameError::degenerate("empty eigen decomposition"));
        };

        // Rank 8 leaves exactly one null direction. Points crowded on one
        // line (a sideline seen edge-on) leave two or more.
        let largest = eigen.eigenvalues[top];
        if largest <= 0.0 || eigen.eigenvalues[second] / largest < RANK_EPSILON {
            return Err(FrameError::degenerate(
                "correspondences fix fewer than 8 degrees of freedom",
            ));
        }
        let h = eigen.eigenvectors.column(smallest);

        let normalized = Matrix3::new(h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], h[8]);
        let t_dst_inv = t_dst
            .try_inverse()
            .ok_or_else(|| FrameError::degenerate("target conditioning is singular"))?;
        let mut matrix = t_dst_inv * normalized * t_src;

        let scale = matrix[(2, 2)];
        if scale.abs() > W_EPSILON {
            matrix /= scale;
        }

        if !matrix.iter().all(|v| v.is_finite()) || matrix.determinant().abs() < DET_EPSILON {
            return Err(FrameError::degenerate("singular homography"));
        }

        Ok(Self { matrix })
    }

    pub fn from_matrix(matrix: Matrix3<f64>) -> Self {
        Self { matrix }
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    /// Maps one point. Points sent to infinity are [`FrameError::TransformUnavailable`].
    pub fn apply(&self, p: Point2) -> Result<Point2, FrameError> {
        let v = self.matrix * Vector3::new(p.x, p.y, 1.0);
        if v.z.abs() < W_EPSILON {
            return Err(FrameError::unavailable(format!(
                "({:.2}, {:.2}) maps to infinity",
                p.x, p.y
            )));
        }
        let out = Point2::new(v.x / v.z, v.y / v.z);
        if !out.x.is_finite() || !out.y.is_finite() {
            return Err(FrameError::unavailable("non-finite projection"));
        }
        Ok(out)
    }
}

/// Similarity transform moving the centroid to the origin with mean distance √2.
fn condition(points: &[Point2]) -> Result<(Vec<Point2>, Matrix3<f64>), FrameError> {
    let n = points.len() as f64;
    let cx = points.iter().map(|p| p.x).sum::<f64>() / n;
    let cy = points.iter().map(|p| p.y).sum::<f64>() / n;
    let mean_dist = points
        .iter()
        .map(|p| ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt())
        .sum::<f64>()
        / n;

    if mean_dist <= f64::EPSILON {
        return Err(FrameError::degenerate("all points coincide"));
    }

    let s = std::f64::consts::SQRT_2 / mean_dist;
    let t = Matrix3::new(s, 0.0, -s * cx, 0.0, s, -s * cy, 0.0, 0.0, 1.0);
    let normalized = points
        .iter()
        .map(|p| Point2::new(s * (p.x - cx), s * (p.y - cy)))
        .collect();
    Ok((normalized, t))
}

fn cross(a: Point2, b: Point2, c: Point2) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Four points: no three collinear. More than four: not all on one line.
fn in_general_position(points: &[Point2]) -> bool {
    if points.len() == 4 {
        let combos = [(0, 1, 2), (0, 1, 3), (0, 2, 3), (1, 2, 3)];
        return combos
            .iter()
            .all(|&(i, j, k)| cross(points[i], points[j], points[k]).abs() > COLLINEAR_EPSILON);
    }

    let a = points[0];
    points.iter().skip(1).any(|&b| {
        (b.x - a.x).abs() > f64::EPSILON || (b.y - a.y).abs() > f64::EPSILON
    }) && points.iter().enumerate().any(|(i, &b)| {
        points
            .iter()
            .skip(i + 1)
            .any(|&c| cross(a, b, c).abs() > COLLINEAR_EPSILON)
    })
}
