//! Bounding box arithmetic in source (pixel) coordinates.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A 2D point. Pixel space for detections, canvas units for the tactical view.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both coordinates strictly positive. `(0, 0)` marks an undetected keypoint.
    pub fn is_detected(&self) -> bool {
        self.x > 0.0 && self.y > 0.0
    }

    pub fn distance_to(&self, other: &Point2) -> f64 {
        distance(*self, *other)
    }
}

impl From<(f64, f64)> for Point2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Euclidean distance between two points.
pub fn distance(p: Point2, q: Point2) -> f64 {
    let dx = q.x - p.x;
    let dy = q.y - p.y;
    (dx * dx + dy * dy).sqrt()
}

/// Axis-aligned box `(x1, y1)`-`(x2, y2)` with `x1 <= x2`, `y1 <= y2`.
///
/// Zero-area boxes are legal; they simply never contain anything.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    /// Builds a box, swapping corners if they arrive out of order.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
        }
    }

    /// Ordered corners and finite coordinates.
    pub fn is_well_formed(&self) -> bool {
        let finite = [self.x1, self.y1, self.x2, self.y2].iter().all(|v| v.is_finite());
        finite && self.x1 <= self.x2 && self.y1 <= self.y2
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn center(&self) -> Point2 {
        Point2::new((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    /// Bottom-center, where a standing player touches the floor.
    pub fn foot_position(&self) -> Point2 {
        Point2::new((self.x1 + self.x2) / 2.0, self.y2)
    }

    /// Overlap of two boxes, `None` when they are disjoint.
    ///
    /// Boxes that only touch along an edge yield a zero-area intersection.
    pub fn intersection(&self, other: &BoundingBox) -> Option<BoundingBox> {
        let x1 = self.x1.max(other.x1);
        let y1 = self.y1.max(other.y1);
        let x2 = self.x2.min(other.x2);
        let y2 = self.y2.min(other.y2);

        if x2 < x1 || y2 < y1 {
            return None;
        }
        Some(BoundingBox { x1, y1, x2, y2 })
    }

    #[cfg(test)]
    pub(crate) fn scaled(&self, k: f64) -> BoundingBox {
        BoundingBox::new(self.x1 * k, self.y1 * k, self.x2 * k, self.y2 * k)
    }
}

/// `area(outer ∩ inner) / area(inner)`; 0 when disjoint or `inner` is degenerate.
pub fn containment_ratio(outer: &BoundingBox, inner: &BoundingBox) -> f64 {
    let inner_area = inner.area();
    if inner_area <= 0.0 {
        return 0.0;
    }
    match outer.intersection(inner) {
        Some(overlap) => overlap.area() / inner_area,
        None => 0.0,
    }
}
