//! Geometry primitives shared by every stage.
//!
//! - `bbox` - box arithmetic (centers, foot position, containment)
//! - `homography` - projective transform estimation and application

pub mod bbox;
pub mod homography;

pub use bbox::{containment_ratio, distance, BoundingBox, Point2};
pub use homography::Homography;
