//! # Possession
//!
//! Who holds the ball, frame by frame, and how much of the game each team
//! had it.

pub mod detector;
pub mod share;

pub use detector::{PossessionDetector, PossessionSeries};
pub use share::PossessionShare;
