//! # Shots
//!
//! Hoop collision, make/miss classification and score attribution.

pub mod state_machine;

pub use state_machine::{ShotDetector, ShotInputs, ShotPhase};
